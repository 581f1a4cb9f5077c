//! Error types for the user-generation crate.
//!
//! Configuration and data source failures are fatal before generation
//! starts. Persistence conflicts and shortfalls are not errors at all; they
//! only surface through the run summary.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::name_pool::PoolKind;
use crate::persister::BatchPersisterError;

/// A single configuration field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Setting key, in `snake_case`.
    pub field: &'static str,
    /// Human-readable reason the value was rejected.
    pub reason: String,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every validation failure found in a set of generation settings.
///
/// Validation never stops at the first bad field, so callers can report the
/// whole list at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    failures: Vec<FieldFailure>,
}

impl ConfigValidationError {
    /// Wraps a list of field failures.
    #[must_use]
    pub const fn new(failures: Vec<FieldFailure>) -> Self {
        Self { failures }
    }

    /// Consumes the error, returning its field failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<FieldFailure> {
        self.failures
    }

    /// Returns the individual field failures in declaration order.
    #[must_use]
    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Returns the reasons recorded for `field`.
    #[must_use]
    pub fn reasons_for(&self, field: &str) -> Vec<&str> {
        self.failures
            .iter()
            .filter(|failure| failure.field == field)
            .map(|failure| failure.reason.as_str())
            .collect()
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: ")?;
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationError {}

/// Errors raised while loading name pools.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    /// The locale identifier is not a single plain directory name.
    #[error("invalid locale '{locale}': must be a single directory name")]
    InvalidLocale {
        /// The rejected locale identifier.
        locale: String,
    },

    /// The locale directory could not be opened.
    #[error("failed to open locale directory '{path}': {message}")]
    LocaleUnavailable {
        /// Path of the locale directory.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// A name file could not be read or is not valid UTF-8.
    #[error("failed to read {kind} names at '{path}': {message}")]
    Unreadable {
        /// Which pool was being loaded.
        kind: PoolKind,
        /// Path of the file that failed.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// A required pool contained no names.
    #[error("{kind} names at '{path}' are empty")]
    EmptyPool {
        /// Which pool was empty.
        kind: PoolKind,
        /// Path of the empty file.
        path: PathBuf,
    },
}

/// Failure of the opaque password hashing function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl PasswordHashError {
    /// Wraps a hashing backend failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that abort a generation run.
///
/// Rows flushed before the failure stay persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The batch persister failed for a reason other than a key conflict.
    #[error("batch persistence failed: {0}")]
    Persistence(#[from] BatchPersisterError),

    /// A password could not be hashed.
    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),
}

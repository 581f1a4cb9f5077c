//! Errors returned by the seeder.

use thiserror::Error;
use user_generation::{ConfigValidationError, DataSourceError, RunError};

use crate::persistence::PoolError;

/// Errors that stop the seeder before or during a run.
#[derive(Debug, Error)]
pub enum SeederError {
    /// A settings source could not be loaded.
    #[error("failed to load settings: {message}")]
    Settings {
        /// Description of the loading failure.
        message: String,
    },
    /// One or more settings are invalid.
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigValidationError),
    /// Name pools could not be loaded.
    #[error("name data unavailable: {0}")]
    DataSource(#[from] DataSourceError),
    /// The database pool could not be built.
    #[error("database unavailable: {0}")]
    Pool(#[from] PoolError),
    /// The generation run failed.
    #[error("user generation failed: {0}")]
    Run(#[from] RunError),
}

impl SeederError {
    /// Create a settings error with the given message.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }
}

//! Port for bulk-inserting user rows, plus batching and an in-memory adapter.
//!
//! Adapters must skip rows whose email already exists instead of failing the
//! batch, and report exactly how many rows were newly stored.

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::macros::define_port_error;
use crate::materializer::UserRow;

define_port_error! {
    /// Persistence errors raised by batch persister adapters.
    pub enum BatchPersisterError {
        /// Storage connection could not be established.
        Connection {
            /// Description of the connection failure.
            message: String,
        } => "batch insert connection failed: {message}",
        /// The insert statement failed for a reason other than a key conflict.
        Query {
            /// Description of the query failure.
            message: String,
        } => "batch insert query failed: {message}",
    }
}

/// Port for inserting batches of user rows.
///
/// Implementations must:
/// - Insert every row whose email is not yet stored.
/// - Silently skip rows whose email already exists.
/// - Return the number of rows actually inserted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchPersister: Send + Sync {
    /// Insert `rows`, ignoring natural-key conflicts.
    async fn insert_batch(&self, rows: &[UserRow]) -> Result<usize, BatchPersisterError>;
}

/// Pending rows awaiting a flush.
///
/// The buffer hands back a full batch as soon as it reaches capacity, so a
/// persister is never called with more rows than the configured maximum.
#[derive(Debug)]
pub struct BatchBuffer {
    rows: Vec<UserRow>,
    capacity: NonZeroUsize,
}

impl BatchBuffer {
    /// Creates an empty buffer flushing every `capacity` rows.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Appends `row`, returning the batch to flush once capacity is reached.
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use user_generation::{BatchBuffer, UserRow};
    ///
    /// let row = |local: &str| UserRow {
    ///     display_name: "Ana Smith".to_owned(),
    ///     email_local_part: local.to_owned(),
    ///     email_domain: "example.com".to_owned(),
    ///     password_hash: String::new(),
    /// };
    /// let mut buffer = BatchBuffer::new(NonZeroUsize::new(2).unwrap_or(NonZeroUsize::MIN));
    ///
    /// assert!(buffer.push(row("a")).is_none());
    /// assert_eq!(buffer.push(row("b")).map(|batch| batch.len()), Some(2));
    /// assert!(buffer.is_empty());
    /// ```
    pub fn push(&mut self, row: UserRow) -> Option<Vec<UserRow>> {
        self.rows.push(row);
        (self.rows.len() >= self.capacity.get()).then(|| self.take())
    }

    /// Drains the remainder, if any rows are pending.
    pub fn finish(&mut self) -> Option<Vec<UserRow>> {
        (!self.rows.is_empty()).then(|| self.take())
    }

    /// Number of pending rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when no rows are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn take(&mut self) -> Vec<UserRow> {
        std::mem::replace(&mut self.rows, Vec::with_capacity(self.capacity.get()))
    }
}

/// Batch persister keeping rows in memory, keyed by email.
///
/// Used for dry runs and tests. Rows keep their first-insertion order.
#[derive(Debug, Default)]
pub struct InMemoryBatchPersister {
    rows: Mutex<IndexMap<String, UserRow>>,
}

impl InMemoryBatchPersister {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `rows`.
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = UserRow>) -> Self {
        let stored = rows.into_iter().map(|row| (row.email(), row)).collect();
        Self {
            rows: Mutex::new(stored),
        }
    }

    /// Returns a snapshot of the stored rows.
    #[must_use]
    pub fn rows(&self) -> Vec<UserRow> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BatchPersister for InMemoryBatchPersister {
    async fn insert_batch(&self, rows: &[UserRow]) -> Result<usize, BatchPersisterError> {
        let mut stored = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let mut inserted = 0;
        for row in rows {
            let email = row.email();
            if !stored.contains_key(&email) {
                stored.insert(email, row.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

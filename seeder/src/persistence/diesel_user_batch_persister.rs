//! PostgreSQL-backed batch persister for generated users.
//!
//! Each batch is a single multi-row `INSERT ... ON CONFLICT DO NOTHING`, so
//! rows whose email already exists are skipped and the affected-row count is
//! exactly the number of newly stored users.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use tracing::debug;
use user_generation::{BatchPersister, BatchPersisterError, UserRow};

use super::models::NewUserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Columns bound for every inserted row.
const USER_COLUMNS: usize = 3;

/// Most rows one insert statement can carry.
///
/// PostgreSQL accepts at most 65535 bind parameters per statement and every
/// row binds three of them.
pub const MAX_ROWS_PER_STATEMENT: usize = 21_845;

/// Diesel-backed implementation of the batch persister port.
#[derive(Clone)]
pub struct DieselUserBatchPersister {
    pool: DbPool,
}

impl DieselUserBatchPersister {
    /// Create a persister inserting through `pool`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use seeder::persistence::{DbPool, DieselUserBatchPersister, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
    /// let persister = DieselUserBatchPersister::new(pool);
    /// # let _ = persister;
    /// # Ok(())
    /// # }
    /// ```
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to port errors.
fn map_pool_error(error: PoolError) -> BatchPersisterError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            BatchPersisterError::connection(message)
        }
    }
}

/// Map Diesel errors to port errors.
fn map_diesel_error(error: diesel::result::Error) -> BatchPersisterError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let error_message = error.to_string();
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                error = %error_message,
                "diesel batch insert failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error_message,
            "diesel batch insert failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            BatchPersisterError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            BatchPersisterError::query(info.message().to_owned())
        }
        _ => BatchPersisterError::query(error_message),
    }
}

#[async_trait]
impl BatchPersister for DieselUserBatchPersister {
    async fn insert_batch(&self, rows: &[UserRow]) -> Result<usize, BatchPersisterError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let new_rows: Vec<NewUserRow<'_>> = rows.iter().map(NewUserRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(users::table)
            .values(&new_rows)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

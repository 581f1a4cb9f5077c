//! PostgreSQL persistence for generated users.
//!
//! The batch persister port is implemented with Diesel query building over
//! `diesel-async` connections pooled by `bb8`. Row structs and the schema are
//! internal; only the pool and the adapter are exported.

mod diesel_user_batch_persister;
mod models;
mod pool;
mod schema;

pub use diesel_user_batch_persister::{DieselUserBatchPersister, MAX_ROWS_PER_STATEMENT};
pub use pool::{DbPool, PoolConfig, PoolError};

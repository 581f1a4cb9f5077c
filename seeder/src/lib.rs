//! Command-line seeder inserting synthetic users into PostgreSQL.
//!
//! Settings are loaded through OrthoConfig from `RANDOM_USERS_*` environment
//! variables, command-line flags and configuration files. Users are generated
//! by the `user_generation` crate and inserted in batches through Diesel,
//! skipping rows whose email already exists.

mod error;
pub mod persistence;
pub mod report;
pub mod settings;
mod setting_value;
mod startup;

pub use error::SeederError;
pub use setting_value::SettingValue;
pub use settings::{PersistenceTarget, SeedPlan, SeederSettings};
pub use startup::run_seeder;

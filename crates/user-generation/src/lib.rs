//! Synthetic user identity generation with collision tracking and shortfall
//! recovery.
//!
//! Identities are sampled from per-locale name pools, checked against a
//! cumulative full-name map, turned into rows with derived email addresses
//! and password hashes, and flushed to a [`BatchPersister`] in bounded
//! batches. Rows lost to storage conflicts are made up by further rounds
//! until the target is met or the retry bound is reached.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading name pools from plain-text corpora (bundled `en` and `hu`)
//! - Unique-only or numbered-duplicate full names
//! - ASCII email local parts derived from accented names
//! - Fixed or per-user random passwords hashed with Argon2id
//! - Reproducible runs from a fixed seed
//!
//! # Example
//!
//! ```
//! use user_generation::{
//!     GenerationSettings, InMemoryBatchPersister, NamePools, RandomIndexSource,
//!     UserGenerator, Argon2PasswordHasher, bundled_names_root,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
//! let config = GenerationSettings {
//!     number_of_users: Some(5),
//!     email_domain_name: Some("example.com".to_owned()),
//!     password: Some("correct horse".to_owned()),
//!     ..GenerationSettings::default()
//! }
//! .validate()
//! .expect("valid settings");
//! let pools = NamePools::load(&bundled_names_root(), config.locale(), config.gender_mix())
//!     .expect("bundled corpora");
//! let store = InMemoryBatchPersister::new();
//!
//! let summary = UserGenerator::new(&config, &pools, &store, &Argon2PasswordHasher::new())
//!     .run(&mut RandomIndexSource::seeded(42))
//!     .await
//!     .expect("run completes");
//!
//! assert!(summary.is_target_met());
//! assert_eq!(store.len(), 5);
//! # });
//! ```

mod config;
mod controller;
mod counters;
mod error;
mod fold;
mod index_source;
mod macros;
mod materializer;
mod name_pool;
mod password;
mod persister;
mod sampler;
mod tracker;

pub use config::{
    DEFAULT_LOCALE, DEFAULT_MAX_ROWS_PER_INSERT, DEFAULT_MISSING_MAX_ATTEMPTS, GenderMix,
    GenerationConfig, GenerationSettings, MIN_PASSWORD_LENGTH, PasswordPolicy, UniquenessPolicy,
};
pub use controller::{RunOutcome, RunSummary, UserGenerator};
pub use counters::RunCounters;
pub use error::{
    ConfigValidationError, DataSourceError, FieldFailure, PasswordHashError, RunError,
};
pub use fold::ascii_fold;
pub use index_source::{IndexSource, RandomIndexSource, ScriptedIndexSource};
pub use materializer::{RecordMaterializer, UserRow, email_local_part, suffixed_local_part};
pub use name_pool::{NamePool, NamePools, PoolKind, bundled_names_root};
pub use password::{
    Argon2PasswordHasher, PasswordHasher, PasswordSource, RANDOM_TOKEN_BYTES, random_token,
};
pub use persister::{BatchBuffer, BatchPersister, BatchPersisterError, InMemoryBatchPersister};
pub use sampler::{Gender, GivenName, Identity, IdentitySampler};
pub use tracker::{Observation, UniquenessTracker};

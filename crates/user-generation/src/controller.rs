//! Shortfall-recovering generation loop.
//!
//! A run moves through `Generating -> Flushing -> Evaluating` rounds until
//! the requested number of rows has been stored or the retry bound is spent.
//! Every round re-materializes the whole cumulative name map, so rows from
//! earlier rounds come back as key conflicts and only new rows count.

use std::fmt;
use std::num::NonZeroUsize;

use tracing::{debug, info};

use crate::config::GenerationConfig;
use crate::counters::RunCounters;
use crate::error::RunError;
use crate::index_source::IndexSource;
use crate::materializer::{RecordMaterializer, UserRow};
use crate::name_pool::NamePools;
use crate::password::{PasswordHasher, PasswordSource};
use crate::persister::{BatchBuffer, BatchPersister};
use crate::sampler::IdentitySampler;
use crate::tracker::UniquenessTracker;

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The requested number of rows was stored.
    Done,
    /// The retry bound was spent with rows still missing.
    Exhausted {
        /// Rows still missing when the run gave up.
        shortfall: NonZeroUsize,
    },
}

/// Final report of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of rows the run tried to store.
    pub requested: NonZeroUsize,
    /// Counters accumulated over every round.
    pub counters: RunCounters,
    /// Retry rounds performed after the first round.
    pub retries: usize,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl RunSummary {
    /// Returns `true` when every requested row was stored.
    #[must_use]
    pub const fn is_target_met(&self) -> bool {
        matches!(self.outcome, RunOutcome::Done)
    }

    /// Rows still missing, zero when the target was met.
    #[must_use]
    pub const fn shortfall(&self) -> usize {
        match self.outcome {
            RunOutcome::Done => 0,
            RunOutcome::Exhausted { shortfall } => shortfall.get(),
        }
    }

    /// Total rounds performed, including the first.
    #[must_use]
    pub const fn rounds(&self) -> usize {
        self.retries + 1
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Female: {}. Male: {}. Same names: {}. Inserted: {}.",
            self.counters.female,
            self.counters.male,
            self.counters.collisions,
            self.counters.inserted
        )
    }
}

/// Controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Generating { remaining: NonZeroUsize },
    Flushing,
    Evaluating,
    Done,
    Exhausted { shortfall: NonZeroUsize },
}

/// State owned by a single run.
struct RunState {
    tracker: UniquenessTracker,
    counters: RunCounters,
    retries: usize,
}

/// Drives generation rounds against a persister until the target is met or
/// the retry bound is reached.
///
/// # Example
///
/// ```
/// use user_generation::{
///     GenerationSettings, InMemoryBatchPersister, NamePool, NamePools, PasswordHasher,
///     PasswordHashError, RandomIndexSource, UserGenerator,
/// };
///
/// struct Plain;
///
/// impl PasswordHasher for Plain {
///     fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
///         Ok(plaintext.to_owned())
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
/// let config = GenerationSettings {
///     number_of_users: Some(3),
///     email_domain_name: Some("example.com".to_owned()),
///     generated_passwords: Some(true),
///     ..GenerationSettings::default()
/// }
/// .validate()
/// .expect("valid settings");
/// let pools = NamePools::new(
///     NamePool::from_lines("Smith\nJones\nTaylor").expect("family"),
///     NamePool::from_lines("Ana\nMia\nEva"),
///     NamePool::from_lines("Tom\nSam\nLeo"),
/// );
/// let store = InMemoryBatchPersister::new();
///
/// let summary = UserGenerator::new(&config, &pools, &store, &Plain)
///     .run(&mut RandomIndexSource::seeded(7))
///     .await
///     .expect("run completes");
///
/// assert!(summary.counters.inserted <= 3);
/// # });
/// ```
pub struct UserGenerator<'a, P: ?Sized, H: ?Sized> {
    config: &'a GenerationConfig,
    pools: &'a NamePools,
    persister: &'a P,
    hasher: &'a H,
}

impl<'a, P, H> UserGenerator<'a, P, H>
where
    P: BatchPersister + ?Sized,
    H: PasswordHasher + ?Sized,
{
    /// Binds a run to its configuration and collaborators.
    pub const fn new(
        config: &'a GenerationConfig,
        pools: &'a NamePools,
        persister: &'a P,
        hasher: &'a H,
    ) -> Self {
        Self {
            config,
            pools,
            persister,
            hasher,
        }
    }

    /// Runs rounds until the target is met or retries are exhausted.
    ///
    /// A shortfall is not an error; it is reported through
    /// [`RunSummary::outcome`].
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the persister fails or a password cannot be
    /// hashed. Batches flushed before the failure stay stored.
    pub async fn run<S>(&self, source: &mut S) -> Result<RunSummary, RunError>
    where
        S: IndexSource + ?Sized,
    {
        let passwords = PasswordSource::prepare(self.config.password_policy(), self.hasher)?;
        let sampler = IdentitySampler::new(self.pools, self.config.gender_mix());
        let mut state = RunState {
            tracker: UniquenessTracker::new(self.config.uniqueness()),
            counters: RunCounters::default(),
            retries: 0,
        };

        let mut phase = Phase::Generating {
            remaining: self.config.requested_count(),
        };
        let outcome = loop {
            phase = match phase {
                Phase::Generating { remaining } => {
                    generate_round(&sampler, source, &mut state, remaining);
                    Phase::Flushing
                }
                Phase::Flushing => {
                    self.flush(&passwords, &mut state).await?;
                    Phase::Evaluating
                }
                Phase::Evaluating => self.evaluate(&mut state),
                Phase::Done => break RunOutcome::Done,
                Phase::Exhausted { shortfall } => break RunOutcome::Exhausted { shortfall },
            };
        };

        let summary = RunSummary {
            requested: self.config.requested_count(),
            counters: state.counters,
            retries: state.retries,
            outcome,
        };
        info!(
            female = summary.counters.female,
            male = summary.counters.male,
            collisions = summary.counters.collisions,
            inserted = summary.counters.inserted,
            shortfall = summary.shortfall(),
            retries = summary.retries,
            "user generation finished"
        );
        Ok(summary)
    }

    /// Materializes every name seen so far and hands the rows over in batches.
    ///
    /// Rows stored in an earlier round are sent again and come back as
    /// conflicts. With per-user random passwords each of them costs another
    /// hash, so a retry round hashes every row of the cumulative map.
    async fn flush(
        &self,
        passwords: &PasswordSource,
        state: &mut RunState,
    ) -> Result<(), RunError> {
        let materializer =
            RecordMaterializer::new(self.config.email_domain(), passwords, self.hasher);
        let mut buffer = BatchBuffer::new(self.config.max_batch_size());

        for (full_name, occurrences) in state.tracker.entries() {
            for row in materializer.rows_for(full_name, occurrences) {
                if let Some(batch) = buffer.push(row?) {
                    self.persist(&batch, &mut state.counters).await?;
                }
            }
        }
        if let Some(batch) = buffer.finish() {
            self.persist(&batch, &mut state.counters).await?;
        }
        Ok(())
    }

    async fn persist(
        &self,
        batch: &[UserRow],
        counters: &mut RunCounters,
    ) -> Result<(), RunError> {
        let inserted = self.persister.insert_batch(batch).await?;
        counters.inserted += inserted;
        if inserted > 0 {
            info!(inserted, total = counters.inserted, "rows inserted");
        }
        Ok(())
    }

    fn evaluate(&self, state: &mut RunState) -> Phase {
        let requested = self.config.requested_count().get();
        match NonZeroUsize::new(requested.saturating_sub(state.counters.inserted)) {
            None => Phase::Done,
            Some(missing) if state.retries < self.config.max_retry_attempts().get() => {
                state.retries += 1;
                info!(trial = state.retries, missing = missing.get(), "retrying shortfall");
                Phase::Generating { remaining: missing }
            }
            Some(shortfall) => Phase::Exhausted { shortfall },
        }
    }
}

fn generate_round<S>(
    sampler: &IdentitySampler<'_>,
    source: &mut S,
    state: &mut RunState,
    remaining: NonZeroUsize,
) where
    S: IndexSource + ?Sized,
{
    info!(
        round = state.retries + 1,
        remaining = remaining.get(),
        "generating identities"
    );
    for _ in 0..remaining.get() {
        let Some(identity) = sampler.sample_identity(source, &mut state.counters) else {
            debug!("no given-name pool enabled; stopping round");
            break;
        };
        state.tracker.observe(&identity.full_name(), &mut state.counters);
    }
}

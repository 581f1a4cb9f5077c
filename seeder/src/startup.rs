//! Seeder run orchestration.

use tracing::info;
use user_generation::{
    Argon2PasswordHasher, BatchPersister, InMemoryBatchPersister, NamePools, RandomIndexSource,
    RunSummary, UserGenerator,
};

use crate::error::SeederError;
use crate::persistence::{DbPool, DieselUserBatchPersister, PoolConfig};
use crate::settings::{PersistenceTarget, SeedPlan, SeederSettings};

/// Validate `settings`, load the name pools and run one generation.
///
/// Nothing is generated unless every setting is valid and the name pools
/// load. A shortfall is reported through the returned summary.
///
/// # Examples
///
/// ```rust,no_run
/// use seeder::{SeederSettings, run_seeder};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = SeederSettings::load_from_args(std::env::args_os())?;
/// let summary = run_seeder(settings).await?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`SeederError`] when the settings are invalid, the name data
/// cannot be loaded, the database is unreachable or the run fails.
pub async fn run_seeder(settings: SeederSettings) -> Result<RunSummary, SeederError> {
    let plan = settings.into_plan()?;
    let pools = NamePools::load(
        &plan.names_root,
        plan.config.locale(),
        plan.config.gender_mix(),
    )?;

    match &plan.target {
        PersistenceTarget::DryRun => {
            info!("dry run; rows are kept in memory");
            generate(&plan, &pools, &InMemoryBatchPersister::new()).await
        }
        PersistenceTarget::Database(url) => {
            let pool = DbPool::new(PoolConfig::new(url.as_str())).await?;
            generate(&plan, &pools, &DieselUserBatchPersister::new(pool)).await
        }
    }
}

async fn generate<P>(
    plan: &SeedPlan,
    pools: &NamePools,
    persister: &P,
) -> Result<RunSummary, SeederError>
where
    P: BatchPersister,
{
    let config = &plan.config;
    info!(
        requested = config.requested_count().get(),
        locale = config.locale(),
        uniqueness = ?config.uniqueness(),
        genders = ?config.gender_mix(),
        batch_size = config.max_batch_size().get(),
        max_retries = config.max_retry_attempts().get(),
        seeded = config.seed().is_some(),
        "starting user generation"
    );

    let hasher = Argon2PasswordHasher::new();
    let mut source = RandomIndexSource::for_seed(config.seed());
    let summary = UserGenerator::new(config, pools, persister, &hasher)
        .run(&mut source)
        .await?;
    Ok(summary)
}

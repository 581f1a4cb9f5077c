//! Inserts a configured number of synthetic users.
//!
//! Exits non-zero when the settings are invalid or the run fails. A shortfall
//! after the last retry round is reported but still exits successfully.

use std::io::{self, Write};
use std::process::ExitCode;

use seeder::report::{summary_report, usage, validation_report};
use seeder::{SeederError, SeederSettings, run_seeder};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(SeederError::InvalidConfiguration(err)) => {
            write_stderr(&format!("{}\n{}", usage(), validation_report(&err)));
            ExitCode::FAILURE
        }
        Err(err) => {
            write_stderr(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), SeederError> {
    let settings = SeederSettings::load_from_args(std::env::args_os())?;
    let summary = run_seeder(settings).await?;
    info!(
        target_met = summary.is_target_met(),
        shortfall = summary.shortfall(),
        "{summary}"
    );
    if let Err(err) = writeln!(io::stdout().lock(), "{}", summary_report(&summary)) {
        drop(err);
    }
    Ok(())
}

fn write_stderr(message: &str) {
    if let Err(err) = writeln!(io::stderr().lock(), "{message}") {
        drop(err);
    }
}

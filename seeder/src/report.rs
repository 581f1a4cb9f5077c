//! Text rendered to the terminal by the seeder binary.

use user_generation::{
    ConfigValidationError, DEFAULT_LOCALE, DEFAULT_MAX_ROWS_PER_INSERT,
    DEFAULT_MISSING_MAX_ATTEMPTS, MIN_PASSWORD_LENGTH, RunOutcome, RunSummary,
};

use crate::settings::env_var_name;

/// Settings listed in the usage block, with a short description each.
const SETTINGS: &[(&str, &str)] = &[
    ("number_of_users", "number of users to insert (required)"),
    ("email_domain_name", "domain of the generated email addresses (required)"),
    ("unique_full_name", "keep full names unique (default: true)"),
    ("names_directory", "locale of the name corpora"),
    ("females", "sample female given names (default: true)"),
    ("males", "sample male given names (default: true)"),
    ("generated_passwords", "random password per user (default: false)"),
    ("password", "shared password when passwords are not generated"),
    ("max_rows_per_insert", "rows per insert statement"),
    ("missing_max_attempts", "retry rounds for missing users"),
    ("seed", "seed for reproducible runs"),
    ("names_root", "root directory of the name corpora"),
    ("database_url", "PostgreSQL URL (required unless dry run)"),
    ("dry_run", "keep rows in memory (default: false)"),
];

/// Renders the usage block listing every environment variable.
#[must_use]
pub fn usage() -> String {
    let mut out = String::from("Usage: insert-random-users [options]\n\nSettings:\n");
    for (field, description) in SETTINGS {
        out.push_str(&format!("  {:<35} {description}\n", env_var_name(field)));
    }
    out.push_str(&format!(
        "\nDefaults: locale '{DEFAULT_LOCALE}', {DEFAULT_MAX_ROWS_PER_INSERT} rows per insert, \
         {DEFAULT_MISSING_MAX_ATTEMPTS} retry rounds, passwords of at least \
         {MIN_PASSWORD_LENGTH} characters.\n\
         Flags accept 1/0, true/false, yes/no or on/off.\n"
    ));
    out
}

/// Renders every validation failure, one line per field.
///
/// ```
/// use seeder::report::validation_report;
/// use user_generation::GenerationSettings;
///
/// let err = GenerationSettings::default().validate().expect_err("missing settings");
/// let report = validation_report(&err);
///
/// assert!(report.contains("RANDOM_USERS_NUMBER_OF_USERS: is required"));
/// ```
#[must_use]
pub fn validation_report(error: &ConfigValidationError) -> String {
    let mut out = String::from("Invalid configuration:\n");
    for failure in error.failures() {
        out.push_str(&format!("  {}: {}\n", env_var_name(failure.field), failure.reason));
    }
    out
}

/// Renders the run summary and whether the target was met.
#[must_use]
pub fn summary_report(summary: &RunSummary) -> String {
    match summary.outcome {
        RunOutcome::Done => format!(
            "{summary}\nTarget met: {} of {} users inserted.",
            summary.counters.inserted, summary.requested
        ),
        RunOutcome::Exhausted { shortfall } => format!(
            "{summary}\nTarget not met: {shortfall} of {} users missing after {} retries.",
            summary.requested, summary.retries
        ),
    }
}

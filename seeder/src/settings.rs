//! Seeder configuration loaded via OrthoConfig.
//!
//! Every setting can come from a `RANDOM_USERS_*` environment variable, a
//! command-line flag or a configuration file. Values stay optional here;
//! [`SeederSettings::into_plan`] validates them all at once.

use std::ffi::OsString;
use std::fmt;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use user_generation::{
    ConfigValidationError, FieldFailure, GenerationConfig, GenerationSettings, bundled_names_root,
};

use crate::error::SeederError;
use crate::persistence::MAX_ROWS_PER_STATEMENT;
use crate::setting_value::{SettingParser, SettingValue};

/// Environment variable prefix shared by every setting.
pub const ENV_PREFIX: &str = "RANDOM_USERS";

/// Raw seeder settings.
///
/// Flags accept `1`/`0`, `true`/`false`, `yes`/`no` and `on`/`off`. An unset
/// flag falls back to its default rather than to `false`.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RANDOM_USERS")]
pub struct SeederSettings {
    /// Number of users to insert.
    pub number_of_users: Option<SettingValue>,
    /// Keep full names unique or store numbered duplicates.
    pub unique_full_name: Option<SettingValue>,
    /// Locale directory holding the name corpora.
    pub names_directory: Option<SettingValue>,
    /// Sample female given names.
    pub females: Option<SettingValue>,
    /// Sample male given names.
    pub males: Option<SettingValue>,
    /// Give every user its own random password.
    pub generated_passwords: Option<SettingValue>,
    /// Password shared by every user when passwords are not generated.
    pub password: Option<SettingValue>,
    /// Domain of the generated email addresses.
    pub email_domain_name: Option<SettingValue>,
    /// Maximum rows per insert statement.
    pub max_rows_per_insert: Option<SettingValue>,
    /// Maximum retry rounds used to make up a shortfall.
    pub missing_max_attempts: Option<SettingValue>,
    /// Seed for reproducible runs.
    pub seed: Option<SettingValue>,
    /// Root directory of the name corpora; defaults to the bundled corpora.
    pub names_root: Option<SettingValue>,
    /// PostgreSQL connection URL.
    pub database_url: Option<SettingValue>,
    /// Store rows in memory instead of PostgreSQL.
    pub dry_run: Option<SettingValue>,
}

impl fmt::Debug for SeederSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeederSettings")
            .field("number_of_users", &self.number_of_users)
            .field("unique_full_name", &self.unique_full_name)
            .field("names_directory", &self.names_directory)
            .field("females", &self.females)
            .field("males", &self.males)
            .field("generated_passwords", &self.generated_passwords)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email_domain_name", &self.email_domain_name)
            .field("max_rows_per_insert", &self.max_rows_per_insert)
            .field("missing_max_attempts", &self.missing_max_attempts)
            .field("seed", &self.seed)
            .field("names_root", &self.names_root)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<redacted>"),
            )
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Where generated rows are stored.
#[derive(Clone, PartialEq, Eq)]
pub enum PersistenceTarget {
    /// Rows are kept in memory and discarded at exit.
    DryRun,
    /// Rows are inserted into the PostgreSQL database at this URL.
    Database(String),
}

impl fmt::Debug for PersistenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DryRun => f.write_str("DryRun"),
            Self::Database(_) => f.write_str("Database(<redacted>)"),
        }
    }
}

/// Validated inputs for one seeder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    /// Generation configuration.
    pub config: GenerationConfig,
    /// Root directory of the name corpora.
    pub names_root: Utf8PathBuf,
    /// Storage for the generated rows.
    pub target: PersistenceTarget,
}

impl SeederSettings {
    /// Loads settings from `args`, the environment and configuration files.
    ///
    /// Values are only collected here; [`Self::into_plan`] parses them.
    ///
    /// # Errors
    ///
    /// Returns [`SeederError::Settings`] when a source cannot be read.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, SeederError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::load_from_iter(args).map_err(|err| SeederError::settings(err.to_string()))
    }

    fn generation_settings(&self, parser: &mut SettingParser) -> GenerationSettings {
        GenerationSettings {
            number_of_users: parser.integer("number_of_users", self.number_of_users.as_ref()),
            unique_full_name: parser.flag("unique_full_name", self.unique_full_name.as_ref()),
            names_directory: SettingParser::text(self.names_directory.as_ref()),
            females: parser.flag("females", self.females.as_ref()),
            males: parser.flag("males", self.males.as_ref()),
            generated_passwords: parser
                .flag("generated_passwords", self.generated_passwords.as_ref()),
            password: SettingParser::text(self.password.as_ref()),
            email_domain_name: SettingParser::text(self.email_domain_name.as_ref()),
            max_rows_per_insert: parser
                .integer("max_rows_per_insert", self.max_rows_per_insert.as_ref()),
            missing_max_attempts: parser
                .integer("missing_max_attempts", self.missing_max_attempts.as_ref()),
            seed: parser.unsigned("seed", self.seed.as_ref()),
        }
    }

    /// Parses and validates every setting and builds the run plan.
    ///
    /// Malformed values, generation failures and the seeder's own failures
    /// are reported together, one entry per problem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError`] listing every invalid setting.
    pub fn into_plan(self) -> Result<SeedPlan, ConfigValidationError> {
        let mut parser = SettingParser::default();
        let settings = self.generation_settings(&mut parser);
        let dry_run = parser.flag("dry_run", self.dry_run.as_ref()).unwrap_or(false);
        let mut failures = parser.into_failures();
        let malformed: Vec<&'static str> = failures.iter().map(|failure| failure.field).collect();

        let config = match settings.validate() {
            Ok(config) => Some(config),
            Err(err) => {
                failures.extend(
                    err.into_failures()
                        .into_iter()
                        .filter(|failure| !malformed.contains(&failure.field)),
                );
                None
            }
        };

        let exceeds_statement = settings
            .max_rows_per_insert
            .and_then(|rows| usize::try_from(rows).ok())
            .is_some_and(|rows| rows > MAX_ROWS_PER_STATEMENT);
        if exceeds_statement {
            failures.push(FieldFailure {
                field: "max_rows_per_insert",
                reason: format!("must be at most {MAX_ROWS_PER_STATEMENT}"),
            });
        }

        let names_root = SettingParser::text(self.names_root.as_ref())
            .map_or_else(bundled_names_root, Utf8PathBuf::from);

        let target = if dry_run {
            Some(PersistenceTarget::DryRun)
        } else {
            let url = SettingParser::text(self.database_url.as_ref())
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty());
            if url.is_none() {
                failures.push(FieldFailure {
                    field: "database_url",
                    reason: "is required unless dry_run is enabled".to_owned(),
                });
            }
            url.map(PersistenceTarget::Database)
        };

        match (config, target) {
            (Some(config), Some(target)) if failures.is_empty() => Ok(SeedPlan {
                config,
                names_root,
                target,
            }),
            _ => Err(ConfigValidationError::new(failures)),
        }
    }
}

/// Environment variable carrying the setting `field`.
///
/// ```
/// use seeder::settings::env_var_name;
///
/// assert_eq!(env_var_name("number_of_users"), "RANDOM_USERS_NUMBER_OF_USERS");
/// ```
#[must_use]
pub fn env_var_name(field: &str) -> String {
    format!("{ENV_PREFIX}_{}", field.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    //! Unit tests for seeder configuration parsing.

    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;
    use user_generation::{GenderMix, PasswordPolicy, UniquenessPolicy};

    const VARS: [&str; 14] = [
        "RANDOM_USERS_NUMBER_OF_USERS",
        "RANDOM_USERS_UNIQUE_FULL_NAME",
        "RANDOM_USERS_NAMES_DIRECTORY",
        "RANDOM_USERS_FEMALES",
        "RANDOM_USERS_MALES",
        "RANDOM_USERS_GENERATED_PASSWORDS",
        "RANDOM_USERS_PASSWORD",
        "RANDOM_USERS_EMAIL_DOMAIN_NAME",
        "RANDOM_USERS_MAX_ROWS_PER_INSERT",
        "RANDOM_USERS_MISSING_MAX_ATTEMPTS",
        "RANDOM_USERS_SEED",
        "RANDOM_USERS_NAMES_ROOT",
        "RANDOM_USERS_DATABASE_URL",
        "RANDOM_USERS_DRY_RUN",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> SeederSettings {
        SeederSettings::load_from_args([OsString::from("insert-random-users")])
            .expect("config should load")
    }

    fn value(text: &str) -> Option<SettingValue> {
        Some(SettingValue::from(text))
    }

    fn settings() -> SeederSettings {
        SeederSettings {
            number_of_users: value("10"),
            unique_full_name: None,
            names_directory: None,
            females: None,
            males: None,
            generated_passwords: value("true"),
            password: None,
            email_domain_name: value("example.com"),
            max_rows_per_insert: None,
            missing_max_attempts: None,
            seed: None,
            names_root: None,
            database_url: value("postgres://localhost/users"),
            dry_run: None,
        }
    }

    #[rstest]
    fn missing_values_stay_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert!(settings.number_of_users.is_none());
        assert!(settings.unique_full_name.is_none());
        assert!(settings.females.is_none());
        assert!(settings.males.is_none());
        assert!(settings.email_domain_name.is_none());
        assert!(settings.database_url.is_none());
        assert!(settings.dry_run.is_none());
    }

    #[rstest]
    fn unset_flags_fall_back_to_their_defaults() {
        let _guard = lock_env(env_with(&[
            ("RANDOM_USERS_NUMBER_OF_USERS", "5"),
            ("RANDOM_USERS_EMAIL_DOMAIN_NAME", "example.com"),
            ("RANDOM_USERS_PASSWORD", "open-sesame"),
            ("RANDOM_USERS_DATABASE_URL", "postgres://localhost/users"),
        ]));

        let plan = load_from_empty_args().into_plan().expect("valid plan");

        assert_eq!(plan.config.uniqueness(), UniquenessPolicy::UniqueOnly);
        assert_eq!(plan.config.gender_mix(), GenderMix::Both);
        assert_eq!(
            plan.config.password_policy(),
            &PasswordPolicy::Fixed("open-sesame".to_owned())
        );
        assert_eq!(
            plan.target,
            PersistenceTarget::Database("postgres://localhost/users".to_owned())
        );
    }

    #[rstest]
    #[case::numeric_on("1", UniquenessPolicy::UniqueOnly, GenderMix::Both)]
    #[case::word_on("true", UniquenessPolicy::UniqueOnly, GenderMix::Both)]
    #[case::upper_on("TRUE", UniquenessPolicy::UniqueOnly, GenderMix::Both)]
    #[case::yes("yes", UniquenessPolicy::UniqueOnly, GenderMix::Both)]
    #[case::numeric_off("0", UniquenessPolicy::AllowDuplicates, GenderMix::MaleOnly)]
    #[case::word_off("false", UniquenessPolicy::AllowDuplicates, GenderMix::MaleOnly)]
    fn environment_flags_reach_the_plan(
        #[case] flag: &str,
        #[case] uniqueness: UniquenessPolicy,
        #[case] mix: GenderMix,
    ) {
        let _guard = lock_env(env_with(&[
            ("RANDOM_USERS_NUMBER_OF_USERS", "5"),
            ("RANDOM_USERS_EMAIL_DOMAIN_NAME", "example.com"),
            ("RANDOM_USERS_UNIQUE_FULL_NAME", flag),
            ("RANDOM_USERS_FEMALES", flag),
            ("RANDOM_USERS_GENERATED_PASSWORDS", "1"),
            ("RANDOM_USERS_DRY_RUN", "1"),
        ]));

        let plan = load_from_empty_args().into_plan().expect("valid plan");

        assert_eq!(plan.config.uniqueness(), uniqueness);
        assert_eq!(plan.config.gender_mix(), mix);
        assert_eq!(plan.config.password_policy(), &PasswordPolicy::PerUserRandom);
        assert_eq!(plan.target, PersistenceTarget::DryRun);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("RANDOM_USERS_NUMBER_OF_USERS", "25"),
            ("RANDOM_USERS_UNIQUE_FULL_NAME", "false"),
            ("RANDOM_USERS_NAMES_DIRECTORY", "hu"),
            ("RANDOM_USERS_MALES", "false"),
            ("RANDOM_USERS_EMAIL_DOMAIN_NAME", "example.org"),
            ("RANDOM_USERS_PASSWORD", "open-sesame"),
            ("RANDOM_USERS_MAX_ROWS_PER_INSERT", "5"),
            ("RANDOM_USERS_SEED", "2026"),
            ("RANDOM_USERS_DRY_RUN", "true"),
        ]));

        let plan = load_from_empty_args().into_plan().expect("valid plan");

        assert_eq!(plan.config.requested_count().get(), 25);
        assert_eq!(plan.config.uniqueness(), UniquenessPolicy::AllowDuplicates);
        assert_eq!(plan.config.locale(), "hu");
        assert_eq!(plan.config.gender_mix(), GenderMix::FemaleOnly);
        assert_eq!(plan.config.email_domain(), "example.org");
        assert_eq!(plan.config.max_batch_size().get(), 5);
        assert_eq!(plan.config.seed(), Some(2026));
        assert_eq!(plan.target, PersistenceTarget::DryRun);
    }

    #[rstest]
    fn malformed_numbers_are_reported_per_field() {
        let _guard = lock_env(env_with(&[
            ("RANDOM_USERS_NUMBER_OF_USERS", "abc"),
            ("RANDOM_USERS_MAX_ROWS_PER_INSERT", "xyz"),
            ("RANDOM_USERS_FEMALES", "maybe"),
            ("RANDOM_USERS_EMAIL_DOMAIN_NAME", "example.com"),
            ("RANDOM_USERS_GENERATED_PASSWORDS", "yes"),
            ("RANDOM_USERS_DRY_RUN", "1"),
        ]));

        let err = load_from_empty_args()
            .into_plan()
            .expect_err("malformed values");

        assert_eq!(err.reasons_for("number_of_users"), vec!["must be an integer"]);
        assert_eq!(err.reasons_for("max_rows_per_insert"), vec!["must be an integer"]);
        assert_eq!(
            err.reasons_for("females"),
            vec!["must be 1, 0, true, false, yes or no"]
        );
        assert_eq!(err.failures().len(), 3);
    }

    #[rstest]
    fn valid_settings_build_a_database_plan() {
        let plan = settings().into_plan().expect("valid plan");

        assert_eq!(plan.config.requested_count().get(), 10);
        assert_eq!(plan.names_root, bundled_names_root());
        assert_eq!(
            plan.target,
            PersistenceTarget::Database("postgres://localhost/users".to_owned())
        );
    }

    #[rstest]
    fn dry_runs_do_not_need_a_database() {
        let plan = SeederSettings {
            database_url: None,
            dry_run: value("yes"),
            ..settings()
        }
        .into_plan()
        .expect("valid plan");

        assert_eq!(plan.target, PersistenceTarget::DryRun);
    }

    #[rstest]
    #[case::at_limit(MAX_ROWS_PER_STATEMENT, true)]
    #[case::above_limit(MAX_ROWS_PER_STATEMENT + 1, false)]
    fn batch_size_fits_one_insert_statement(#[case] rows: usize, #[case] accepted: bool) {
        let result = SeederSettings {
            max_rows_per_insert: value(&rows.to_string()),
            ..settings()
        }
        .into_plan();

        match result {
            Ok(plan) => {
                assert!(accepted);
                assert_eq!(plan.config.max_batch_size().get(), rows);
            }
            Err(err) => {
                assert!(!accepted);
                assert_eq!(
                    err.reasons_for("max_rows_per_insert"),
                    vec![format!("must be at most {MAX_ROWS_PER_STATEMENT}")]
                );
            }
        }
    }

    #[rstest]
    fn generation_and_seeder_failures_are_reported_together() {
        let err = SeederSettings {
            number_of_users: None,
            database_url: value("   "),
            ..settings()
        }
        .into_plan()
        .expect_err("invalid plan");

        assert_eq!(err.reasons_for("number_of_users"), vec!["is required"]);
        assert_eq!(
            err.reasons_for("database_url"),
            vec!["is required unless dry_run is enabled"]
        );
    }

    #[rstest]
    #[case("number_of_users", "RANDOM_USERS_NUMBER_OF_USERS")]
    #[case("email_domain_name", "RANDOM_USERS_EMAIL_DOMAIN_NAME")]
    #[case("dry_run", "RANDOM_USERS_DRY_RUN")]
    fn fields_map_to_environment_variables(#[case] field: &str, #[case] expected: &str) {
        assert_eq!(env_var_name(field), expected);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!(
            "{:?}",
            SeederSettings {
                password: value("hunter2-secret"),
                ..settings()
            }
        );

        assert!(!rendered.contains("hunter2-secret"));
        assert!(!rendered.contains("postgres://"));
    }
}

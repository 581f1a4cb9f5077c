//! Generation settings and their validation.
//!
//! [`GenerationSettings`] holds raw, optional values as they arrive from the
//! environment or command line. [`GenerationSettings::validate`] checks every
//! field, collecting all failures, and only then builds the immutable
//! [`GenerationConfig`] a run is driven by.

use std::num::NonZeroUsize;

use camino::{Utf8Component, Utf8Path};

use crate::error::{ConfigValidationError, FieldFailure};

/// Locale directory used when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Batch size used when none is configured.
pub const DEFAULT_MAX_ROWS_PER_INSERT: usize = 50;

/// Retry bound used when none is configured.
pub const DEFAULT_MISSING_MAX_ATTEMPTS: usize = 10;

/// Minimum length of a fixed password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Whether repeated full names are discarded or kept as numbered duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniquenessPolicy {
    /// Every generated full name is distinct; repeats are discarded.
    UniqueOnly,
    /// Repeats are kept and later stored with numbered email addresses.
    AllowDuplicates,
}

/// Which given-name pools take part in sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderMix {
    /// Only female given names.
    FemaleOnly,
    /// Only male given names.
    MaleOnly,
    /// Female and male given names, chosen by a coin flip per draw.
    Both,
    /// No given names at all; generation stops immediately.
    Neither,
}

impl GenderMix {
    /// Builds the mix from the two enable flags.
    #[must_use]
    pub const fn from_flags(females: bool, males: bool) -> Self {
        match (females, males) {
            (true, true) => Self::Both,
            (true, false) => Self::FemaleOnly,
            (false, true) => Self::MaleOnly,
            (false, false) => Self::Neither,
        }
    }

    /// Returns `true` when female names are sampled.
    #[must_use]
    pub const fn includes_females(self) -> bool {
        matches!(self, Self::FemaleOnly | Self::Both)
    }

    /// Returns `true` when male names are sampled.
    #[must_use]
    pub const fn includes_males(self) -> bool {
        matches!(self, Self::MaleOnly | Self::Both)
    }
}

/// How row passwords are produced.
#[derive(Clone, PartialEq, Eq)]
pub enum PasswordPolicy {
    /// Every row shares the hash of this password.
    Fixed(String),
    /// Every row gets the hash of a fresh random token.
    PerUserRandom,
}

impl std::fmt::Debug for PasswordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(_) => f.write_str("Fixed(<redacted>)"),
            Self::PerUserRandom => f.write_str("PerUserRandom"),
        }
    }
}

/// Raw generation settings prior to validation.
///
/// Every field is optional so that a missing required value can be reported
/// alongside every other problem instead of failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Number of users to insert. Required, at least 1.
    pub number_of_users: Option<i64>,
    /// Discard repeated full names. Defaults to `true`.
    pub unique_full_name: Option<bool>,
    /// Locale directory holding the name files. Defaults to `en`.
    pub names_directory: Option<String>,
    /// Include female given names. Defaults to `true`.
    pub females: Option<bool>,
    /// Include male given names. Defaults to `true`.
    pub males: Option<bool>,
    /// Generate a random password per user. Defaults to `false`.
    pub generated_passwords: Option<bool>,
    /// Shared password, required unless passwords are generated.
    pub password: Option<String>,
    /// Domain part of every email address. Required.
    pub email_domain_name: Option<String>,
    /// Maximum rows per insert. Defaults to 50, at least 1.
    pub max_rows_per_insert: Option<i64>,
    /// Maximum shortfall retries. Defaults to 10, at least 1.
    pub missing_max_attempts: Option<i64>,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

/// Collects failures while validating settings field by field.
#[derive(Default)]
struct Failures(Vec<FieldFailure>);

impl Failures {
    fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.0.push(FieldFailure {
            field,
            reason: reason.into(),
        });
    }

    fn positive(
        &mut self,
        field: &'static str,
        value: Option<i64>,
        default: Option<usize>,
    ) -> Option<NonZeroUsize> {
        let Some(raw) = value else {
            if default.is_none() {
                self.push(field, "is required");
            }
            return default.and_then(NonZeroUsize::new);
        };
        if raw < 1 {
            self.push(field, "must be at least 1");
            return None;
        }
        let converted = usize::try_from(raw).ok().and_then(NonZeroUsize::new);
        if converted.is_none() {
            self.push(field, "is too large");
        }
        converted
    }
}

impl GenerationSettings {
    /// Validates every field and builds a [`GenerationConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError`] listing every field that failed.
    ///
    /// # Example
    ///
    /// ```
    /// use user_generation::GenerationSettings;
    ///
    /// let settings = GenerationSettings {
    ///     number_of_users: Some(5),
    ///     email_domain_name: Some("Example.com".to_owned()),
    ///     generated_passwords: Some(true),
    ///     ..GenerationSettings::default()
    /// };
    ///
    /// let config = settings.validate().expect("valid settings");
    /// assert_eq!(config.requested_count().get(), 5);
    /// assert_eq!(config.email_domain(), "example.com");
    /// ```
    pub fn validate(&self) -> Result<GenerationConfig, ConfigValidationError> {
        let mut failures = Failures::default();

        let requested_count = failures.positive("number_of_users", self.number_of_users, None);
        let max_batch_size = failures.positive(
            "max_rows_per_insert",
            self.max_rows_per_insert,
            Some(DEFAULT_MAX_ROWS_PER_INSERT),
        );
        let max_retry_attempts = failures.positive(
            "missing_max_attempts",
            self.missing_max_attempts,
            Some(DEFAULT_MISSING_MAX_ATTEMPTS),
        );

        let email_domain = validate_email_domain(&mut failures, self.email_domain_name.as_deref());
        let locale = validate_locale(&mut failures, self.names_directory.as_deref());
        let password_policy = validate_password(
            &mut failures,
            self.generated_passwords.unwrap_or(false),
            self.password.as_deref(),
        );

        match (
            requested_count,
            max_batch_size,
            max_retry_attempts,
            email_domain,
            locale,
            password_policy,
        ) {
            (
                Some(requested_count),
                Some(max_batch_size),
                Some(max_retry_attempts),
                Some(email_domain),
                Some(locale),
                Some(password_policy),
            ) if failures.0.is_empty() => Ok(GenerationConfig {
                requested_count,
                uniqueness: if self.unique_full_name.unwrap_or(true) {
                    UniquenessPolicy::UniqueOnly
                } else {
                    UniquenessPolicy::AllowDuplicates
                },
                locale,
                gender_mix: GenderMix::from_flags(
                    self.females.unwrap_or(true),
                    self.males.unwrap_or(true),
                ),
                password_policy,
                email_domain,
                max_batch_size,
                max_retry_attempts,
                seed: self.seed,
            }),
            _ => Err(ConfigValidationError::new(failures.0)),
        }
    }
}

fn validate_email_domain(failures: &mut Failures, value: Option<&str>) -> Option<String> {
    let domain = value.map(str::trim).unwrap_or_default();
    if domain.is_empty() {
        failures.push("email_domain_name", "is required");
        return None;
    }
    if domain.contains('@') || domain.chars().any(char::is_whitespace) {
        failures.push(
            "email_domain_name",
            "must be a bare domain name without '@' or whitespace",
        );
        return None;
    }
    if !domain.is_ascii() {
        failures.push("email_domain_name", "must contain only ASCII characters");
        return None;
    }
    Some(domain.to_ascii_lowercase())
}

fn validate_locale(failures: &mut Failures, value: Option<&str>) -> Option<String> {
    let locale = value.map_or(DEFAULT_LOCALE, str::trim);
    if locale.is_empty() {
        failures.push("names_directory", "must not be empty");
        return None;
    }
    if !is_single_directory_name(locale) {
        failures.push("names_directory", "must be a single directory name");
        return None;
    }
    Some(locale.to_owned())
}

/// Returns `true` when `value` is exactly one normal path component.
pub(crate) fn is_single_directory_name(value: &str) -> bool {
    let mut components = Utf8Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(Utf8Component::Normal(name)), None) if name == value
    )
}

fn validate_password(
    failures: &mut Failures,
    generated: bool,
    password: Option<&str>,
) -> Option<PasswordPolicy> {
    if generated {
        return Some(PasswordPolicy::PerUserRandom);
    }
    let Some(password) = password.filter(|value| !value.is_empty()) else {
        failures.push("password", "is required unless generated_passwords is enabled");
        return None;
    };
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        failures.push(
            "password",
            format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
        return None;
    }
    Some(PasswordPolicy::Fixed(password.to_owned()))
}

/// Validated, immutable configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    requested_count: NonZeroUsize,
    uniqueness: UniquenessPolicy,
    locale: String,
    gender_mix: GenderMix,
    password_policy: PasswordPolicy,
    email_domain: String,
    max_batch_size: NonZeroUsize,
    max_retry_attempts: NonZeroUsize,
    seed: Option<u64>,
}

impl GenerationConfig {
    /// Number of users the run tries to store.
    #[must_use]
    pub const fn requested_count(&self) -> NonZeroUsize {
        self.requested_count
    }

    /// Policy for repeated full names.
    #[must_use]
    pub const fn uniqueness(&self) -> UniquenessPolicy {
        self.uniqueness
    }

    /// Locale directory name holding the name files.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Enabled given-name pools.
    #[must_use]
    pub const fn gender_mix(&self) -> GenderMix {
        self.gender_mix
    }

    /// Password policy for materialized rows.
    #[must_use]
    pub const fn password_policy(&self) -> &PasswordPolicy {
        &self.password_policy
    }

    /// Lowercased email domain.
    #[must_use]
    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    /// Maximum rows handed to the persister in one call.
    #[must_use]
    pub const fn max_batch_size(&self) -> NonZeroUsize {
        self.max_batch_size
    }

    /// Maximum number of shortfall retries after the first round.
    #[must_use]
    pub const fn max_retry_attempts(&self) -> NonZeroUsize {
        self.max_retry_attempts
    }

    /// RNG seed, when the run should be reproducible.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

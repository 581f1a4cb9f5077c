//! Conversion of name-map entries into storable user rows.

use std::num::NonZeroUsize;

use crate::error::PasswordHashError;
use crate::fold::ascii_fold;
use crate::password::{PasswordHasher, PasswordSource};

/// One storable user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    /// Full name shown for the user.
    pub display_name: String,
    /// ASCII local part of the email, unique per occurrence of a name.
    pub email_local_part: String,
    /// Domain part of the email.
    pub email_domain: String,
    /// Hashed password.
    pub password_hash: String,
}

impl UserRow {
    /// The full email address, which is also the row's natural key.
    ///
    /// ```
    /// use user_generation::UserRow;
    ///
    /// let row = UserRow {
    ///     display_name: "Ana Smith".to_owned(),
    ///     email_local_part: "ana.smith2".to_owned(),
    ///     email_domain: "example.com".to_owned(),
    ///     password_hash: String::new(),
    /// };
    /// assert_eq!(row.email(), "ana.smith2@example.com");
    /// ```
    #[must_use]
    pub fn email(&self) -> String {
        format!("{}@{}", self.email_local_part, self.email_domain)
    }
}

/// Derives the base email local part for `full_name`.
///
/// Spaces become dots, the text is lowercased and then folded onto ASCII.
///
/// ```
/// use user_generation::email_local_part;
///
/// assert_eq!(email_local_part("Zoltán Kovács"), "zoltan.kovacs");
/// ```
#[must_use]
pub fn email_local_part(full_name: &str) -> String {
    ascii_fold(&full_name.replace(' ', ".").to_lowercase())
}

/// Appends the occurrence suffix to a base local part.
///
/// The first occurrence keeps the bare local part; occurrence `i >= 2` gets
/// the suffix `i`.
#[must_use]
pub fn suffixed_local_part(base: &str, occurrence: NonZeroUsize) -> String {
    if occurrence == NonZeroUsize::MIN {
        base.to_owned()
    } else {
        format!("{base}{occurrence}")
    }
}

/// Builds rows for name-map entries.
pub struct RecordMaterializer<'a, H: ?Sized> {
    email_domain: &'a str,
    passwords: &'a PasswordSource,
    hasher: &'a H,
}

impl<'a, H> RecordMaterializer<'a, H>
where
    H: PasswordHasher + ?Sized,
{
    /// Creates a materializer writing emails under `email_domain`.
    pub const fn new(email_domain: &'a str, passwords: &'a PasswordSource, hasher: &'a H) -> Self {
        Self {
            email_domain,
            passwords,
            hasher,
        }
    }

    /// Yields one row per occurrence of `full_name`.
    ///
    /// Rows are produced lazily so each can be appended to the pending batch
    /// as soon as it is hashed.
    pub fn rows_for<'s>(
        &'s self,
        full_name: &'s str,
        occurrences: NonZeroUsize,
    ) -> impl Iterator<Item = Result<UserRow, PasswordHashError>> + 's {
        let base = email_local_part(full_name);
        (1..=occurrences.get())
            .filter_map(NonZeroUsize::new)
            .map(move |occurrence| self.row(full_name, &base, occurrence))
    }

    fn row(
        &self,
        full_name: &str,
        base: &str,
        occurrence: NonZeroUsize,
    ) -> Result<UserRow, PasswordHashError> {
        Ok(UserRow {
            display_name: full_name.to_owned(),
            email_local_part: suffixed_local_part(base, occurrence),
            email_domain: self.email_domain.to_owned(),
            password_hash: self.passwords.next_hash(self.hasher)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    struct EchoHasher;

    impl PasswordHasher for EchoHasher {
        fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
            Ok(format!("hashed:{plaintext}"))
        }
    }

    struct FailingHasher;

    impl PasswordHasher for FailingHasher {
        fn hash(&self, _plaintext: &str) -> Result<String, PasswordHashError> {
            Err(PasswordHashError::new("backend offline"))
        }
    }

    fn occurrences(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero")
    }

    #[rstest]
    #[case("Ana Smith", "ana.smith")]
    #[case("Éva Szőke", "eva.szoke")]
    #[case("Anne Marie O'Neil", "anne.marie.o'neil")]
    #[case("Ægir Þórsson", "aegir.torsson")]
    fn local_parts_are_lowercase_ascii(#[case] full_name: &str, #[case] expected: &str) {
        assert_eq!(email_local_part(full_name), expected);
    }

    #[test]
    fn single_occurrence_yields_one_unsuffixed_row() {
        let passwords = PasswordSource::Fixed("shared".to_owned());
        let materializer = RecordMaterializer::new("example.com", &passwords, &EchoHasher);

        let rows: Vec<UserRow> = materializer
            .rows_for("Ana Smith", occurrences(1))
            .collect::<Result<_, _>>()
            .expect("rows");

        assert_eq!(
            rows,
            vec![UserRow {
                display_name: "Ana Smith".to_owned(),
                email_local_part: "ana.smith".to_owned(),
                email_domain: "example.com".to_owned(),
                password_hash: "shared".to_owned(),
            }]
        );
    }

    #[test]
    fn repeated_names_get_numeric_suffixes_from_two() {
        let passwords = PasswordSource::Fixed("shared".to_owned());
        let materializer = RecordMaterializer::new("example.com", &passwords, &EchoHasher);

        let emails: Vec<String> = materializer
            .rows_for("Mia Jones", occurrences(3))
            .map(|row| row.expect("row").email())
            .collect();

        assert_eq!(
            emails,
            vec![
                "mia.jones@example.com",
                "mia.jones2@example.com",
                "mia.jones3@example.com",
            ]
        );
    }

    #[test]
    fn per_user_passwords_differ_between_rows() {
        let passwords = PasswordSource::PerUserRandom;
        let materializer = RecordMaterializer::new("example.com", &passwords, &EchoHasher);

        let hashes: Vec<String> = materializer
            .rows_for("Eva Smith", occurrences(2))
            .map(|row| row.expect("row").password_hash)
            .collect();

        assert!(hashes.iter().all(|hash| hash.starts_with("hashed:")));
        assert_ne!(hashes.first(), hashes.get(1));
    }

    #[test]
    fn hashing_failures_surface_per_row() {
        let passwords = PasswordSource::PerUserRandom;
        let materializer = RecordMaterializer::new("example.com", &passwords, &FailingHasher);

        let mut rows = materializer.rows_for("Eva Smith", occurrences(1));

        assert_eq!(
            rows.next(),
            Some(Err(PasswordHashError::new("backend offline")))
        );
    }
}

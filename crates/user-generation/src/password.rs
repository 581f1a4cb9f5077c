//! Password hashing for generated rows.
//!
//! Hashing is an opaque one-way function behind [`PasswordHasher`]. The
//! shipped [`Argon2PasswordHasher`] produces PHC strings with a random salt.

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher as _, SaltString};

use crate::config::PasswordPolicy;
use crate::error::PasswordHashError;

/// Byte length of per-user random password tokens.
pub const RANDOM_TOKEN_BYTES: usize = 16;

/// One-way password hashing function.
pub trait PasswordHasher: Send + Sync {
    /// Hashes `plaintext` into its storable form.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the backend rejects the input.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;
}

/// Argon2id hasher with default parameters.
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the crate's default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let salt_bytes: [u8; 16] = rand::random();
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordHashError::new(err.to_string()))?;
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::new(err.to_string()))
    }
}

/// Returns a fresh hex-encoded random token for per-user passwords.
#[must_use]
pub fn random_token() -> String {
    let bytes: [u8; RANDOM_TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Supplies the password hash for each materialized row.
///
/// The fixed policy is hashed once when the source is prepared; every row of
/// the run then shares that hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// All rows share this precomputed hash.
    Fixed(String),
    /// Every row gets a hash of its own random token.
    PerUserRandom,
}

impl PasswordSource {
    /// Prepares the source for `policy`, hashing a fixed password up front.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the fixed password cannot be hashed.
    pub fn prepare<H>(policy: &PasswordPolicy, hasher: &H) -> Result<Self, PasswordHashError>
    where
        H: PasswordHasher + ?Sized,
    {
        match policy {
            PasswordPolicy::Fixed(password) => Ok(Self::Fixed(hasher.hash(password)?)),
            PasswordPolicy::PerUserRandom => Ok(Self::PerUserRandom),
        }
    }

    /// Returns the hash for the next row.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when a random token cannot be hashed.
    pub fn next_hash<H>(&self, hasher: &H) -> Result<String, PasswordHashError>
    where
        H: PasswordHasher + ?Sized,
    {
        match self {
            Self::Fixed(hash) => Ok(hash.clone()),
            Self::PerUserRandom => hasher.hash(&random_token()),
        }
    }
}

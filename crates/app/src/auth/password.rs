//! Password secrets and argon2 hashing.

use std::fmt;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString},
};
use rand::{RngCore, rngs::OsRng};
use zeroize::Zeroize;

use crate::auth::AuthServiceError;

const SALT_BYTES: usize = 16;

/// Plain-text password, wiped from memory on drop.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self(password)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Argon2id hashing with PHC-formatted output.
#[derive(Clone, Default)]
pub struct PasswordHashing {
    argon2: Argon2<'static>,
}

impl fmt::Debug for PasswordHashing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHashing").finish_non_exhaustive()
    }
}

impl PasswordHashing {
    /// Hashes `password` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::PasswordHash`] if hashing fails.
    pub fn hash(&self, password: &Password) -> Result<String, AuthServiceError> {
        let mut salt = [0_u8; SALT_BYTES];

        OsRng.fill_bytes(&mut salt);

        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| AuthServiceError::PasswordHash(e.to_string()))?;

        let hash = self
            .argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|e| AuthServiceError::PasswordHash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Checks `password` against a stored PHC hash.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::PasswordHash`] when the stored hash cannot
    /// be parsed; a mismatch is `Ok(false)`.
    pub fn verify(&self, password: &Password, hash: &str) -> Result<bool, AuthServiceError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| AuthServiceError::PasswordHash(e.to_string()))?;

        match self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AuthServiceError::PasswordHash(error.to_string())),
        }
    }

    /// Minimum-cost parameters so tests do not spend seconds hashing.
    #[cfg(test)]
    pub(crate) fn fast() -> Self {
        use argon2::{Algorithm, Params, Version};

        let params = Params::new(
            Params::MIN_M_COST,
            Params::MIN_T_COST,
            Params::MIN_P_COST,
            None,
        )
        .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

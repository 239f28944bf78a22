// Password hashing and verification service

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::auth::error::AuthError;

/// Password service for hashing and verification (Argon2id, PHC strings)
#[derive(Clone, Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    /// Argon2id with explicit cost parameters
    ///
    /// Hashes record their own parameters, so verification works across
    /// services configured with different costs.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash a password with a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                AuthError::PasswordHash
            })
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `Ok(false)`; an unparsable stored hash is an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!("Stored password hash is not a valid PHC string: {}", e);
            AuthError::PasswordHash
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                error!("Password verification failed: {}", e);
                Err(AuthError::PasswordHash)
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn fast_password_service() -> PasswordService {
    let params = Params::new(1024, 1, 1, None).expect("valid argon2 params");
    PasswordService::with_params(params)
}

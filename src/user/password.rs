use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::shared::AppError;

/// Salted Argon2id hashing for user passwords
#[derive(Debug, Clone)]
pub struct PasswordHashing {
    params: Params,
}

impl PasswordHashing {
    /// Argon2id with an explicit memory (KiB) and iteration cost
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, 1, None).map_err(|e| {
            warn!(error = %e, memory_kib, iterations, "Invalid Argon2 parameters");
            AppError::Internal
        })?;
        Ok(Self { params })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::with_cost(config.password_memory_kib, config.password_iterations)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a raw password into a PHC string with a fresh random salt
    #[instrument(skip_all)]
    pub fn hash(&self, raw_password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(raw_password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                warn!(error = %e, "Failed to hash password");
                AppError::Internal
            })
    }

    /// Checks a raw password against a stored PHC string.
    /// A malformed stored hash never verifies.
    #[instrument(skip_all)]
    pub fn verify(&self, raw_password: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        let matches = self
            .argon2()
            .verify_password(raw_password.as_bytes(), &parsed)
            .is_ok();
        debug!(matches, "Password verification finished");
        matches
    }
}

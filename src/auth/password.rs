//! Password hashing and verification
//!
//! New digests are bcrypt. Verification dispatches on the algorithm id
//! embedded in the stored digest, so Argon2 PHC strings keep verifying.

use crate::{config::AppConfig, error::AppError};
use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};

/// Default bcrypt cost factor
pub const DEFAULT_COST: u32 = 12;

/// Password hasher with a fixed cost factor
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create hasher with the default cost (12 rounds)
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_cost(config.security.bcrypt_cost)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            AppError::Internal(format!("Failed to hash password: {}", e))
        })
    }

    /// Verify a password against a stored digest
    ///
    /// Malformed or unsupported digests verify as `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if is_bcrypt(hash) {
            return match bcrypt::verify(password, hash) {
                Ok(matches) => matches,
                Err(e) => {
                    tracing::debug!("Failed to parse bcrypt hash: {:?}", e);
                    false
                }
            };
        }

        if hash.starts_with("$argon2") {
            let parsed_hash = match PasswordHash::new(hash) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!("Failed to parse argon2 hash: {:?}", e);
                    return false;
                }
            };
            return Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok();
        }

        tracing::debug!("Unsupported password hash format");
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}

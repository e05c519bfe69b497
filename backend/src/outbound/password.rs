//! Argon2id password hasher.
//!
//! Stored values are PHC strings (`$argon2id$v=19$...`) carrying their own
//! salt and parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Memory cost in KiB, iterations and lanes.
const MEMORY_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

fn argon2_instance() -> Result<Argon2<'static>, PasswordHashError> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, LANES, None)
        .map_err(|err| PasswordHashError::rejected(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Check `raw` against a value produced by [`PasswordHasher::hash`].
    ///
    /// Unparseable stored values never verify.
    pub fn verify(&self, raw: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        argon2_instance()
            .map(|argon2| argon2.verify_password(raw.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, raw: &str) -> Result<String, PasswordHashError> {
        if raw.is_empty() {
            return Err(PasswordHashError::rejected("empty password"));
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2_instance()?
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::rejected(err.to_string()))?;
        Ok(hash.to_string())
    }
}

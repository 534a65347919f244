//! Argon2id implementation of the PasswordHasher port

use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use rand::Rng;

use crate::config::Argon2Params;
use crate::domain::result::{Error, Result};
use crate::ports::PasswordHasher;

/// Hashes passwords into PHC strings (`$argon2id$v=19$m=...`)
pub struct Argon2PasswordHasher {
    params: Argon2Params,
}

impl Argon2PasswordHasher {
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            Some(self.params.hash_len as usize),
        )
        .map_err(|e| Error::Config(format!("Invalid argon2 params: {:?}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new(Argon2Params::default())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        // 16 byte salt
        let salt: [u8; 16] = rand::thread_rng().gen();
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| Error::Other(format!("Failed to encode salt: {}", e)))?;

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Other(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| Error::Other(format!("Malformed password hash: {}", e)))?;

        // Cost parameters are read from the hash itself
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Other(format!("Failed to verify password: {}", e))),
        }
    }
}

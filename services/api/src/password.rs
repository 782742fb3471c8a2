//! Password hashing with Argon2id
//!
//! Hashes embed algorithm, parameters and salt in PHC string form, so stored
//! hashes created with older cost settings keep verifying after the
//! configured cost changes.

use anyhow::Result;
use argon2::{
    Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};

/// Password hashing service with a configurable time cost
#[derive(Clone)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    /// Create a service with the given time cost (iteration count)
    pub fn new(time_cost: u32) -> Result<Self> {
        let params = Params::new(Params::DEFAULT_M_COST, time_cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| anyhow::anyhow!("Invalid password hash parameters: {}", e))?;

        Ok(PasswordService { params })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            self.params.clone(),
        )
    }

    /// Hash a plaintext password
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored hash
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed_hash) => self
                .hasher()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::new(1).unwrap();
        let hash = service.hash("pw1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("pw1", &hash));
        assert!(!service.verify("wrong", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = PasswordService::new(1).unwrap();
        let first = service.hash("pw1").unwrap();
        let second = service.hash("pw1").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_tolerates_garbage_hash() {
        let service = PasswordService::new(1).unwrap();
        assert!(!service.verify("pw1", "not-a-phc-string"));
    }

    #[test]
    fn test_verify_accepts_hash_from_other_cost() {
        let low = PasswordService::new(1).unwrap();
        let high = PasswordService::new(3).unwrap();

        let hash = low.hash("pw1").unwrap();
        assert!(high.verify("pw1", &hash));
    }
}

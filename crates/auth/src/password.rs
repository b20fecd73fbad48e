//! Password hashing (bcrypt).

use thiserror::Error;

/// Work factor used when none is configured.
pub const DEFAULT_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Hash a plaintext password with a fresh salt.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(plain, cost)?)
}

/// Compare a plaintext password against a stored bcrypt hash.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(plain, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lowest cost bcrypt accepts; keeps the suite fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_verifies_only_the_hashed_password() {
        let hash = hash_password("hunter22", TEST_COST).unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn hashing_is_salted() {
        let a = hash_password("same", TEST_COST).unwrap();
        let b = hash_password("same", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-bcrypt-hash").is_err());
    }
}

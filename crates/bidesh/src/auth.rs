use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::PlatformError;

/// Password given to every seeded demo account.
pub const DEMO_PASSWORD: &str = "password";

pub fn hash_password(password: &str) -> Result<String, PlatformError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PlatformError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, PlatformError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PlatformError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_roundtrip() {
        let hash = hash_password(DEMO_PASSWORD).unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(DEMO_PASSWORD, &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password(DEMO_PASSWORD).unwrap();
        let b = hash_password(DEMO_PASSWORD).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_hash_is_an_error() {
        assert!(verify_password(DEMO_PASSWORD, "not-a-hash").is_err());
    }
}

//! Password hashing and verification.
//!
//! Passwords are stored as argon2 PHC strings; the plaintext never reaches
//! the storage layer.

use crate::error::AppError;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::Rng;

/// Hash a password with a fresh random salt.
///
/// Returns the full PHC string (algorithm, parameters, salt, hash).
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; 16];
    let mut rng = rand::rng();
    rng.fill(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?
        .to_string();

    Ok(phc)
}

/// Verify a password against a stored PHC string.
///
/// Returns false for both a wrong password and an unparseable hash; the
/// caller cannot distinguish the two.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}

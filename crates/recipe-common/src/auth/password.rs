//! Password hashing (Argon2id) and strength rules

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Returns `Ok(false)` on mismatch; errors only on a malformed stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// At least 8 characters with at least one letter and one digit
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.chars().count() < 8 {
        return Err(AppError::validation("Password must be at least 8 characters long"));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(AppError::validation("Password must contain at least one letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("Password must contain at least one digit"));
    }
    Ok(())
}

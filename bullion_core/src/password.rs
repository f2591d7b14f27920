//! Password hashing and verification using Argon2

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::errors::{BillError, BillResult};

/// Hash a password into a PHC string (`$argon2id$...`)
pub fn hash_password(password: &str) -> BillResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| BillError::Internal {
            message: format!("Failed to hash password: {}", e),
        })?;

    Ok(password_hash.to_string())
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> BillResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| BillError::Internal {
        message: format!("Failed to parse password hash: {}", e),
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(BillError::Internal {
            message: format!("Password verification failed: {}", e),
        }),
    }
}

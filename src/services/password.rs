//! Password hashing module
//!
//! Passwords are never kept in plaintext once a user is "saved". Hashes use
//! Argon2id with the crate's default parameters and a fresh random salt,
//! stored in PHC string format.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

/// Hash a password for storage.
///
/// # Errors
///
/// Returns an error if the hasher rejects the input.
///
/// # Example
///
/// ```ignore
/// use coldapi::services::password::hash_password;
///
/// let hash = hash_password("my_password")?;
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        .context("Password hashing failed")?;

    Ok(password_hash.to_string())
}

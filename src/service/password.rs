use crate::error::CatalogError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password using Argon2id with a fresh random salt.
/// Output is a PHC string: `$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`.
pub fn hash_password(password: &str) -> Result<String, CatalogError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CatalogError::PasswordHash(e.to_string()))?;
    Ok(password_hash.to_string())
}

/// Check `password` against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash_password`] run on the blocking thread pool.
pub async fn hash_password_blocking(password: String) -> Result<String, CatalogError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

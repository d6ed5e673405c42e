//! Password hashing and random tokens for the seeded store.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng as SaltRng},
};
use rand::TryRngCore;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Random bits in the store's `config_encryption` key.
pub const ENCRYPTION_KEY_BITS: usize = 1024;

/// Random bits in the default API credential.
pub const API_KEY_BITS: usize = 256;

/// Errors that can occur while producing secrets.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Failed to hash admin password")]
    PasswordHash,

    #[error("Operating system random source failed: {0}")]
    Entropy(String),
}

/// Hash the admin password with Argon2id.
///
/// The PHC string embeds its own salt, so the `salt` column stays empty.
///
/// # Errors
///
/// Returns [`SecretError::PasswordHash`] if hashing fails.
pub fn hash_password(password: &SecretString) -> Result<String, SecretError> {
    let salt = SaltString::generate(&mut SaltRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| SecretError::PasswordHash)
}

/// Hex-encoded token with `bits` bits read from the operating system's
/// random source. `bits` is rounded up to whole bytes.
///
/// # Errors
///
/// Returns [`SecretError::Entropy`] if the random source is unavailable.
pub fn random_token(bits: usize) -> Result<SecretString, SecretError> {
    let mut bytes = vec![0_u8; bits.div_ceil(8)];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SecretError::Entropy(e.to_string()))?;
    Ok(SecretString::from(hex::encode(bytes)))
}

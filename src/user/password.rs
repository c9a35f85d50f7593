//! Password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings, which carry the algorithm, parameters and a
//! per-password random salt. Verification goes through the argon2 verifier, which
//! compares digests in constant time. Both run on tokio's blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;
use tracing::warn;

use crate::shared::AppError;

const DUMMY_PASSWORD: &str = "no-such-user-password";

/// Hash checked when the email is unknown, so a miss costs as much as a wrong password
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_blocking(DUMMY_PASSWORD).ok())
        .as_deref()
}

fn hash_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            warn!(error = %e, "Failed to hash password");
            AppError::Internal
        })
}

fn join_error(e: tokio::task::JoinError) -> AppError {
    warn!(error = %e, "Password task failed");
    AppError::Internal
}

/// Hash a password with a fresh random salt
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(join_error)?
}

/// Verify a password against a stored PHC hash.
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Checks a login attempt against the stored hash, if the user exists.
///
/// Without a stored hash the password is still run through the verifier, and the
/// result is always `false`.
pub async fn check_password(password: &str, stored_hash: Option<&str>) -> Result<bool, AppError> {
    let password = password.to_string();
    let stored_hash = stored_hash.map(str::to_string);

    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            if let Some(hash) = dummy_hash() {
                verify_password(&password, hash);
            }
            false
        }
    })
    .await
    .map_err(join_error)
}

//! Password hashing via argon2.
//!
//! Hashing is CPU-bound on purpose, so both helpers run on the blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

use super::AuthError;

/// Hash a password with argon2 default parameters and a fresh random salt.
pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("hash task: {e}")))?
}

/// Verify a password against a stored PHC hash string.
///
/// Returns `Ok(false)` on mismatch. A hash that cannot be parsed is an
/// internal error, not a credential error.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("verify task: {e}")))?
}

/// Burn the same work as a real verification when the account does not exist.
pub async fn verify_against_dummy(password: &str) -> Result<(), AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || verify_blocking(&password, dummy_hash()?).map(|_| ()))
        .await
        .map_err(|e| AuthError::Internal(format!("verify task: {e}")))?
}

fn hash_blocking(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("argon2 hash: {e}")))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("argon2 parse: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Computes the dummy hash up front so the first unknown-email login costs
/// one verification, like every other failed login.
pub fn prepare_dummy_hash() -> Result<(), AuthError> {
    dummy_hash().map(|_| ())
}

fn dummy_hash() -> Result<&'static str, AuthError> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_blocking("not-a-real-password")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_round_trips_and_rejects_wrong_password() {
        let hash = hash_password("hunter2").await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash).await.unwrap());
        assert!(!verify_password("hunter3", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() {
        let a = hash_password("same").await.unwrap();
        let b = hash_password("same").await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn building_an_authenticator_prepares_the_dummy_hash() {
        let _auth = crate::auth::Authenticator::new(
            std::sync::Arc::new(crate::memory::InMemoryDatabase::new()),
            b"secret",
        );
        let hash = DUMMY_HASH.get().expect("dummy hash ready");
        assert!(hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn garbage_hash_is_an_internal_error() {
        let err = verify_password("pw", "not-a-phc-string").await.unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}

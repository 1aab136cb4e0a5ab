//! Credential verification and token issuance.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::auth::Principal;
use crate::db::CustomerRepository;
use crate::dto::LoginRequest;
use crate::error::{AppError, Result};
use crate::state::AppState;
use mercado_core::Email;

/// Verify credentials and issue a bearer token.
///
/// Every failure path collapses to the same "bad credentials" response so
/// the endpoint cannot be used to probe which emails have accounts.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for unknown email, passwordless
/// account or wrong password.
pub async fn login(state: &AppState, request: &LoginRequest) -> Result<String> {
    let Ok(email) = Email::parse(&request.email) else {
        return Err(bad_credentials());
    };

    let repo = CustomerRepository::new(state.pool());
    let auth = repo
        .get_auth_by_email(&email)
        .await?
        .ok_or_else(bad_credentials)?;
    let hash = auth.password_hash.ok_or_else(bad_credentials)?;

    verify_password(&request.password, &hash)?;

    let token = state
        .tokens()
        .generate(auth.id, email.as_str(), &auth.roles)?;
    Ok(token)
}

/// Issue a fresh token for an already-authenticated principal, restarting
/// the expiry window.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if signing fails.
pub fn refresh(state: &AppState, principal: &Principal) -> Result<String> {
    let token = state
        .tokens()
        .generate(principal.id, &principal.username, &principal.roles)?;
    Ok(token)
}

/// Hash a plaintext password for storage.
///
/// # Errors
///
/// Returns `AppError::Internal` if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Check a plaintext password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is invalid: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| bad_credentials())
}

fn bad_credentials() -> AppError {
    AppError::Unauthorized("bad credentials".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password("correct-horse-battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct-horse-battery", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("correct-horse-battery").unwrap();
        let err = verify_password("wrong-horse", &hash).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_corrupted_hash_is_internal_error() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}

//! Authentication and authorization logic.
//!
//! Registration stores only an argon2 hash of the password. Login issues a
//! stateless signed token; nothing about sessions is persisted server-side.

pub mod password;
pub mod token;

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{User, UserIdentity};
use crate::ports::{DatabaseService, PortError};
use token::TokenKeys;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email is already registered")]
    AlreadyExists,

    /// Unknown email and wrong password are deliberately the same variant.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token missing")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Store error: {0}")]
    Store(#[from] PortError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Verifies credentials and issues/validates session tokens.
#[derive(Clone)]
pub struct Authenticator {
    db: Arc<dyn DatabaseService>,
    keys: TokenKeys,
}

impl Authenticator {
    pub fn new(db: Arc<dyn DatabaseService>, jwt_secret: &[u8]) -> Self {
        if let Err(e) = password::prepare_dummy_hash() {
            warn!(error = %e, "could not prepare dummy password hash");
        }
        Self {
            db,
            keys: TokenKeys::new(jwt_secret),
        }
    }

    pub async fn register(&self, email: &str, raw_password: &str) -> Result<User, AuthError> {
        match self.db.get_user_by_email(email).await {
            Ok(_) => return Err(AuthError::AlreadyExists),
            Err(PortError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let hashed = password::hash_password(raw_password).await?;
        // The store's uniqueness check catches a registration racing this one.
        let user = self
            .db
            .create_user_with_email(email, &hashed)
            .await
            .map_err(|e| match e {
                PortError::AlreadyExists(_) => AuthError::AlreadyExists,
                other => AuthError::Store(other),
            })?;

        info!(user_id = %user.user_id, "registered new user");
        Ok(user)
    }

    pub async fn login(&self, email: &str, raw_password: &str) -> Result<String, AuthError> {
        let credentials = match self.db.get_user_by_email(email).await {
            Ok(credentials) => credentials,
            Err(PortError::NotFound(_)) => {
                password::verify_against_dummy(raw_password).await?;
                warn!("login attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !password::verify_password(raw_password, &credentials.hashed_password).await? {
            warn!(user_id = %credentials.user_id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let identity = UserIdentity {
            user_id: credentials.user_id,
            email: credentials.email,
        };
        self.keys.issue(&identity, Utc::now())
    }

    /// Resolves the value of an `Authorization` header to the caller's identity.
    pub fn authorize(&self, authorization: Option<&str>) -> Result<UserIdentity, AuthError> {
        let header = authorization.map(str::trim).unwrap_or_default();
        let mut parts = header.splitn(2, ' ');
        let scheme = parts.next().unwrap_or_default();
        let token = parts.next().map(str::trim).unwrap_or_default();

        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        if !scheme.eq_ignore_ascii_case("Bearer") {
            return Err(AuthError::InvalidToken);
        }
        self.keys.verify(token)
    }
}

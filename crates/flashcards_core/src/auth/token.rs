//! Session token issuance and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;
use crate::domain::UserIdentity;

/// Session lifetime: 7 days.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Signs a token for `identity` that expires `TOKEN_TTL_DAYS` after `issued_at`.
    pub fn issue(&self, identity: &UserIdentity, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: identity.user_id,
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Checks signature and expiry; any failure is `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| UserIdentity {
                user_id: data.claims.sub,
                email: data.claims.email,
            })
            .map_err(|_| AuthError::InvalidToken)
    }
}

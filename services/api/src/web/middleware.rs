//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use flashcards_core::AuthError;
use std::sync::Arc;
use tracing::debug;

use crate::web::{error::AppError, state::AppState};

/// Middleware that validates the `Authorization: Bearer <token>` header.
///
/// If valid, inserts the caller's `UserIdentity` into request extensions for
/// handlers to use. A missing token is a 401, a bad or expired one a 403.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is present but not visible ASCII is a bad credential, not a missing one.
    let identity = match req.headers().get(header::AUTHORIZATION) {
        None => state.authenticator.authorize(None),
        Some(value) => match value.to_str() {
            Ok(authorization) => state.authenticator.authorize(Some(authorization)),
            Err(_) => Err(AuthError::InvalidToken),
        },
    };

    let identity = identity.map_err(|e| {
        debug!(error = %e, "rejected request");
        AppError::from(e)
    })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

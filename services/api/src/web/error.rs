//! services/api/src/web/error.rs
//!
//! Maps every failure at the request boundary to an HTTP status and a JSON
//! `{"message": ...}` body. Internal details are logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flashcards_core::{AuthError, PortError, StudyError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// The body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input, duplicate registration, bad credentials.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Absent or not owned; the two are indistinguishable on purpose.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A framework-level rejection that keeps its own status, e.g. 405, 413 or 415.
    #[error("Rejected with {0}: {1}")]
    Rejected(StatusCode, String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn deck_not_found() -> Self {
        AppError::NotFound("Deck not found".to_string())
    }

    pub fn card_not_found() -> Self {
        AppError::NotFound("Card not found".to_string())
    }
}

/// Fallback for paths no route matches.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Fallback for a known path requested with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::Rejected(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            AppError::Rejected(status, m) => (status, m),
            AppError::Internal(detail) => {
                error!(%detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<PortError> for AppError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::NotFound(m) => AppError::NotFound(m),
            PortError::AlreadyExists(m) => AppError::BadRequest(m),
            PortError::Unexpected(m) => AppError::Internal(m),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AlreadyExists | AuthError::InvalidCredentials => {
                AppError::BadRequest(e.to_string())
            }
            AuthError::MissingToken => AppError::Unauthorized(e.to_string()),
            AuthError::InvalidToken => AppError::Forbidden(e.to_string()),
            AuthError::Store(inner) => AppError::Internal(inner.to_string()),
            AuthError::Internal(m) => AppError::Internal(m),
        }
    }
}

impl From<StudyError> for AppError {
    fn from(e: StudyError) -> Self {
        match e {
            StudyError::DeckNotFound => AppError::deck_not_found(),
            StudyError::CardNotFound => AppError::card_not_found(),
            StudyError::NoCardsAvailable => AppError::NotFound(e.to_string()),
            StudyError::Store(inner) => AppError::Internal(inner.to_string()),
        }
    }
}

/// Converts a store error, naming the missing thing for `NotFound`.
pub fn or_not_found(missing: fn() -> AppError) -> impl FnOnce(PortError) -> AppError {
    move |e| match e {
        PortError::NotFound(_) => missing(),
        other => other.into(),
    }
}

//! services/api/src/web/decks.rs
//!
//! Deck CRUD. Every operation is scoped to the caller; a deck owned by someone
//! else answers exactly like a deck that does not exist.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use flashcards_core::UserIdentity;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::web::{
    error::{or_not_found, AppError, AppResult, ErrorResponse},
    extract::{IdPath, ValidatedJson},
    rest::{DeckResponse, MessageResponse},
    state::AppState,
};

#[derive(Deserialize, Validate, ToSchema)]
pub struct DeckRequest {
    #[validate(length(min = 1, message = "Deck name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// GET /api/decks - List the caller's decks
#[utoipa::path(
    get,
    path = "/api/decks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Decks owned by the caller", body = [DeckResponse]),
        (status = 401, description = "Token missing", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_decks_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
) -> AppResult<Json<Vec<DeckResponse>>> {
    let decks = state.db.list_decks_by_user(user.user_id).await?;
    Ok(Json(decks.into_iter().map(DeckResponse::from).collect()))
}

/// POST /api/decks - Create a deck
#[utoipa::path(
    post,
    path = "/api/decks",
    security(("bearer" = [])),
    request_body = DeckRequest,
    responses(
        (status = 201, description = "Deck created", body = DeckResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_deck_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    ValidatedJson(req): ValidatedJson<DeckRequest>,
) -> AppResult<impl IntoResponse> {
    let deck = state
        .db
        .create_deck(user.user_id, &req.name, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(DeckResponse::from(deck))))
}

/// PUT /api/decks/{deck_id} - Rename or redescribe a deck
#[utoipa::path(
    put,
    path = "/api/decks/{deck_id}",
    security(("bearer" = [])),
    params(("deck_id" = Uuid, Path, description = "Deck id")),
    request_body = DeckRequest,
    responses(
        (status = 200, description = "Deck updated", body = DeckResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Deck not found", body = ErrorResponse)
    )
)]
pub async fn update_deck_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    IdPath(deck_id): IdPath<Uuid>,
    ValidatedJson(req): ValidatedJson<DeckRequest>,
) -> AppResult<Json<DeckResponse>> {
    let deck = state
        .db
        .update_deck(deck_id, user.user_id, &req.name, &req.description)
        .await
        .map_err(or_not_found(AppError::deck_not_found))?;
    Ok(Json(deck.into()))
}

/// DELETE /api/decks/{deck_id} - Delete a deck and all of its cards
#[utoipa::path(
    delete,
    path = "/api/decks/{deck_id}",
    security(("bearer" = [])),
    params(("deck_id" = Uuid, Path, description = "Deck id")),
    responses(
        (status = 200, description = "Deck deleted", body = MessageResponse),
        (status = 404, description = "Deck not found", body = ErrorResponse)
    )
)]
pub async fn delete_deck_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    IdPath(deck_id): IdPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state
        .db
        .delete_deck(deck_id, user.user_id)
        .await
        .map_err(or_not_found(AppError::deck_not_found))?;
    info!(%deck_id, user_id = %user.user_id, "deleted deck");
    Ok(Json(MessageResponse::new("Deck deleted")))
}

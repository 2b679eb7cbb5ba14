//! services/api/src/web/study.rs
//!
//! Study mode and statistics endpoints.

use axum::{extract::State, Extension, Json};
use flashcards_core::UserIdentity;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::web::{
    error::{AppResult, ErrorResponse},
    extract::{IdPath, ValidatedJson},
    rest::{CardResponse, MessageResponse, StatisticsResponse},
    state::AppState,
};

#[derive(Deserialize, Validate, ToSchema)]
pub struct OutcomeRequest {
    /// Whether the learner answered the card correctly.
    pub correct: bool,
}

/// GET /api/decks/{deck_id}/study - Draw a random card from the deck
#[utoipa::path(
    get,
    path = "/api/decks/{deck_id}/study",
    security(("bearer" = [])),
    params(("deck_id" = Uuid, Path, description = "Deck id")),
    responses(
        (status = 200, description = "A uniformly drawn card", body = CardResponse),
        (status = 404, description = "Deck not found, or the deck has no cards", body = ErrorResponse)
    )
)]
pub async fn next_card_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    IdPath(deck_id): IdPath<Uuid>,
) -> AppResult<Json<CardResponse>> {
    let card = state.selector.next_card(deck_id, user.user_id).await?;
    Ok(Json(card.into()))
}

/// POST /api/decks/{deck_id}/study/{card_id} - Record the outcome of a study attempt
#[utoipa::path(
    post,
    path = "/api/decks/{deck_id}/study/{card_id}",
    security(("bearer" = [])),
    params(
        ("deck_id" = Uuid, Path, description = "Deck id"),
        ("card_id" = Uuid, Path, description = "Card id")
    ),
    request_body = OutcomeRequest,
    responses(
        (status = 200, description = "Outcome recorded", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Deck or card not found", body = ErrorResponse)
    )
)]
pub async fn record_outcome_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    IdPath((deck_id, card_id)): IdPath<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<OutcomeRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .recorder
        .record_outcome(deck_id, card_id, user.user_id, req.correct)
        .await?;
    Ok(Json(MessageResponse::new("Outcome recorded")))
}

/// GET /api/statistics - Success rate and attempt count across all of the caller's cards
#[utoipa::path(
    get,
    path = "/api/statistics",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Aggregate statistics", body = StatisticsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn statistics_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
) -> AppResult<Json<StatisticsResponse>> {
    let stats = state.statistics.compute_statistics(user.user_id).await?;
    Ok(Json(stats.into()))
}

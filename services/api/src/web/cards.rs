//! services/api/src/web/cards.rs
//!
//! Card CRUD within a deck. The deck is ownership-checked first; card lookups
//! are then confined to that deck.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use flashcards_core::UserIdentity;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::web::{
    error::{or_not_found, AppError, AppResult, ErrorResponse},
    extract::{IdPath, ValidatedJson},
    rest::{CardResponse, MessageResponse},
    state::AppState,
};

#[derive(Deserialize, Validate, ToSchema)]
pub struct CardRequest {
    #[validate(length(min = 1, message = "Question must not be empty"))]
    pub question: String,
    #[validate(length(min = 1, message = "Answer must not be empty"))]
    pub answer: String,
}

async fn owned_deck(state: &AppState, deck_id: Uuid, user: &UserIdentity) -> AppResult<()> {
    state
        .db
        .get_deck_for_user(deck_id, user.user_id)
        .await
        .map(|_| ())
        .map_err(or_not_found(AppError::deck_not_found))
}

/// GET /api/decks/{deck_id}/cards - List the cards of a deck
#[utoipa::path(
    get,
    path = "/api/decks/{deck_id}/cards",
    security(("bearer" = [])),
    params(("deck_id" = Uuid, Path, description = "Deck id")),
    responses(
        (status = 200, description = "Cards in the deck", body = [CardResponse]),
        (status = 404, description = "Deck not found", body = ErrorResponse)
    )
)]
pub async fn list_cards_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    IdPath(deck_id): IdPath<Uuid>,
) -> AppResult<Json<Vec<CardResponse>>> {
    owned_deck(&state, deck_id, &user).await?;
    let cards = state.db.list_cards_by_deck(deck_id).await?;
    Ok(Json(cards.into_iter().map(CardResponse::from).collect()))
}

/// POST /api/decks/{deck_id}/cards - Add a card to a deck
#[utoipa::path(
    post,
    path = "/api/decks/{deck_id}/cards",
    security(("bearer" = [])),
    params(("deck_id" = Uuid, Path, description = "Deck id")),
    request_body = CardRequest,
    responses(
        (status = 201, description = "Card created", body = CardResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Deck not found", body = ErrorResponse)
    )
)]
pub async fn create_card_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    IdPath(deck_id): IdPath<Uuid>,
    ValidatedJson(req): ValidatedJson<CardRequest>,
) -> AppResult<impl IntoResponse> {
    owned_deck(&state, deck_id, &user).await?;
    let card = state
        .db
        .create_card(deck_id, &req.question, &req.answer)
        .await
        .map_err(or_not_found(AppError::deck_not_found))?;
    Ok((StatusCode::CREATED, Json(CardResponse::from(card))))
}

/// PUT /api/decks/{deck_id}/cards/{card_id} - Edit a card's text
#[utoipa::path(
    put,
    path = "/api/decks/{deck_id}/cards/{card_id}",
    security(("bearer" = [])),
    params(
        ("deck_id" = Uuid, Path, description = "Deck id"),
        ("card_id" = Uuid, Path, description = "Card id")
    ),
    request_body = CardRequest,
    responses(
        (status = 200, description = "Card updated", body = CardResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Deck or card not found", body = ErrorResponse)
    )
)]
pub async fn update_card_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    IdPath((deck_id, card_id)): IdPath<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<CardRequest>,
) -> AppResult<Json<CardResponse>> {
    owned_deck(&state, deck_id, &user).await?;
    let card = state
        .db
        .update_card(deck_id, card_id, &req.question, &req.answer)
        .await
        .map_err(or_not_found(AppError::card_not_found))?;
    Ok(Json(card.into()))
}

/// DELETE /api/decks/{deck_id}/cards/{card_id} - Remove a card
#[utoipa::path(
    delete,
    path = "/api/decks/{deck_id}/cards/{card_id}",
    security(("bearer" = [])),
    params(
        ("deck_id" = Uuid, Path, description = "Deck id"),
        ("card_id" = Uuid, Path, description = "Card id")
    ),
    responses(
        (status = 200, description = "Card deleted", body = MessageResponse),
        (status = 404, description = "Deck or card not found", body = ErrorResponse)
    )
)]
pub async fn delete_card_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    IdPath((deck_id, card_id)): IdPath<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    owned_deck(&state, deck_id, &user).await?;
    state
        .db
        .delete_card(deck_id, card_id)
        .await
        .map_err(or_not_found(AppError::card_not_found))?;
    Ok(Json(MessageResponse::new("Card deleted")))
}

//! services/api/src/web/rest.rs
//!
//! Shared response payloads for the REST API and the master definition for the
//! OpenAPI specification.

use chrono::{DateTime, Utc};
use flashcards_core::{Card, Deck, Statistics};
use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::{auth, cards, decks, error::ErrorResponse, study};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        decks::list_decks_handler,
        decks::create_deck_handler,
        decks::update_deck_handler,
        decks::delete_deck_handler,
        cards::list_cards_handler,
        cards::create_card_handler,
        cards::update_card_handler,
        cards::delete_card_handler,
        study::next_card_handler,
        study::record_outcome_handler,
        study::statistics_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::TokenResponse,
            decks::DeckRequest,
            cards::CardRequest,
            study::OutcomeRequest,
            DeckResponse,
            CardResponse,
            StatisticsResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Flashcards API", description = "Decks, cards, study sessions and statistics.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by protected paths.
pub struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

//=========================================================================================
// API Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Deck> for DeckResponse {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.id,
            name: deck.name,
            description: deck.description,
            created_at: deck.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub question: String,
    pub answer: String,
    pub correct_count: u64,
    pub incorrect_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            deck_id: card.deck_id,
            question: card.question,
            answer: card.answer,
            correct_count: card.correct_count,
            incorrect_count: card.incorrect_count,
            created_at: card.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    /// Percentage of recorded attempts that were correct, rounded half-up.
    pub success_rate: u8,
    pub study_count: u64,
}

impl From<Statistics> for StatisticsResponse {
    fn from(stats: Statistics) -> Self {
        Self {
            success_rate: stats.success_rate_percent,
            study_count: stats.study_count,
        }
    }
}

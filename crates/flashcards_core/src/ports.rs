//! crates/flashcards_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Card, Deck, StudyOutcome, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for users, decks and cards.
///
/// Every deck-level method takes the requesting user's id and treats a deck
/// owned by someone else exactly like a missing one.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Credential Store ---
    /// Fails with `AlreadyExists` when the email is taken.
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    // --- Deck Management ---
    async fn create_deck(&self, user_id: Uuid, name: &str, description: &str) -> PortResult<Deck>;

    async fn list_decks_by_user(&self, user_id: Uuid) -> PortResult<Vec<Deck>>;

    async fn get_deck_for_user(&self, deck_id: Uuid, user_id: Uuid) -> PortResult<Deck>;

    async fn update_deck(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
        name: &str,
        description: &str,
    ) -> PortResult<Deck>;

    /// Removes the deck together with all of its cards, atomically.
    async fn delete_deck(&self, deck_id: Uuid, user_id: Uuid) -> PortResult<()>;

    // --- Card Management ---
    async fn create_card(&self, deck_id: Uuid, question: &str, answer: &str) -> PortResult<Card>;

    async fn list_cards_by_deck(&self, deck_id: Uuid) -> PortResult<Vec<Card>>;

    async fn list_cards_by_decks(&self, deck_ids: &[Uuid]) -> PortResult<Vec<Card>>;

    async fn update_card(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        question: &str,
        answer: &str,
    ) -> PortResult<Card>;

    async fn delete_card(&self, deck_id: Uuid, card_id: Uuid) -> PortResult<()>;

    /// Adds exactly one to the counter matching `outcome` as a single store-level
    /// update. Fails with `NotFound` when the card is not in the deck.
    async fn record_card_outcome(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        outcome: StudyOutcome,
    ) -> PortResult<()>;
}

//! crates/flashcards_core/src/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port.
//!
//! Suitable for tests and local experiments. Everything lives behind a single
//! lock, so each port call is atomic with respect to every other call.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Card, Deck, StudyOutcome, User, UserCredentials};
use crate::ports::{DatabaseService, PortError, PortResult};

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    decks: Vec<Deck>,
    cards: Vec<Card>,
}

/// In-memory store. Rows are kept in insertion order.
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

fn deck_not_found(deck_id: Uuid) -> PortError {
    PortError::NotFound(format!("Deck {} not found", deck_id))
}

fn card_not_found(card_id: Uuid) -> PortError {
    PortError::NotFound(format!("Card {} not found", card_id))
}

#[async_trait]
impl DatabaseService for InMemoryDatabase {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(PortError::AlreadyExists(format!("User {}", email)));
        }
        let user = User {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(UserCredentials {
            user_id: user.user_id,
            email: user.email.clone(),
            hashed_password: hashed_password.to_string(),
        });
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_deck(&self, user_id: Uuid, name: &str, description: &str) -> PortResult<Deck> {
        let mut tables = self.tables.write().await;
        let deck = Deck {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        tables.decks.push(deck.clone());
        Ok(deck)
    }

    async fn list_decks_by_user(&self, user_id: Uuid) -> PortResult<Vec<Deck>> {
        let tables = self.tables.read().await;
        Ok(tables
            .decks
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_deck_for_user(&self, deck_id: Uuid, user_id: Uuid) -> PortResult<Deck> {
        let tables = self.tables.read().await;
        tables
            .decks
            .iter()
            .find(|d| d.id == deck_id && d.user_id == user_id)
            .cloned()
            .ok_or_else(|| deck_not_found(deck_id))
    }

    async fn update_deck(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
        name: &str,
        description: &str,
    ) -> PortResult<Deck> {
        let mut tables = self.tables.write().await;
        let deck = tables
            .decks
            .iter_mut()
            .find(|d| d.id == deck_id && d.user_id == user_id)
            .ok_or_else(|| deck_not_found(deck_id))?;
        deck.name = name.to_string();
        deck.description = description.to_string();
        Ok(deck.clone())
    }

    async fn delete_deck(&self, deck_id: Uuid, user_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let position = tables
            .decks
            .iter()
            .position(|d| d.id == deck_id && d.user_id == user_id)
            .ok_or_else(|| deck_not_found(deck_id))?;
        tables.cards.retain(|c| c.deck_id != deck_id);
        tables.decks.remove(position);
        Ok(())
    }

    async fn create_card(&self, deck_id: Uuid, question: &str, answer: &str) -> PortResult<Card> {
        let mut tables = self.tables.write().await;
        if !tables.decks.iter().any(|d| d.id == deck_id) {
            return Err(deck_not_found(deck_id));
        }
        let card = Card {
            id: Uuid::new_v4(),
            deck_id,
            question: question.to_string(),
            answer: answer.to_string(),
            correct_count: 0,
            incorrect_count: 0,
            created_at: Utc::now(),
        };
        tables.cards.push(card.clone());
        Ok(card)
    }

    async fn list_cards_by_deck(&self, deck_id: Uuid) -> PortResult<Vec<Card>> {
        let tables = self.tables.read().await;
        Ok(tables
            .cards
            .iter()
            .filter(|c| c.deck_id == deck_id)
            .cloned()
            .collect())
    }

    async fn list_cards_by_decks(&self, deck_ids: &[Uuid]) -> PortResult<Vec<Card>> {
        let tables = self.tables.read().await;
        Ok(tables
            .cards
            .iter()
            .filter(|c| deck_ids.contains(&c.deck_id))
            .cloned()
            .collect())
    }

    async fn update_card(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        question: &str,
        answer: &str,
    ) -> PortResult<Card> {
        let mut tables = self.tables.write().await;
        let card = tables
            .cards
            .iter_mut()
            .find(|c| c.id == card_id && c.deck_id == deck_id)
            .ok_or_else(|| card_not_found(card_id))?;
        card.question = question.to_string();
        card.answer = answer.to_string();
        Ok(card.clone())
    }

    async fn delete_card(&self, deck_id: Uuid, card_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let position = tables
            .cards
            .iter()
            .position(|c| c.id == card_id && c.deck_id == deck_id)
            .ok_or_else(|| card_not_found(card_id))?;
        tables.cards.remove(position);
        Ok(())
    }

    async fn record_card_outcome(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        outcome: StudyOutcome,
    ) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let card = tables
            .cards
            .iter_mut()
            .find(|c| c.id == card_id && c.deck_id == deck_id)
            .ok_or_else(|| card_not_found(card_id))?;
        match outcome {
            StudyOutcome::Correct => card.correct_count += 1,
            StudyOutcome::Incorrect => card.incorrect_count += 1,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_a_second_row() {
        let db = InMemoryDatabase::new();
        db.create_user_with_email("a@example.com", "hash").await.unwrap();

        let err = db
            .create_user_with_email("a@example.com", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::AlreadyExists(_)));

        let stored = db.get_user_by_email("a@example.com").await.unwrap();
        assert_eq!(stored.hashed_password, "hash");
        assert_eq!(db.tables.read().await.users.len(), 1);
    }

    #[tokio::test]
    async fn deck_lookup_hides_decks_of_other_users() {
        let db = InMemoryDatabase::new();
        let owner = Uuid::new_v4();
        let deck = db.create_deck(owner, "Spanish", "").await.unwrap();

        assert!(db.get_deck_for_user(deck.id, owner).await.is_ok());
        let err = db.get_deck_for_user(deck.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        let err = db
            .update_deck(deck.id, Uuid::new_v4(), "x", "y")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_a_deck_removes_its_cards_only() {
        let db = InMemoryDatabase::new();
        let owner = Uuid::new_v4();
        let doomed = db.create_deck(owner, "doomed", "").await.unwrap();
        let kept = db.create_deck(owner, "kept", "").await.unwrap();
        db.create_card(doomed.id, "q1", "a1").await.unwrap();
        db.create_card(doomed.id, "q2", "a2").await.unwrap();
        db.create_card(kept.id, "q3", "a3").await.unwrap();

        db.delete_deck(doomed.id, owner).await.unwrap();

        assert!(db.list_cards_by_deck(doomed.id).await.unwrap().is_empty());
        assert_eq!(db.list_cards_by_deck(kept.id).await.unwrap().len(), 1);
        assert_eq!(db.list_decks_by_user(owner).await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn updating_a_card_keeps_its_counters() {
        let db = InMemoryDatabase::new();
        let deck = db.create_deck(Uuid::new_v4(), "d", "").await.unwrap();
        let card = db.create_card(deck.id, "q", "a").await.unwrap();
        db.record_card_outcome(deck.id, card.id, StudyOutcome::Correct)
            .await
            .unwrap();

        let updated = db.update_card(deck.id, card.id, "q2", "a2").await.unwrap();
        assert_eq!(updated.question, "q2");
        assert_eq!(updated.correct_count, 1);
    }

    #[tokio::test]
    async fn outcome_for_card_in_another_deck_is_not_found() {
        let db = InMemoryDatabase::new();
        let owner = Uuid::new_v4();
        let first = db.create_deck(owner, "first", "").await.unwrap();
        let second = db.create_deck(owner, "second", "").await.unwrap();
        let card = db.create_card(first.id, "q", "a").await.unwrap();

        let err = db
            .record_card_outcome(second.id, card.id, StudyOutcome::Correct)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }
}

//! crates/flashcards_core/src/study.rs
//!
//! Study sessions: drawing the next card from a deck and recording how the
//! learner did on it.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Card, StudyOutcome};
use crate::ports::{DatabaseService, PortError};

#[derive(Debug, Error)]
pub enum StudyError {
    /// Also returned when the deck exists but belongs to someone else.
    #[error("Deck not found")]
    DeckNotFound,

    #[error("No cards in deck")]
    NoCardsAvailable,

    #[error("Card not found")]
    CardNotFound,

    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

/// Uniform draw over `cards`. `None` only when `cards` is empty.
pub fn pick_card<'a, R: Rng + ?Sized>(cards: &'a [Card], rng: &mut R) -> Option<&'a Card> {
    cards.choose(rng)
}

async fn ensure_deck_owned(
    db: &dyn DatabaseService,
    deck_id: Uuid,
    requester_id: Uuid,
) -> Result<(), StudyError> {
    match db.get_deck_for_user(deck_id, requester_id).await {
        Ok(_) => Ok(()),
        Err(PortError::NotFound(_)) => Err(StudyError::DeckNotFound),
        Err(e) => Err(e.into()),
    }
}

/// Picks the next card to present. Stateless: consecutive calls may repeat a card.
#[derive(Clone)]
pub struct StudySelector {
    db: Arc<dyn DatabaseService>,
}

impl StudySelector {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn next_card(&self, deck_id: Uuid, requester_id: Uuid) -> Result<Card, StudyError> {
        ensure_deck_owned(self.db.as_ref(), deck_id, requester_id).await?;

        let cards = self.db.list_cards_by_deck(deck_id).await?;
        let card = pick_card(&cards, &mut rand::thread_rng())
            .cloned()
            .ok_or(StudyError::NoCardsAvailable)?;

        debug!(%deck_id, card_id = %card.id, pool = cards.len(), "selected study card");
        Ok(card)
    }
}

/// The only mutation path for a card's outcome counters.
#[derive(Clone)]
pub struct OutcomeRecorder {
    db: Arc<dyn DatabaseService>,
}

impl OutcomeRecorder {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn record_outcome(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        requester_id: Uuid,
        was_correct: bool,
    ) -> Result<(), StudyError> {
        ensure_deck_owned(self.db.as_ref(), deck_id, requester_id).await?;

        let outcome = StudyOutcome::from(was_correct);
        match self.db.record_card_outcome(deck_id, card_id, outcome).await {
            Ok(()) => {
                debug!(%deck_id, %card_id, ?outcome, "recorded study outcome");
                Ok(())
            }
            Err(PortError::NotFound(_)) => Err(StudyError::CardNotFound),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDatabase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    async fn deck_with_cards(db: &InMemoryDatabase, owner: Uuid, n: usize) -> (Uuid, Vec<Card>) {
        let deck = db.create_deck(owner, "deck", "").await.unwrap();
        let mut cards = Vec::new();
        for i in 0..n {
            cards.push(
                db.create_card(deck.id, &format!("q{i}"), &format!("a{i}"))
                    .await
                    .unwrap(),
            );
        }
        (deck.id, cards)
    }

    #[test]
    fn pick_card_on_empty_slice_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_card(&[], &mut rng).is_none());
    }

    #[test]
    fn picked_card_borrows_from_the_slice_not_the_rng() {
        let card = Card {
            id: Uuid::new_v4(),
            deck_id: Uuid::new_v4(),
            question: "q".to_string(),
            answer: "a".to_string(),
            correct_count: 0,
            incorrect_count: 0,
            created_at: chrono::Utc::now(),
        };
        let cards = vec![card];
        let picked = {
            let mut rng = StdRng::seed_from_u64(11);
            pick_card(&cards, &mut rng)
        };
        assert_eq!(picked.map(|c| c.id), Some(cards[0].id));
    }

    #[tokio::test]
    async fn next_card_draws_roughly_uniformly() {
        let db = Arc::new(InMemoryDatabase::new());
        let owner = Uuid::new_v4();
        let (deck_id, cards) = deck_with_cards(&db, owner, 4).await;
        let selector = StudySelector::new(db);

        let draws = 4000;
        let mut seen: HashMap<Uuid, usize> = HashMap::new();
        for _ in 0..draws {
            let card = selector.next_card(deck_id, owner).await.unwrap();
            *seen.entry(card.id).or_default() += 1;
        }

        assert_eq!(seen.len(), cards.len());
        for card in &cards {
            let count = seen[&card.id];
            // expected 1000 each; the bound is far outside normal variation
            assert!((700..=1300).contains(&count), "card drawn {count} times");
        }
    }

    #[tokio::test]
    async fn next_card_on_empty_deck_is_no_cards() {
        let db = Arc::new(InMemoryDatabase::new());
        let owner = Uuid::new_v4();
        let (deck_id, _) = deck_with_cards(&db, owner, 0).await;
        let selector = StudySelector::new(db);

        let err = selector.next_card(deck_id, owner).await.unwrap_err();
        assert!(matches!(err, StudyError::NoCardsAvailable));
    }

    #[tokio::test]
    async fn next_card_hides_missing_and_foreign_decks() {
        let db = Arc::new(InMemoryDatabase::new());
        let owner = Uuid::new_v4();
        let (deck_id, _) = deck_with_cards(&db, owner, 2).await;
        let selector = StudySelector::new(db);

        let foreign = selector.next_card(deck_id, Uuid::new_v4()).await.unwrap_err();
        let missing = selector.next_card(Uuid::new_v4(), owner).await.unwrap_err();
        assert!(matches!(foreign, StudyError::DeckNotFound));
        assert!(matches!(missing, StudyError::DeckNotFound));
    }

    #[tokio::test]
    async fn record_outcome_increments_exactly_one_counter() {
        let db = Arc::new(InMemoryDatabase::new());
        let owner = Uuid::new_v4();
        let (deck_id, cards) = deck_with_cards(&db, owner, 1).await;
        let recorder = OutcomeRecorder::new(db.clone());

        recorder.record_outcome(deck_id, cards[0].id, owner, true).await.unwrap();
        recorder.record_outcome(deck_id, cards[0].id, owner, false).await.unwrap();
        recorder.record_outcome(deck_id, cards[0].id, owner, false).await.unwrap();

        let card = &db.list_cards_by_deck(deck_id).await.unwrap()[0];
        assert_eq!(card.correct_count, 1);
        assert_eq!(card.incorrect_count, 2);
    }

    #[tokio::test]
    async fn concurrent_outcomes_are_not_lost() {
        let db = Arc::new(InMemoryDatabase::new());
        let owner = Uuid::new_v4();
        let (deck_id, cards) = deck_with_cards(&db, owner, 1).await;
        let card_id = cards[0].id;
        let recorder = OutcomeRecorder::new(db.clone());

        let k = 200;
        let tasks = (0..k).map(|_| {
            let recorder = recorder.clone();
            tokio::spawn(async move { recorder.record_outcome(deck_id, card_id, owner, true).await })
        });
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let card = &db.list_cards_by_deck(deck_id).await.unwrap()[0];
        assert_eq!(card.correct_count, k);
        assert_eq!(card.incorrect_count, 0);
    }

    #[tokio::test]
    async fn record_outcome_reports_deck_before_card() {
        let db = Arc::new(InMemoryDatabase::new());
        let owner = Uuid::new_v4();
        let (deck_id, cards) = deck_with_cards(&db, owner, 1).await;
        let recorder = OutcomeRecorder::new(db);

        let err = recorder
            .record_outcome(deck_id, Uuid::new_v4(), owner, true)
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::CardNotFound));

        let err = recorder
            .record_outcome(deck_id, cards[0].id, Uuid::new_v4(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::DeckNotFound));
    }
}

//! crates/flashcards_core/src/statistics.rs
//!
//! Success-rate aggregation across all of a user's cards. Recomputed from the
//! counters on every call; nothing is cached.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Card, Statistics};
use crate::ports::{DatabaseService, PortResult};

/// `round(correct / attempts * 100)` with halves rounded up, in integer math.
pub fn success_rate_percent(correct: u64, attempts: u64) -> u8 {
    if attempts == 0 {
        return 0;
    }
    let correct = correct.min(attempts) as u128;
    let attempts = attempts as u128;
    ((200 * correct + attempts) / (2 * attempts)) as u8
}

/// Folds card counters into a summary.
pub fn summarize<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Statistics {
    let (correct, attempts) = cards
        .into_iter()
        .fold((0u64, 0u64), |(correct, attempts), card| {
            (correct + card.correct_count, attempts + card.attempts())
        });
    Statistics {
        success_rate_percent: success_rate_percent(correct, attempts),
        study_count: attempts,
    }
}

#[derive(Clone)]
pub struct StatisticsAggregator {
    db: Arc<dyn DatabaseService>,
}

impl StatisticsAggregator {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn compute_statistics(&self, user_id: Uuid) -> PortResult<Statistics> {
        let decks = self.db.list_decks_by_user(user_id).await?;
        if decks.is_empty() {
            return Ok(Statistics::default());
        }

        let deck_ids: Vec<Uuid> = decks.iter().map(|d| d.id).collect();
        let cards = self.db.list_cards_by_decks(&deck_ids).await?;
        Ok(summarize(&cards))
    }
}

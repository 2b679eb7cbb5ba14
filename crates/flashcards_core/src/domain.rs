//! crates/flashcards_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("hashed_password", &"<redacted>")
            .finish()
    }
}

/// The identity carried by a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: Uuid,
    pub email: String,
}

/// A named collection of flashcards owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A question/answer pair with two lifetime outcome counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub question: String,
    pub answer: String,
    pub correct_count: u64,
    pub incorrect_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn attempts(&self) -> u64 {
        self.correct_count + self.incorrect_count
    }
}

/// The result a user reports after revealing a card's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyOutcome {
    Correct,
    Incorrect,
}

impl From<bool> for StudyOutcome {
    fn from(was_correct: bool) -> Self {
        if was_correct {
            StudyOutcome::Correct
        } else {
            StudyOutcome::Incorrect
        }
    }
}

/// Aggregate success figures across every card a user owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    /// Rounded half-up, always within `0..=100`.
    pub success_rate_percent: u8,
    pub study_count: u64,
}

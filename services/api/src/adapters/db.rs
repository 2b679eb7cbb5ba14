//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flashcards_core::domain::{Card, Deck, StudyOutcome, User, UserCredentials};
use flashcards_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Waits for in-flight queries and closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found_or_unexpected(what: impl FnOnce() -> String) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what()),
        _ => unexpected(e),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.id,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            email: self.email,
            hashed_password: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct DeckRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
}
impl DeckRecord {
    fn to_domain(self) -> Deck {
        Deck {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CardRecord {
    id: Uuid,
    deck_id: Uuid,
    question: String,
    answer: String,
    correct_count: i64,
    incorrect_count: i64,
    created_at: DateTime<Utc>,
}
impl CardRecord {
    fn to_domain(self) -> Card {
        Card {
            id: self.id,
            deck_id: self.deck_id,
            question: self.question,
            answer: self.answer,
            // CHECK constraints keep both counters non-negative
            correct_count: self.correct_count.max(0) as u64,
            incorrect_count: self.incorrect_count.max(0) as u64,
            created_at: self.created_at,
        }
    }
}

const DECK_COLUMNS: &str = "id, user_id, name, description, created_at";
const CARD_COLUMNS: &str =
    "id, deck_id, question, answer, correct_count, incorrect_count, created_at";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING id, email, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                PortError::AlreadyExists(format!("User {}", email))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(|| format!("User {} not found", email)))?;
        Ok(record.to_domain())
    }

    async fn create_deck(&self, user_id: Uuid, name: &str, description: &str) -> PortResult<Deck> {
        let record = sqlx::query_as::<_, DeckRecord>(&format!(
            "INSERT INTO decks (id, user_id, name, description) VALUES ($1, $2, $3, $4) RETURNING {DECK_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_decks_by_user(&self, user_id: Uuid) -> PortResult<Vec<Deck>> {
        let records = sqlx::query_as::<_, DeckRecord>(&format!(
            "SELECT {DECK_COLUMNS} FROM decks WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_deck_for_user(&self, deck_id: Uuid, user_id: Uuid) -> PortResult<Deck> {
        let record = sqlx::query_as::<_, DeckRecord>(&format!(
            "SELECT {DECK_COLUMNS} FROM decks WHERE id = $1 AND user_id = $2"
        ))
        .bind(deck_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(|| format!("Deck {} not found", deck_id)))?;
        Ok(record.to_domain())
    }

    async fn update_deck(
        &self,
        deck_id: Uuid,
        user_id: Uuid,
        name: &str,
        description: &str,
    ) -> PortResult<Deck> {
        let record = sqlx::query_as::<_, DeckRecord>(&format!(
            "UPDATE decks SET name = $3, description = $4 WHERE id = $1 AND user_id = $2 RETURNING {DECK_COLUMNS}"
        ))
        .bind(deck_id)
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(|| format!("Deck {} not found", deck_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_deck(&self, deck_id: Uuid, user_id: Uuid) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query("SELECT id FROM decks WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(deck_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(not_found_or_unexpected(|| format!("Deck {} not found", deck_id)))?;

        sqlx::query("DELETE FROM cards WHERE deck_id = $1")
            .bind(deck_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        sqlx::query("DELETE FROM decks WHERE id = $1")
            .bind(deck_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn create_card(&self, deck_id: Uuid, question: &str, answer: &str) -> PortResult<Card> {
        let record = sqlx::query_as::<_, CardRecord>(&format!(
            "INSERT INTO cards (id, deck_id, question, answer) VALUES ($1, $2, $3, $4) RETURNING {CARD_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(deck_id)
        .bind(question)
        .bind(answer)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                PortError::NotFound(format!("Deck {} not found", deck_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn list_cards_by_deck(&self, deck_id: Uuid) -> PortResult<Vec<Card>> {
        let records = sqlx::query_as::<_, CardRecord>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE deck_id = $1 ORDER BY created_at ASC"
        ))
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_cards_by_decks(&self, deck_ids: &[Uuid]) -> PortResult<Vec<Card>> {
        let records = sqlx::query_as::<_, CardRecord>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE deck_id = ANY($1) ORDER BY created_at ASC"
        ))
        .bind(deck_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_card(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        question: &str,
        answer: &str,
    ) -> PortResult<Card> {
        let record = sqlx::query_as::<_, CardRecord>(&format!(
            "UPDATE cards SET question = $3, answer = $4 WHERE id = $1 AND deck_id = $2 RETURNING {CARD_COLUMNS}"
        ))
        .bind(card_id)
        .bind(deck_id)
        .bind(question)
        .bind(answer)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(|| format!("Card {} not found", card_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_card(&self, deck_id: Uuid, card_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1 AND deck_id = $2")
            .bind(card_id)
            .bind(deck_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Card {} not found", card_id)));
        }
        Ok(())
    }

    async fn record_card_outcome(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        outcome: StudyOutcome,
    ) -> PortResult<()> {
        // A single UPDATE so concurrent submissions cannot lose increments.
        let sql = match outcome {
            StudyOutcome::Correct => {
                "UPDATE cards SET correct_count = correct_count + 1 WHERE id = $1 AND deck_id = $2"
            }
            StudyOutcome::Incorrect => {
                "UPDATE cards SET incorrect_count = incorrect_count + 1 WHERE id = $1 AND deck_id = $2"
            }
        };
        let result = sqlx::query(sql)
            .bind(card_id)
            .bind(deck_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Card {} not found", card_id)));
        }
        Ok(())
    }
}

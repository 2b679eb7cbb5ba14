//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use flashcards_core::{
    Authenticator, DatabaseService, OutcomeRecorder, StatisticsAggregator, StudySelector,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Every service holds its own handle to the same store; there is no other
/// shared mutable state between requests.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub authenticator: Authenticator,
    pub selector: StudySelector,
    pub recorder: OutcomeRecorder,
    pub statistics: StatisticsAggregator,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseService>, jwt_secret: &[u8]) -> Self {
        Self {
            authenticator: Authenticator::new(db.clone(), jwt_secret),
            selector: StudySelector::new(db.clone()),
            recorder: OutcomeRecorder::new(db.clone()),
            statistics: StatisticsAggregator::new(db.clone()),
            db,
        }
    }
}

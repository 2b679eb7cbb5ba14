pub mod auth;
pub mod cards;
pub mod decks;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod study;

pub use middleware::require_auth;
pub use state::AppState;

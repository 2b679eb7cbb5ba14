//! services/api/src/lib.rs
//!
//! The HTTP boundary of the flashcards service: configuration, the Postgres
//! adapter and the axum router.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    auth, cards, decks,
    error::{method_not_allowed, route_not_found},
    require_auth,
    rest::ApiDoc,
    study, AppState,
};

/// Builds the API router (public and protected routes) plus Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/register", post(auth::register_handler))
        .route("/api/login", post(auth::login_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/api/decks",
            get(decks::list_decks_handler).post(decks::create_deck_handler),
        )
        .route(
            "/api/decks/{deck_id}",
            put(decks::update_deck_handler).delete(decks::delete_deck_handler),
        )
        .route(
            "/api/decks/{deck_id}/cards",
            get(cards::list_cards_handler).post(cards::create_card_handler),
        )
        .route(
            "/api/decks/{deck_id}/cards/{card_id}",
            put(cards::update_card_handler).delete(cards::delete_card_handler),
        )
        .route("/api/decks/{deck_id}/study", get(study::next_card_handler))
        .route(
            "/api/decks/{deck_id}/study/{card_id}",
            post(study::record_outcome_handler),
        )
        .route("/api/statistics", get(study::statistics_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    // The fallbacks go last so they cover every route merged above.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

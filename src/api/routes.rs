//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Stateless lookups
        .route("/search", get(handlers::search))
        .route("/insights", get(handlers::insights))
        .route("/share-location", get(handlers::share_location))
        // Browse data
        .route("/states", get(handlers::list_states))
        .route("/states/:state/districts", get(handlers::list_districts))
        .route("/featured", get(handlers::featured))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:id", get(handlers::get_session))
        .route("/sessions/:id/search", post(handlers::session_search))
        .route("/sessions/:id/near", post(handlers::session_near))
        .route(
            "/sessions/:id/select",
            post(handlers::select_record).delete(handlers::close_record),
        )
        // Support chat
        .route("/support", post(handlers::support_chat))
        .with_state(state)
}

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes.
pub fn create_router(state: AppState) -> Router {
    // The call frontend runs on a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Assistant control
        .route("/start-assistant", post(handlers::start_assistant))
        // Session queries
        .route("/transcript/:call_id", get(handlers::get_transcript))
        .route("/status/:call_id", get(handlers::get_status))
        // Request logging + CORS for the browser frontend
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

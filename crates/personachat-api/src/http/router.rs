//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Persona catalog
        .route("/personas", get(handlers::persona::list_personas))
        .route("/personas/{key}", get(handlers::persona::get_persona))
        .route(
            "/personas/{key}/sessions",
            post(handlers::chat::start_session),
        )
        // Sessions
        .route(
            "/sessions/{id}/messages",
            post(handlers::chat::send_message),
        )
        .route("/sessions/{id}/turns", get(handlers::chat::get_turns))
        .route("/sessions/{id}/save", post(handlers::chat::save_session))
        .route("/sessions/{id}", delete(handlers::chat::end_session))
        // Saved conversation records
        .route("/records", get(handlers::record::list_records))
        .route("/records/{id}", get(handlers::record::get_record));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

//! HTTP server module

mod api;
mod error;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use services::QuizEngine;

/// Create the HTTP router with all routes configured
pub fn create_router(engine: Arc<QuizEngine>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/session/start", post(api::start))
        .route("/session/next", post(api::next))
        .route("/session/answer", post(api::answer))
        .route("/session/hint", post(api::hint))
        .route("/session/explain_batch", post(api::explain_batch))
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

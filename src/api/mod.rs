// src/api/mod.rs

pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/classify", post(handlers::classify_raw))
        .route("/classify/extracted", post(handlers::classify_extracted))
        .route(
            "/taxonomy",
            get(handlers::get_taxonomy).put(handlers::put_taxonomy),
        )
        .route("/taxonomy/reload", post(handlers::reload_taxonomy))
}

/// Router with state and middleware attached, ready to serve.
pub fn app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CorsLayer::permissive())
}

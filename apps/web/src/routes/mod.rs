pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::page::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::handle_page))
        .route(
            "/upload",
            post(handlers::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/analyze", post(handlers::handle_analyze))
        .route(
            "/evaluations/:criterion/toggle",
            post(handlers::handle_toggle),
        )
        .route("/health", get(health::health_handler))
        .with_state(state)
}

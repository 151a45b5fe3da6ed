//! HTTP API module
//!
//! The board is the display surface: every handler answers with the full
//! snapshot so clients never see a half-applied change.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(board_handler).post(add_handler))
        .route("/timers/:index", put(edit_handler).delete(remove_handler))
        .route("/timers/:index/toggle", post(toggle_handler))
        .route("/timers/:index/status", put(status_update_handler))
        .route("/timers/:index/restart", post(restart_handler))
        .route("/timers/:index/edit", post(begin_edit_handler))
        .route("/editing", delete(end_edit_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

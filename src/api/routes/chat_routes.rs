//! Chat routes.

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;
use crate::api::handlers::chat_handler::*;

/// Chat router
pub fn create_chat_router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/context", get(preview_context))
}

//! Conversation routes.

use axum::{Router, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::conversation_handler::*;

/// Conversation router
pub fn create_conversation_router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(list_conversations))
        .route("/conversations/:id", get(get_conversation))
}

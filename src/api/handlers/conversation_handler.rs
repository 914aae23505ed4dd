use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::conversation_dto::*, handlers::owner_id},
    error::AppError,
};

/// Conversation history for the caller
pub async fn list_conversations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListConversationsParams>,
) -> Result<impl IntoResponse, AppError> {
    let owner = owner_id(&headers);
    let limit = params.limit.unwrap_or(20);
    debug!("listing conversations for {} (limit {})", owner, limit);

    let history = state.memory_service.list_conversations(&owner, limit).await?;

    let response = ChatHistoryResponse {
        conversations: history
            .conversations
            .iter()
            .map(ConversationSummaryResponse::from)
            .collect(),
        total_conversations: history.total_conversations,
    };

    Ok(Json(response))
}

/// One conversation with all its messages
pub async fn get_conversation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let owner = owner_id(&headers);
    debug!("conversation detail {} for {}", id, owner);

    let detail = state.memory_service.conversation_detail(&owner, &id).await?;

    let response = ConversationDetailResponse {
        conversation: ConversationSummaryResponse::from(&detail.conversation),
        messages: detail.messages.iter().map(MessageResponse::from).collect(),
    };

    Ok(Json(response))
}

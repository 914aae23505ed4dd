use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::debug;
use validator::Validate;

use crate::{
    api::{
        app_state::AppState,
        dto::chat_dto::*,
        handlers::{owner_id, user_name},
    },
    error::AppError,
    security::rate_limit::RateLimitResult,
    services::chat::TurnRequest,
};

/// Run one chatbot turn
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let owner = owner_id(&headers);
    debug!("chat turn for {}", owner);

    if let RateLimitResult::Limited { .. } = state.rate_limiter.check(&owner).await {
        return Err(AppError::RateLimited);
    }

    let start = std::time::Instant::now();
    let turn = TurnRequest {
        message: request.message,
        selected_vehicles: request.selected_vehicles.unwrap_or_default(),
        session_token: request.session_token,
    };

    let outcome = state
        .chat_service
        .handle_turn(&owner, &user_name(&headers), turn)
        .await
        .inspect_err(|e| {
            state.metrics.record_error();
            if matches!(e, AppError::Generation(_)) {
                state.metrics.record_generation_failure();
            }
        })?;

    state.metrics.record_chat_turn();
    state
        .metrics
        .record_http_request(start.elapsed().as_millis() as u64);

    let selected_vehicles_info = if outcome.selected.is_empty() {
        None
    } else {
        Some(outcome.selected.iter().map(VehicleResponse::from).collect())
    };

    let response = ChatResponse {
        response: outcome.response,
        session_token: outcome.session_token,
        context_used: outcome.context_note,
        selected_vehicles_info,
        timestamp: Utc::now(),
    };

    Ok(Json(response))
}

/// Preview the ranked context window for a query
pub async fn preview_context(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ContextParams>,
) -> Result<impl IntoResponse, AppError> {
    let owner = owner_id(&headers);
    let limit = params.limit.unwrap_or(5);
    debug!("context preview for {} (limit {})", owner, limit);

    let start = std::time::Instant::now();
    let items = state
        .retrieval_service
        .relevant_context(&owner, &params.q, limit)
        .await?;
    state
        .metrics
        .record_retrieval(start.elapsed().as_millis() as u64);

    let response = ContextPreviewResponse {
        query: params.q,
        items: items.iter().map(ContextItemResponse::from).collect(),
    };

    Ok(Json(response))
}

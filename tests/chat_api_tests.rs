//! HTTP surface tests: the real router over in-memory stores.

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use common::{
    FailingResponder, FixedResponder, InMemoryConversationStore, InMemoryEntryStore,
    InMemoryMessageStore, StaticCatalog, vehicle,
};
use showroom::api::app_state::AppState;
use showroom::api::create_router;
use showroom::observability::AppMetrics;
use showroom::security::rate_limit::RateLimiter;
use showroom::services::catalog::VehicleCatalog;
use showroom::services::chat::ChatPipeline;
use showroom::services::generator::Responder;
use showroom::services::memory::MemoryServiceImpl;
use showroom::services::retrieval::ContextRetriever;
use showroom::services::scoring::RelevanceScorer;
use showroom::services::session::SessionResolver;

fn router_with(
    responder: Arc<dyn Responder>,
    catalog: Arc<dyn VehicleCatalog>,
    rate_limiter: RateLimiter,
) -> Router {
    let conversations = Arc::new(InMemoryConversationStore::default());
    let messages = Arc::new(InMemoryMessageStore::default());
    let entries = Arc::new(InMemoryEntryStore::default());

    let sessions = Arc::new(SessionResolver::new(conversations.clone(), 24));
    let memory = Arc::new(MemoryServiceImpl::new(
        conversations.clone(),
        messages.clone(),
        entries.clone(),
    ));
    let retrieval = Arc::new(ContextRetriever::new(
        entries.clone(),
        messages.clone(),
        RelevanceScorer::new(0.1),
        30,
    ));

    let chat = Arc::new(ChatPipeline::new(
        sessions,
        retrieval.clone(),
        memory.clone(),
        responder,
        catalog,
        5,
    ));

    let state = AppState::new(
        chat,
        memory,
        retrieval,
        rate_limiter,
        Arc::new(AppMetrics::default()),
    );

    create_router(state)
}

fn default_router() -> Router {
    router_with(
        Arc::new(FixedResponder::saying("Happy to help!")),
        Arc::new(StaticCatalog::empty()),
        RateLimiter::development(),
    )
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/chat")
        .header("content-type", "application/json")
        .header("x-user-id", "user_1")
        .header("x-user-name", "Ada")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-user-id", "user_1")
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_chat_turn_returns_response_and_token() {
    let app = default_router();

    let response = app
        .oneshot(chat_request(json!({"message": "Tell me about the X5"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["response"], "Happy to help!");
    assert!(!body["session_token"].as_str().unwrap().is_empty());
    assert!(body["context_used"].is_null());
}

#[tokio::test]
async fn test_echoed_token_continues_the_conversation() {
    let app = default_router();

    let first = app
        .clone()
        .oneshot(chat_request(json!({"message": "Tell me about the X5"})))
        .await
        .unwrap();
    let token = json_body(first).await["session_token"]
        .as_str()
        .unwrap()
        .to_string();

    let second = app
        .clone()
        .oneshot(chat_request(
            json!({"message": "And the X3?", "session_token": token}),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let history = app
        .oneshot(get_request("/api/v1/conversations"))
        .await
        .unwrap();
    let body = json_body(history).await;
    assert_eq!(body["total_conversations"], 1);
    assert_eq!(body["conversations"][0]["message_count"], 2);
}

#[tokio::test]
async fn test_selected_vehicles_are_echoed_with_details() {
    let app = router_with(
        Arc::new(FixedResponder::saying("Both are great.")),
        Arc::new(StaticCatalog::with(vec![
            vehicle("3", "X5", 2023, "xDrive40i", 65000),
            vehicle("7", "X3", 2023, "xDrive30i", 48000),
        ])),
        RateLimiter::development(),
    );

    let response = app
        .oneshot(chat_request(json!({
            "message": "compare these",
            "selected_vehicles": ["3", "7"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let info = body["selected_vehicles_info"].as_array().unwrap();
    assert_eq!(info.len(), 2);
    assert_eq!(info[0]["display_name"], "2023 X5 xDrive40i");
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let app = default_router();

    let response = app
        .oneshot(chat_request(json!({"message": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_generation_failure_maps_to_bad_gateway_and_keeps_turn() {
    let app = router_with(
        Arc::new(FailingResponder),
        Arc::new(StaticCatalog::empty()),
        RateLimiter::development(),
    );

    let response = app
        .clone()
        .oneshot(chat_request(json!({"message": "Tell me about the X5"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // The user turn survived for a clean retry.
    let history = app
        .oneshot(get_request("/api/v1/conversations"))
        .await
        .unwrap();
    let body = json_body(history).await;
    assert_eq!(body["total_conversations"], 1);
    assert_eq!(body["conversations"][0]["message_count"], 1);
    assert_eq!(
        body["conversations"][0]["preview"],
        "Tell me about the X5"
    );
}

#[tokio::test]
async fn test_rate_limit_rejects_with_429() {
    let app = router_with(
        Arc::new(FixedResponder::saying("ok")),
        Arc::new(StaticCatalog::empty()),
        RateLimiter::new(1, 60, true),
    );

    let first = app
        .clone()
        .oneshot(chat_request(json!({"message": "hello"})))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(chat_request(json!({"message": "hello again"})))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_unknown_conversation_detail_is_404() {
    let app = default_router();

    let response = app
        .oneshot(get_request("/api/v1/conversations/no-such-id"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_context_preview_lists_ranked_items() {
    let app = default_router();

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(chat_request(
                json!({"message": "What is the price of the BMW X5?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let preview = app
        .oneshot(get_request(
            "/api/v1/context?q=BMW%20X5%20price&limit=2",
        ))
        .await
        .unwrap();
    assert_eq!(preview.status(), StatusCode::OK);

    let body = json_body(preview).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let first = items[0]["relevance_score"].as_f64().unwrap();
    let second = items[1]["relevance_score"].as_f64().unwrap();
    assert!(first >= second);
    assert_eq!(items[0]["intent"], "pricing");
}

#[tokio::test]
async fn test_context_note_appears_after_history_builds() {
    let app = default_router();

    let first = app
        .clone()
        .oneshot(chat_request(
            json!({"message": "What is the price of the BMW X5?"}),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(chat_request(
            json!({"message": "What is the price of the BMW X5 again?"}),
        ))
        .await
        .unwrap();
    let body = json_body(second).await;
    assert_eq!(
        body["context_used"],
        "Using 1 previous interaction for context"
    );
}

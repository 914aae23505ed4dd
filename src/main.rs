use showroom::api::{self, app_state::AppState};
use showroom::config::loader::ConfigLoader;
use showroom::observability::{
    AppMetrics, ObservabilityState, create_observability_router, init_tracing,
};
use showroom::security::rate_limit::RateLimiter;
use showroom::services::catalog::{VehicleCatalog, create_vehicle_catalog};
use showroom::services::chat::create_chat_service;
use showroom::services::generator::{Responder, create_responder};
use showroom::services::memory::{MemoryService, create_memory_service};
use showroom::services::retrieval::{RetrievalService, create_retrieval_service};
use showroom::services::scoring::RelevanceScorer;
use showroom::services::session::{SessionService, create_session_service};
use showroom::storage::repository::{
    SurrealConversationStore, SurrealMemoryEntryStore, SurrealMessageStore,
};
use showroom::storage::surrealdb::SurrealPool;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load()?;
    let _log_guard = init_tracing("showroom", &config.logging);

    info!("Starting Showroom...");
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let db_pool = SurrealPool::new(config.database.clone()).await?;
    info!("Database connection initialized");

    let conversation_store = Arc::new(SurrealConversationStore::new(db_pool.db()));
    let message_store = Arc::new(SurrealMessageStore::new(db_pool.db()));
    let entry_store = Arc::new(SurrealMemoryEntryStore::new(db_pool.db()));
    info!("Repositories initialized");

    let session_service: Arc<dyn SessionService> = Arc::from(create_session_service(
        conversation_store.clone(),
        config.memory.session_timeout_hours,
    ));
    info!("Session service initialized");

    let memory_service: Arc<dyn MemoryService> = Arc::from(create_memory_service(
        conversation_store.clone(),
        message_store.clone(),
        entry_store.clone(),
    ));
    info!("Memory service initialized");

    let scorer = RelevanceScorer::new(config.memory.relevance_threshold);
    let retrieval_service: Arc<dyn RetrievalService> = Arc::from(create_retrieval_service(
        entry_store.clone(),
        message_store.clone(),
        scorer,
        config.memory.candidate_window_days,
    ));
    info!("Retrieval service initialized");

    let responder: Arc<dyn Responder> = Arc::from(create_responder(config.generator.clone())?);
    info!(
        "Responder initialized: {} ({})",
        config.generator.url, config.generator.model
    );

    let catalog: Arc<dyn VehicleCatalog> = Arc::from(create_vehicle_catalog(db_pool.db()));

    let chat_service = create_chat_service(
        session_service.clone(),
        retrieval_service.clone(),
        memory_service.clone(),
        responder,
        catalog,
        config.memory.context_limit,
    );
    info!("Chat service initialized");

    let metrics = Arc::new(AppMetrics::default());
    let rate_limiter = RateLimiter::from_config(&config.security);

    let app_state = AppState::new(
        Arc::from(chat_service),
        memory_service,
        retrieval_service,
        rate_limiter,
        metrics.clone(),
    );
    info!("Application state created");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        metrics,
    ));
    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}

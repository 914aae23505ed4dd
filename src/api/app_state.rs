use std::sync::Arc;

use crate::observability::AppMetrics;
use crate::security::rate_limit::RateLimiter;
use crate::services::chat::ChatService;
use crate::services::memory::MemoryService;
use crate::services::retrieval::RetrievalService;

/// Application state containing the shared services
///
/// Holds only trait objects, so routers can be exercised in tests without a
/// running database.
#[derive(Clone)]
pub struct AppState {
    /// Chat service running the per-turn pipeline
    pub chat_service: Arc<dyn ChatService>,
    /// Memory service for history listings
    pub memory_service: Arc<dyn MemoryService>,
    /// Retrieval service for context previews
    pub retrieval_service: Arc<dyn RetrievalService>,
    /// Rate limiter for request throttling
    pub rate_limiter: Arc<RateLimiter>,
    /// Application metrics
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("memory_service", &"Arc<dyn MemoryService>")
            .field("retrieval_service", &"Arc<dyn RetrievalService>")
            .field("rate_limiter", &self.rate_limiter)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        chat_service: Arc<dyn ChatService>,
        memory_service: Arc<dyn MemoryService>,
        retrieval_service: Arc<dyn RetrievalService>,
        rate_limiter: RateLimiter,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            chat_service,
            memory_service,
            retrieval_service,
            rate_limiter: Arc::new(rate_limiter),
            metrics,
        }
    }
}

//! Context retrieval orchestration.
//!
//! For a new query: fetch candidate memory entries inside the recency window,
//! extract the query's features once, score every candidate, drop entries
//! below the relevance floor, rank, truncate, and resolve each survivor's
//! source message into a context item for the downstream responder.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::models::memory_entry::{Intent, MemoryEntry};
use crate::services::extraction::EntityExtractor;
use crate::services::scoring::RelevanceScorer;
use crate::storage::repository::{MemoryEntryStore, MessageStore};

/// One ranked piece of conversational grounding
#[derive(Debug, Clone, Serialize)]
pub struct ContextItem {
    /// Original user text
    pub message: String,

    /// Generated response of that turn, when one exists
    pub response: Option<String>,

    /// Vehicle models mentioned in the turn
    pub vehicles_mentioned: Vec<String>,

    /// Intent classified at storage time
    pub intent: Intent,

    /// Combined relevance score
    pub relevance_score: f32,

    /// When the turn happened
    pub timestamp: DateTime<Utc>,
}

/// Context retrieval service trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Ranked context window for a new query, highest relevance first
    async fn relevant_context(
        &self,
        owner_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ContextItem>>;
}

/// Context retriever implementation
pub struct ContextRetriever {
    entries: Arc<dyn MemoryEntryStore>,
    messages: Arc<dyn MessageStore>,
    extractor: EntityExtractor,
    scorer: RelevanceScorer,
    candidate_window: Duration,
}

impl ContextRetriever {
    pub fn new(
        entries: Arc<dyn MemoryEntryStore>,
        messages: Arc<dyn MessageStore>,
        scorer: RelevanceScorer,
        candidate_window_days: i64,
    ) -> Self {
        Self {
            entries,
            messages,
            extractor: EntityExtractor::new(),
            scorer,
            candidate_window: Duration::days(candidate_window_days),
        }
    }
}

#[async_trait]
impl RetrievalService for ContextRetriever {
    async fn relevant_context(
        &self,
        owner_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ContextItem>> {
        let now = Utc::now();
        let cutoff = now - self.candidate_window;

        let candidates = self.entries.list_since(owner_id, cutoff).await?;
        let query_features = self.extractor.extract(query);

        let mut scored: Vec<(MemoryEntry, f32)> = Vec::new();
        for entry in candidates {
            let score = self.scorer.score(&entry, &query_features, now);
            if self.scorer.is_relevant(score) {
                scored.push((entry, score));
            }
        }

        // Stable sort: candidates arrive oldest-first, and ties keep that
        // retrieval order for deterministic ranking.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        let mut items = Vec::with_capacity(scored.len());
        for (entry, score) in scored {
            let Some(message) = self.messages.get_by_id(&entry.message_id).await? else {
                tracing::warn!(
                    "memory entry {} references missing message {}",
                    entry.id,
                    entry.message_id
                );
                continue;
            };

            items.push(ContextItem {
                message: message.content,
                response: message.response,
                vehicles_mentioned: entry.vehicle_list(),
                intent: entry.intent,
                relevance_score: score,
                timestamp: message.created_at,
            });
        }

        tracing::debug!(
            "retrieved {} context items for {} (query intent: {})",
            items.len(),
            owner_id,
            query_features.intent
        );

        Ok(items)
    }
}

/// Human-readable note describing the context used for a turn
pub fn context_note(items: &[ContextItem]) -> Option<String> {
    match items.len() {
        0 => None,
        1 => Some("Using 1 previous interaction for context".to_string()),
        n => Some(format!("Using {} previous interactions for context", n)),
    }
}

/// Create the context retrieval service
pub fn create_retrieval_service(
    entries: Arc<dyn MemoryEntryStore>,
    messages: Arc<dyn MessageStore>,
    scorer: RelevanceScorer,
    candidate_window_days: i64,
) -> Box<dyn RetrievalService> {
    Box::new(ContextRetriever::new(
        entries,
        messages,
        scorer,
        candidate_window_days,
    ))
}

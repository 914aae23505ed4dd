//! Chatbot turn pipeline.
//!
//! One synchronous pipeline per turn: resolve session, retrieve context,
//! enrich selected vehicles, generate, persist the turn, derive the memory
//! entry. Failures propagate; nothing is retried here.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::vehicle::Vehicle;
use crate::services::catalog::VehicleCatalog;
use crate::services::generator::Responder;
use crate::services::memory::MemoryService;
use crate::services::retrieval::{RetrievalService, context_note};
use crate::services::session::SessionService;

/// One incoming chatbot turn
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    /// Raw user message
    pub message: String,
    /// Selected vehicle catalog ids
    pub selected_vehicles: Vec<String>,
    /// Client session token
    pub session_token: Option<String>,
}

/// Result of one completed turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Generated response text
    pub response: String,
    /// Conversation the turn was stored in
    pub conversation_id: String,
    /// Session token to echo back to the client
    pub session_token: String,
    /// Note on the historical context used
    pub context_note: Option<String>,
    /// Resolved selected vehicles
    pub selected: Vec<Vehicle>,
}

/// Chat service trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Run the full pipeline for one turn
    async fn handle_turn(
        &self,
        owner_id: &str,
        user_name: &str,
        request: TurnRequest,
    ) -> Result<TurnOutcome>;
}

/// Chat pipeline implementation
pub struct ChatPipeline {
    sessions: Arc<dyn SessionService>,
    retrieval: Arc<dyn RetrievalService>,
    memory: Arc<dyn MemoryService>,
    responder: Arc<dyn Responder>,
    catalog: Arc<dyn VehicleCatalog>,
    context_limit: usize,
}

impl ChatPipeline {
    pub fn new(
        sessions: Arc<dyn SessionService>,
        retrieval: Arc<dyn RetrievalService>,
        memory: Arc<dyn MemoryService>,
        responder: Arc<dyn Responder>,
        catalog: Arc<dyn VehicleCatalog>,
        context_limit: usize,
    ) -> Self {
        Self {
            sessions,
            retrieval,
            memory,
            responder,
            catalog,
            context_limit,
        }
    }
}

#[async_trait]
impl ChatService for ChatPipeline {
    async fn handle_turn(
        &self,
        owner_id: &str,
        user_name: &str,
        request: TurnRequest,
    ) -> Result<TurnOutcome> {
        let conversation = self
            .sessions
            .resolve(owner_id, request.session_token.clone())
            .await?;

        let context = self
            .retrieval
            .relevant_context(owner_id, &request.message, self.context_limit)
            .await?;

        let selected = if request.selected_vehicles.is_empty() {
            Vec::new()
        } else {
            self.catalog.fetch_by_ids(&request.selected_vehicles).await?
        };

        match self
            .responder
            .generate(&request.message, &context, &selected, user_name)
            .await
        {
            Ok(response) => {
                let note = context_note(&context);
                let message = self
                    .memory
                    .append_message(
                        &conversation,
                        &request.message,
                        Some(response.clone()),
                        &request.selected_vehicles,
                        note.clone(),
                    )
                    .await?;

                self.memory.derive_entry(&message).await?;

                tracing::info!(
                    "turn stored in conversation {} ({} context items)",
                    conversation.id,
                    context.len()
                );

                Ok(TurnOutcome {
                    response,
                    conversation_id: conversation.id,
                    session_token: conversation.session_token,
                    context_note: note,
                    selected,
                })
            }
            Err(e) => {
                // The user turn is still stored so the session survives for a
                // clean retry; no memory entry is derived from half a turn.
                if let Err(store_err) = self
                    .memory
                    .append_message(
                        &conversation,
                        &request.message,
                        None,
                        &request.selected_vehicles,
                        None,
                    )
                    .await
                {
                    tracing::warn!(
                        "failed to store user turn after generation failure: {}",
                        store_err
                    );
                }

                tracing::warn!("generation failed for conversation {}: {}", conversation.id, e);
                Err(e)
            }
        }
    }
}

/// Create the chat service
pub fn create_chat_service(
    sessions: Arc<dyn SessionService>,
    retrieval: Arc<dyn RetrievalService>,
    memory: Arc<dyn MemoryService>,
    responder: Arc<dyn Responder>,
    catalog: Arc<dyn VehicleCatalog>,
    context_limit: usize,
) -> Box<dyn ChatService> {
    Box::new(ChatPipeline::new(
        sessions, retrieval, memory, responder, catalog, context_limit,
    ))
}

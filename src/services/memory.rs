//! Conversation memory service.
//!
//! Owns the persistence lifecycle of a turn: appending the message, touching
//! the conversation (with lazy title derivation on the first message),
//! deriving the immutable memory entry, and serving history listings.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::conversation::{Conversation, ConversationSummary, preview_of};
use crate::models::memory_entry::{Intent, MemoryEntry};
use crate::models::message::Message;
use crate::services::extraction::EntityExtractor;
use crate::services::scoring;
use crate::storage::repository::{ConversationStore, MemoryEntryStore, MessageStore};

/// Conversation history listing
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    /// Summaries, last-updated descending
    pub conversations: Vec<ConversationSummary>,
    /// Total conversations for the owner
    pub total_conversations: u64,
}

/// One conversation with its ordered messages
#[derive(Debug, Clone)]
pub struct ConversationDetail {
    /// Conversation summary
    pub conversation: ConversationSummary,
    /// Messages in creation order
    pub messages: Vec<Message>,
}

/// Memory service trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Append a turn's message, touch the conversation and lazily set its title
    async fn append_message(
        &self,
        conversation: &Conversation,
        text: &str,
        response: Option<String>,
        selected_vehicles: &[String],
        context_note: Option<String>,
    ) -> Result<Message>;

    /// Derive and persist the memory entry for a stored message
    async fn derive_entry(&self, message: &Message) -> Result<MemoryEntry>;

    /// Conversation history for an owner
    async fn list_conversations(&self, owner_id: &str, limit: usize) -> Result<ConversationHistory>;

    /// One conversation with all messages; NotFound unless owned by the caller
    async fn conversation_detail(
        &self,
        owner_id: &str,
        conversation_id: &str,
    ) -> Result<ConversationDetail>;
}

/// Memory service implementation
pub struct MemoryServiceImpl {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    entries: Arc<dyn MemoryEntryStore>,
    extractor: EntityExtractor,
}

impl MemoryServiceImpl {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        entries: Arc<dyn MemoryEntryStore>,
    ) -> Self {
        Self {
            conversations,
            messages,
            entries,
            extractor: EntityExtractor::new(),
        }
    }

    async fn summarize(&self, conversation: &Conversation) -> Result<ConversationSummary> {
        let message_count = self
            .messages
            .count_by_conversation(&conversation.id)
            .await?;
        let preview = self
            .messages
            .last_in_conversation(&conversation.id)
            .await?
            .map(|m| preview_of(&m.content));

        Ok(ConversationSummary {
            id: conversation.id.clone(),
            session_token: conversation.session_token.clone(),
            title: conversation.display_title(),
            message_count,
            last_activity: conversation.updated_at,
            preview,
        })
    }
}

#[async_trait]
impl MemoryService for MemoryServiceImpl {
    async fn append_message(
        &self,
        conversation: &Conversation,
        text: &str,
        response: Option<String>,
        selected_vehicles: &[String],
        context_note: Option<String>,
    ) -> Result<Message> {
        let mut message = Message::new(&conversation.id, &conversation.owner_id, text);
        if let Some(response) = &response {
            message = message.with_response(response);
        }
        message = message.with_selected_vehicles(selected_vehicles);
        if let Some(note) = &context_note {
            message = message.with_context_note(note);
        }

        let message = self.messages.create(&message).await?;

        let mut conversation = conversation.clone();
        conversation.touch();
        if conversation.title.is_none() {
            let title = conversation_title(&self.extractor, text);
            tracing::debug!("titling conversation {}: {}", conversation.id, title);
            conversation.title = Some(title);
        }
        self.conversations
            .update(&conversation.id, &conversation)
            .await?;

        Ok(message)
    }

    async fn derive_entry(&self, message: &Message) -> Result<MemoryEntry> {
        let response = message.response.as_deref();
        let extraction = self.extractor.extract(&message.content);

        // Vehicles are picked up from both sides of the turn, so a model the
        // response introduced is recallable later.
        let joined = match response {
            Some(response) => format!("{} {}", message.content, response),
            None => message.content.clone(),
        };
        let vehicles = self.extractor.extract_models(&joined);

        let content = match response {
            Some(response) => format!("{} | {}", message.content, response),
            None => message.content.clone(),
        };

        let importance = scoring::importance(&message.content, response, &vehicles);

        let entry = MemoryEntry::new(
            &message.owner_id,
            &message.conversation_id,
            &message.id,
            &content,
            &extraction.keywords,
            extraction.intent,
            &vehicles,
            importance,
        );

        self.entries.create(&entry).await
    }

    async fn list_conversations(&self, owner_id: &str, limit: usize) -> Result<ConversationHistory> {
        let conversations = self.conversations.list_by_owner(owner_id, limit).await?;
        let total_conversations = self.conversations.count_by_owner(owner_id).await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in &conversations {
            summaries.push(self.summarize(conversation).await?);
        }

        Ok(ConversationHistory {
            conversations: summaries,
            total_conversations,
        })
    }

    async fn conversation_detail(
        &self,
        owner_id: &str,
        conversation_id: &str,
    ) -> Result<ConversationDetail> {
        let conversation = self
            .conversations
            .get_by_id(conversation_id)
            .await?
            .filter(|c| c.owner_id == owner_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("conversation not found: {}", conversation_id))
            })?;

        let messages = self.messages.list_by_conversation(conversation_id).await?;

        let summary = ConversationSummary {
            id: conversation.id.clone(),
            session_token: conversation.session_token.clone(),
            title: conversation.display_title(),
            message_count: messages.len() as u64,
            last_activity: conversation.updated_at,
            preview: messages.last().map(|m| preview_of(&m.content)),
        };

        Ok(ConversationDetail {
            conversation: summary,
            messages,
        })
    }
}

/// Title for a conversation, derived from its first message.
///
/// Templated by intent: "Comparing {a}, {b}", "Pricing for {model}",
/// "Specs for {model}", "About {model}", with generic fallbacks when no
/// model is mentioned.
pub fn conversation_title(extractor: &EntityExtractor, first_message: &str) -> String {
    let models = extractor.extract_models(first_message);
    let intent = extractor.classify_intent(first_message);

    match models.first() {
        Some(first) => match intent {
            Intent::Comparison => {
                let named: Vec<String> = models.iter().take(2).cloned().collect();
                format!("Comparing {}", named.join(", "))
            }
            Intent::Pricing => format!("Pricing for {}", first),
            Intent::Specifications => format!("Specs for {}", first),
            _ => format!("About {}", first),
        },
        None => match intent {
            Intent::Recommendation => "Car Recommendation".to_string(),
            _ => "New Car Inquiry".to_string(),
        },
    }
}

/// Create the memory service
pub fn create_memory_service(
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    entries: Arc<dyn MemoryEntryStore>,
) -> Box<dyn MemoryService> {
    Box::new(MemoryServiceImpl::new(conversations, messages, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("compare the x5 and the x3", "Comparing x5, x3")]
    #[case("what's the price of the m3", "Pricing for m3")]
    #[case("what are the specs of the z4", "Specs for z4")]
    #[case("tell me about the x5", "About x5")]
    #[case("what car should I buy", "Car Recommendation")]
    #[case("hello there", "New Car Inquiry")]
    fn test_conversation_title_templates(#[case] first_message: &str, #[case] expected: &str) {
        let extractor = EntityExtractor::new();
        assert_eq!(conversation_title(&extractor, first_message), expected);
    }

    #[test]
    fn test_comparison_title_caps_at_two_models() {
        let extractor = EntityExtractor::new();
        let title = conversation_title(&extractor, "compare the x5, x3 and x1");
        assert_eq!(title, "Comparing x5, x3");
    }
}

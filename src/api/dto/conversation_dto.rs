//! Conversation DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::conversation::ConversationSummary;
use crate::models::message::{Message, Sender};

/// Conversation summary in listings
#[derive(Debug, Serialize)]
pub struct ConversationSummaryResponse {
    /// Conversation identifier
    pub id: String,
    /// Session token
    pub session_token: String,
    /// Title
    pub title: String,
    /// Number of stored messages
    pub message_count: u64,
    /// Last activity time
    pub last_activity: DateTime<Utc>,
    /// Preview of the most recent message
    pub preview: Option<String>,
}

impl From<&ConversationSummary> for ConversationSummaryResponse {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            id: summary.id.clone(),
            session_token: summary.session_token.clone(),
            title: summary.title.clone(),
            message_count: summary.message_count,
            last_activity: summary.last_activity,
            preview: summary.preview.clone(),
        }
    }
}

/// Conversation history response
#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    /// Summaries, last-updated descending
    pub conversations: Vec<ConversationSummaryResponse>,
    /// Total conversations for the caller
    pub total_conversations: u64,
}

/// One message with its context
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Message identifier
    pub id: String,
    /// User text
    pub message: String,
    /// Generated response
    pub response: Option<String>,
    /// Sender tag
    pub sender: String,
    /// Selected vehicle ids
    pub selected_vehicles: Option<Vec<String>>,
    /// Context note stored with the turn
    pub context_used: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        let selected = message.selected_vehicle_ids();
        Self {
            id: message.id.clone(),
            message: message.content.clone(),
            response: message.response.clone(),
            sender: match message.sender {
                Sender::User => "user".to_string(),
                Sender::Bot => "bot".to_string(),
            },
            selected_vehicles: if selected.is_empty() { None } else { Some(selected) },
            context_used: message.context_note.clone(),
            created_at: message.created_at,
        }
    }
}

/// Conversation detail response
#[derive(Debug, Serialize)]
pub struct ConversationDetailResponse {
    /// Conversation summary
    pub conversation: ConversationSummaryResponse,
    /// Messages in creation order
    pub messages: Vec<MessageResponse>,
}

/// History listing query parameters
#[derive(Debug, Deserialize, Default)]
pub struct ListConversationsParams {
    /// Maximum conversations returned
    pub limit: Option<usize>,
}

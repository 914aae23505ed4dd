use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message sender tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Sender {
    /// User message
    #[serde(rename = "user")]
    User,
    /// Generated reply
    #[serde(rename = "bot")]
    Bot,
}

impl Default for Sender {
    fn default() -> Self {
        Sender::User
    }
}

/// Chat message entity
///
/// One row per turn: the raw user text together with the generated response,
/// created once and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message unique identifier
    pub id: String,

    /// Owning conversation
    pub conversation_id: String,

    /// Owning user
    pub owner_id: String,

    /// Raw user text
    pub content: String,

    /// Generated response, absent when generation failed
    pub response: Option<String>,

    /// Sender tag
    pub sender: Sender,

    /// Serialized list of selected vehicle ids
    pub selected_vehicles: Option<String>,

    /// Human-readable note on the historical context used for this turn
    pub context_note: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new user message
    pub fn new(conversation_id: &str, owner_id: &str, content: &str) -> Self {
        Self {
            id: format!("msg_{}", Uuid::new_v4()),
            conversation_id: conversation_id.to_string(),
            owner_id: owner_id.to_string(),
            content: content.to_string(),
            response: None,
            sender: Sender::User,
            selected_vehicles: None,
            context_note: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the generated response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    /// Attach the serialized selected-vehicle id list
    pub fn with_selected_vehicles(mut self, ids: &[String]) -> Self {
        if !ids.is_empty() {
            self.selected_vehicles = serde_json::to_string(ids).ok();
        }
        self
    }

    /// Attach the context note
    pub fn with_context_note(mut self, note: &str) -> Self {
        self.context_note = Some(note.to_string());
        self
    }

    /// Decode the selected vehicle id list.
    ///
    /// A malformed stored field degrades to an empty list.
    pub fn selected_vehicle_ids(&self) -> Vec<String> {
        match &self.selected_vehicles {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::warn!("malformed selected_vehicles on message {}: {}", self.id, e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }
}

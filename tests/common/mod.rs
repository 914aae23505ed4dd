//! Shared in-memory test doubles for the pipeline and API tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

use showroom::error::{AppError, Result};
use showroom::models::conversation::Conversation;
use showroom::models::memory_entry::MemoryEntry;
use showroom::models::message::Message;
use showroom::models::vehicle::Vehicle;
use showroom::services::catalog::VehicleCatalog;
use showroom::services::generator::Responder;
use showroom::services::retrieval::ContextItem;
use showroom::storage::repository::{ConversationStore, MemoryEntryStore, MessageStore};

/// In-memory conversation store
#[derive(Default)]
pub struct InMemoryConversationStore {
    rows: Mutex<Vec<Conversation>>,
}

impl InMemoryConversationStore {
    /// Backdate a conversation's last activity, for staleness scenarios
    pub fn set_updated_at(&self, id: &str, updated_at: DateTime<Utc>) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|c| c.id == id) {
            row.updated_at = updated_at;
        }
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation> {
        self.rows.lock().unwrap().push(conversation.clone());
        Ok(conversation.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Conversation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn update(&self, id: &str, conversation: &Conversation) -> Result<Option<Conversation>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                *row = conversation.clone();
                Ok(Some(conversation.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_by_token(&self, owner_id: &str, token: &str) -> Result<Option<Conversation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.owner_id == owner_id && c.session_token == token)
            .cloned())
    }

    async fn find_recent(
        &self,
        owner_id: &str,
        updated_after: DateTime<Utc>,
    ) -> Result<Option<Conversation>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|c| c.owner_id == owner_id && c.updated_at > updated_after)
            .max_by_key(|c| c.updated_at)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str, limit: usize) -> Result<Vec<Conversation>> {
        let rows = self.rows.lock().unwrap();
        let mut owned: Vec<Conversation> = rows
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<u64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .count() as u64)
    }
}

/// In-memory message store
#[derive(Default)]
pub struct InMemoryMessageStore {
    rows: Mutex<Vec<Message>>,
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, message: &Message) -> Result<Message> {
        self.rows.lock().unwrap().push(message.clone());
        Ok(message.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Message>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn list_by_conversation(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let rows = self.rows.lock().unwrap();
        let mut messages: Vec<Message> = rows
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    async fn count_by_conversation(&self, conversation_id: &str) -> Result<u64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .count() as u64)
    }

    async fn last_in_conversation(&self, conversation_id: &str) -> Result<Option<Message>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .max_by_key(|m| m.created_at)
            .cloned())
    }
}

/// In-memory memory entry store
#[derive(Default)]
pub struct InMemoryEntryStore {
    rows: Mutex<Vec<MemoryEntry>>,
}

impl InMemoryEntryStore {
    /// Backdate an entry, for recency-window scenarios
    pub fn set_created_at(&self, id: &str, created_at: DateTime<Utc>) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|e| e.id == id) {
            row.created_at = created_at;
        }
    }

    /// Corrupt an entry's serialized keyword list, for degradation scenarios
    pub fn corrupt_keywords(&self, id: &str) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|e| e.id == id) {
            row.keywords = "{broken".to_string();
        }
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl MemoryEntryStore for InMemoryEntryStore {
    async fn create(&self, entry: &MemoryEntry) -> Result<MemoryEntry> {
        self.rows.lock().unwrap().push(entry.clone());
        Ok(entry.clone())
    }

    async fn list_since(
        &self,
        owner_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<MemoryEntry>> {
        let rows = self.rows.lock().unwrap();
        let mut entries: Vec<MemoryEntry> = rows
            .iter()
            .filter(|e| e.owner_id == owner_id && e.created_at > cutoff)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }
}

/// Responder returning a fixed reply
pub struct FixedResponder {
    pub reply: String,
}

impl FixedResponder {
    pub fn saying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl Responder for FixedResponder {
    async fn generate(
        &self,
        _message: &str,
        _context: &[ContextItem],
        _selected: &[Vehicle],
        _user_name: &str,
    ) -> Result<String> {
        Ok(self.reply.clone())
    }
}

/// Responder that always fails
pub struct FailingResponder;

#[async_trait]
impl Responder for FailingResponder {
    async fn generate(
        &self,
        _message: &str,
        _context: &[ContextItem],
        _selected: &[Vehicle],
        _user_name: &str,
    ) -> Result<String> {
        Err(AppError::Generation("model offline".to_string()))
    }
}

/// Catalog over a fixed vehicle list
pub struct StaticCatalog {
    pub vehicles: Vec<Vehicle>,
}

impl StaticCatalog {
    pub fn empty() -> Self {
        Self {
            vehicles: Vec::new(),
        }
    }

    pub fn with(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }
}

#[async_trait]
impl VehicleCatalog for StaticCatalog {
    async fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<Vehicle>> {
        Ok(self
            .vehicles
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }
}

/// A catalog vehicle fixture
pub fn vehicle(id: &str, model_name: &str, year: i32, trim: &str, price: i64) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        model_name: model_name.to_string(),
        model_year: year,
        trim_variant: trim.to_string(),
        body_type: "SUV".to_string(),
        base_msrp_usd: Some(price),
        ..Default::default()
    }
}

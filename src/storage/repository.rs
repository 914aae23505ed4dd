use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Surreal, engine::any::Any};

use crate::error::{AppError, Result};
use crate::models::conversation::Conversation;
use crate::models::memory_entry::MemoryEntry;
use crate::models::message::Message;

/// Conversation persistence
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a conversation
    async fn create(&self, conversation: &Conversation) -> Result<Conversation>;

    /// Get a conversation by id
    async fn get_by_id(&self, id: &str) -> Result<Option<Conversation>>;

    /// Update a conversation
    async fn update(&self, id: &str, conversation: &Conversation) -> Result<Option<Conversation>>;

    /// Find by exact (owner, session token) pair
    async fn find_by_token(&self, owner_id: &str, token: &str) -> Result<Option<Conversation>>;

    /// Most recently updated conversation for an owner after a cutoff
    async fn find_recent(
        &self,
        owner_id: &str,
        updated_after: DateTime<Utc>,
    ) -> Result<Option<Conversation>>;

    /// List conversations for an owner, last-updated descending
    async fn list_by_owner(&self, owner_id: &str, limit: usize) -> Result<Vec<Conversation>>;

    /// Count conversations for an owner
    async fn count_by_owner(&self, owner_id: &str) -> Result<u64>;
}

/// Message persistence
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Create a message
    async fn create(&self, message: &Message) -> Result<Message>;

    /// Get a message by id
    async fn get_by_id(&self, id: &str) -> Result<Option<Message>>;

    /// All messages of a conversation in creation order
    async fn list_by_conversation(&self, conversation_id: &str) -> Result<Vec<Message>>;

    /// Count messages in a conversation
    async fn count_by_conversation(&self, conversation_id: &str) -> Result<u64>;

    /// Most recent message of a conversation
    async fn last_in_conversation(&self, conversation_id: &str) -> Result<Option<Message>>;
}

/// Memory entry persistence
#[async_trait]
pub trait MemoryEntryStore: Send + Sync {
    /// Create a memory entry
    async fn create(&self, entry: &MemoryEntry) -> Result<MemoryEntry>;

    /// All entries for an owner newer than a cutoff, oldest first.
    ///
    /// The ascending order is what downstream ranking uses as its stable
    /// tiebreak, so it must stay deterministic.
    async fn list_since(
        &self,
        owner_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<MemoryEntry>>;
}

fn count_from(result: Vec<serde_json::Value>) -> u64 {
    result
        .first()
        .and_then(|v| v.get("count"))
        .and_then(|c| c.as_u64())
        .unwrap_or(0)
}

/// SurrealDB conversation store
#[derive(Clone)]
pub struct SurrealConversationStore {
    db: Surreal<Any>,
}

impl SurrealConversationStore {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationStore for SurrealConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation> {
        let created: Option<Conversation> = self
            .db
            .create(("conversation", conversation.id.as_str()))
            .content(conversation.clone())
            .await?;

        created.ok_or_else(|| {
            AppError::Database(format!("failed to create conversation: {}", conversation.id))
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Conversation>> {
        let result: Option<Conversation> = self.db.select(("conversation", id)).await?;
        Ok(result)
    }

    async fn update(&self, id: &str, conversation: &Conversation) -> Result<Option<Conversation>> {
        let updated: Option<Conversation> = self
            .db
            .update(("conversation", id))
            .content(conversation.clone())
            .await?;
        Ok(updated)
    }

    async fn find_by_token(&self, owner_id: &str, token: &str) -> Result<Option<Conversation>> {
        let query = "
            SELECT * FROM conversation
            WHERE owner_id = $owner_id AND session_token = $token
            LIMIT 1
        ";
        let result: Vec<Conversation> = self
            .db
            .query(query)
            .bind(("owner_id", owner_id.to_string()))
            .bind(("token", token.to_string()))
            .await?
            .take(0)?;
        Ok(result.into_iter().next())
    }

    async fn find_recent(
        &self,
        owner_id: &str,
        updated_after: DateTime<Utc>,
    ) -> Result<Option<Conversation>> {
        let query = "
            SELECT * FROM conversation
            WHERE owner_id = $owner_id AND updated_at > $cutoff
            ORDER BY updated_at DESC
            LIMIT 1
        ";
        let result: Vec<Conversation> = self
            .db
            .query(query)
            .bind(("owner_id", owner_id.to_string()))
            .bind(("cutoff", updated_after.to_rfc3339()))
            .await?
            .take(0)?;
        Ok(result.into_iter().next())
    }

    async fn list_by_owner(&self, owner_id: &str, limit: usize) -> Result<Vec<Conversation>> {
        let query = "
            SELECT * FROM conversation
            WHERE owner_id = $owner_id
            ORDER BY updated_at DESC
            LIMIT $limit
        ";
        let result: Vec<Conversation> = self
            .db
            .query(query)
            .bind(("owner_id", owner_id.to_string()))
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(result)
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<u64> {
        let query = "
            SELECT count() FROM conversation
            WHERE owner_id = $owner_id
            GROUP ALL
        ";
        let result: Vec<serde_json::Value> = self
            .db
            .query(query)
            .bind(("owner_id", owner_id.to_string()))
            .await?
            .take(0)?;
        Ok(count_from(result))
    }
}

/// SurrealDB message store
#[derive(Clone)]
pub struct SurrealMessageStore {
    db: Surreal<Any>,
}

impl SurrealMessageStore {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageStore for SurrealMessageStore {
    async fn create(&self, message: &Message) -> Result<Message> {
        let created: Option<Message> = self
            .db
            .create(("message", message.id.as_str()))
            .content(message.clone())
            .await?;

        created
            .ok_or_else(|| AppError::Database(format!("failed to create message: {}", message.id)))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Message>> {
        let result: Option<Message> = self.db.select(("message", id)).await?;
        Ok(result)
    }

    async fn list_by_conversation(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let query = "
            SELECT * FROM message
            WHERE conversation_id = $conversation_id
            ORDER BY created_at ASC
        ";
        let result: Vec<Message> = self
            .db
            .query(query)
            .bind(("conversation_id", conversation_id.to_string()))
            .await?
            .take(0)?;
        Ok(result)
    }

    async fn count_by_conversation(&self, conversation_id: &str) -> Result<u64> {
        let query = "
            SELECT count() FROM message
            WHERE conversation_id = $conversation_id
            GROUP ALL
        ";
        let result: Vec<serde_json::Value> = self
            .db
            .query(query)
            .bind(("conversation_id", conversation_id.to_string()))
            .await?
            .take(0)?;
        Ok(count_from(result))
    }

    async fn last_in_conversation(&self, conversation_id: &str) -> Result<Option<Message>> {
        let query = "
            SELECT * FROM message
            WHERE conversation_id = $conversation_id
            ORDER BY created_at DESC
            LIMIT 1
        ";
        let result: Vec<Message> = self
            .db
            .query(query)
            .bind(("conversation_id", conversation_id.to_string()))
            .await?
            .take(0)?;
        Ok(result.into_iter().next())
    }
}

/// SurrealDB memory entry store
#[derive(Clone)]
pub struct SurrealMemoryEntryStore {
    db: Surreal<Any>,
}

impl SurrealMemoryEntryStore {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemoryEntryStore for SurrealMemoryEntryStore {
    async fn create(&self, entry: &MemoryEntry) -> Result<MemoryEntry> {
        let created: Option<MemoryEntry> = self
            .db
            .create(("memory_entry", entry.id.as_str()))
            .content(entry.clone())
            .await?;

        created.ok_or_else(|| {
            AppError::Database(format!("failed to create memory entry: {}", entry.id))
        })
    }

    async fn list_since(
        &self,
        owner_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<MemoryEntry>> {
        let query = "
            SELECT * FROM memory_entry
            WHERE owner_id = $owner_id AND created_at > $cutoff
            ORDER BY created_at ASC
        ";
        let result: Vec<MemoryEntry> = self
            .db
            .query(query)
            .bind(("owner_id", owner_id.to_string()))
            .bind(("cutoff", cutoff.to_rfc3339()))
            .await?
            .take(0)?;
        Ok(result)
    }
}

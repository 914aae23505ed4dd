//! Session resolution.
//!
//! Maps a user plus an optional client session token to an existing or newly
//! created conversation, applying the inactivity staleness window.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::error::Result;
use crate::models::conversation::Conversation;
use crate::storage::repository::ConversationStore;

/// Session resolution service trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Resolve an owner and optional session token to a conversation
    async fn resolve(
        &self,
        owner_id: &str,
        session_token: Option<String>,
    ) -> Result<Conversation>;
}

/// Session resolver implementation
pub struct SessionResolver {
    conversations: Arc<dyn ConversationStore>,
    session_timeout: Duration,
}

impl SessionResolver {
    /// Create a new resolver with the staleness window in hours
    pub fn new(conversations: Arc<dyn ConversationStore>, session_timeout_hours: i64) -> Self {
        Self {
            conversations,
            session_timeout: Duration::hours(session_timeout_hours),
        }
    }
}

#[async_trait]
impl SessionService for SessionResolver {
    async fn resolve(
        &self,
        owner_id: &str,
        session_token: Option<String>,
    ) -> Result<Conversation> {
        // A non-empty token takes the exact-match path. An unknown token is
        // not an error: the client may pre-generate its id before the first
        // message, so a new conversation is created carrying that token.
        if let Some(token) = session_token.filter(|t| !t.is_empty()) {
            if let Some(conversation) = self.conversations.find_by_token(owner_id, &token).await? {
                tracing::debug!("resolved conversation {} by token", conversation.id);
                return Ok(conversation);
            }

            let conversation = Conversation::new(owner_id, Some(token.as_str()));
            tracing::info!(
                "starting conversation {} for {} with client token",
                conversation.id,
                owner_id
            );
            return self.conversations.create(&conversation).await;
        }

        // No token: same session if the inactivity gap is below the
        // staleness window.
        let cutoff = Utc::now() - self.session_timeout;
        if let Some(conversation) = self.conversations.find_recent(owner_id, cutoff).await? {
            tracing::debug!("resolved recent conversation {}", conversation.id);
            return Ok(conversation);
        }

        let conversation = Conversation::new(owner_id, None);
        tracing::info!("starting conversation {} for {}", conversation.id, owner_id);
        self.conversations.create(&conversation).await
    }
}

/// Create the session resolution service
pub fn create_session_service(
    conversations: Arc<dyn ConversationStore>,
    session_timeout_hours: i64,
) -> Box<dyn SessionService> {
    Box::new(SessionResolver::new(conversations, session_timeout_hours))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversation entity
///
/// Groups the turns of one chat session. At most one conversation is active
/// per (owner, session token) pair; after the staleness window a new session
/// is started even without an explicit token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation unique identifier
    pub id: String,

    /// Owning user identifier
    pub owner_id: String,

    /// Opaque client-visible session token
    pub session_token: String,

    /// Title, lazily derived from the first message
    pub title: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last update time, touched on every appended message
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation.
    ///
    /// A client-supplied token is carried as-is; otherwise a fresh opaque
    /// token is generated.
    pub fn new(owner_id: &str, session_token: Option<&str>) -> Self {
        let now = Utc::now();
        let token = match session_token {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            session_token: token,
            title: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the last-activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Title with the untitled fallback applied
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| "Untitled Conversation".to_string())
    }
}

/// Conversation summary used in history listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier
    pub id: String,

    /// Session token
    pub session_token: String,

    /// Title (untitled fallback applied)
    pub title: String,

    /// Number of stored messages
    pub message_count: u64,

    /// Last activity time
    pub last_activity: DateTime<Utc>,

    /// Preview of the most recent message
    pub preview: Option<String>,
}

/// Ellipsis-truncated preview of a message text.
///
/// Counts characters rather than bytes so multi-byte text never splits.
pub fn preview_of(text: &str) -> String {
    const PREVIEW_CHARS: usize = 50;

    if text.chars().count() > PREVIEW_CHARS {
        let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

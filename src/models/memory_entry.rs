use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classified intent of a user message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Intent {
    /// Comparing two or more models
    #[serde(rename = "comparison")]
    Comparison,
    /// Price and cost questions
    #[serde(rename = "pricing")]
    Pricing,
    /// Technical specification questions
    #[serde(rename = "specifications")]
    Specifications,
    /// Purchase advice
    #[serde(rename = "recommendation")]
    Recommendation,
    /// Everything else
    #[serde(rename = "general")]
    General,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Comparison => write!(f, "comparison"),
            Intent::Pricing => write!(f, "pricing"),
            Intent::Specifications => write!(f, "specifications"),
            Intent::Recommendation => write!(f, "recommendation"),
            Intent::General => write!(f, "general"),
        }
    }
}

impl Default for Intent {
    fn default() -> Self {
        Intent::General
    }
}

/// Derived memory entry
///
/// An immutable, preprocessed summary of one turn, created alongside the
/// message and used for relevance scoring on later queries. Keyword and
/// vehicle lists are stored as serialized JSON strings; decoding failures
/// degrade to empty lists rather than errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Entry unique identifier
    pub id: String,

    /// Owning user
    pub owner_id: String,

    /// Owning conversation
    pub conversation_id: String,

    /// Source message
    pub message_id: String,

    /// Concatenated user text and response
    pub content: String,

    /// Serialized keyword list
    pub keywords: String,

    /// Classified intent
    pub intent: Intent,

    /// Serialized list of mentioned vehicle models
    pub vehicles_mentioned: String,

    /// Importance score in [0.0, 1.0]
    pub importance: f32,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl MemoryEntry {
    /// Create a new memory entry for a message
    pub fn new(
        owner_id: &str,
        conversation_id: &str,
        message_id: &str,
        content: &str,
        keywords: &[String],
        intent: Intent,
        vehicles: &[String],
        importance: f32,
    ) -> Self {
        Self {
            id: format!("mem_{}", Uuid::new_v4()),
            owner_id: owner_id.to_string(),
            conversation_id: conversation_id.to_string(),
            message_id: message_id.to_string(),
            content: content.to_string(),
            keywords: serde_json::to_string(keywords).unwrap_or_else(|_| "[]".to_string()),
            intent,
            vehicles_mentioned: serde_json::to_string(vehicles)
                .unwrap_or_else(|_| "[]".to_string()),
            importance: importance.clamp(0.0, 1.0),
            created_at: Utc::now(),
        }
    }

    /// Decode the stored keyword list, degrading to empty on malformed data
    pub fn keyword_list(&self) -> Vec<String> {
        decode_list(&self.keywords, "keywords", &self.id)
    }

    /// Decode the stored vehicle list, degrading to empty on malformed data
    pub fn vehicle_list(&self) -> Vec<String> {
        decode_list(&self.vehicles_mentioned, "vehicles_mentioned", &self.id)
    }
}

fn decode_list(raw: &str, field: &str, entry_id: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("malformed {} on memory entry {}: {}", field, entry_id, e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(keywords: &[&str], vehicles: &[&str]) -> MemoryEntry {
        MemoryEntry::new(
            "user_1",
            "conv_1",
            "msg_1",
            "Tell me about the X5 | The X5 is a midsize SUV.",
            &keywords.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            Intent::General,
            &vehicles.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            0.5,
        )
    }

    #[test]
    fn test_entry_round_trips_lists() {
        let entry = entry_with(&["bmw", "x5"], &["x5"]);
        assert_eq!(entry.keyword_list(), vec!["bmw", "x5"]);
        assert_eq!(entry.vehicle_list(), vec!["x5"]);
    }

    #[test]
    fn test_malformed_lists_degrade_to_empty() {
        let mut entry = entry_with(&["bmw"], &[]);
        entry.keywords = "not json at all".to_string();
        entry.vehicles_mentioned = "[\"unterminated".to_string();
        assert!(entry.keyword_list().is_empty());
        assert!(entry.vehicle_list().is_empty());
    }

    #[test]
    fn test_importance_is_clamped() {
        let entry = MemoryEntry::new(
            "user_1",
            "conv_1",
            "msg_1",
            "content",
            &[],
            Intent::General,
            &[],
            1.7,
        );
        assert!((entry.importance - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_intent_serialization() {
        assert_eq!(Intent::Comparison.to_string(), "comparison");
        let json = serde_json::to_string(&Intent::Specifications).unwrap();
        assert_eq!(json, "\"specifications\"");
        let parsed: Intent = serde_json::from_str("\"pricing\"").unwrap();
        assert_eq!(parsed, Intent::Pricing);
    }
}

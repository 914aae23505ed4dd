//! Relevance and importance scoring.
//!
//! Relevance composes keyword overlap, intent match, vehicle overlap and a
//! linear recency decay, then multiplies by the entry's stored importance.
//! The weighted sum can exceed 1.0 before the multiplier; downstream ranking
//! only relies on relative order, so the score is left unnormalized.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::memory_entry::MemoryEntry;
use crate::services::extraction::{COMPARISON_WORDS, Extraction};

/// Weight of the keyword-overlap fraction
const KEYWORD_WEIGHT: f32 = 0.5;
/// Bonus for a matching intent
const INTENT_WEIGHT: f32 = 0.3;
/// Weight of the vehicle-overlap fraction
const ENTITY_WEIGHT: f32 = 0.4;
/// Maximum recency bonus, at age zero
const RECENCY_WEIGHT: f32 = 0.2;
/// Age in days at which the recency bonus reaches zero
const RECENCY_WINDOW_DAYS: i64 = 30;
/// Response length above which a turn counts as detailed
const LONG_RESPONSE_CHARS: usize = 200;

/// Relevance scorer for stored memory entries
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    threshold: f32,
}

impl RelevanceScorer {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Combined relevance of a stored entry against an extracted query.
    ///
    /// Malformed serialized keyword/vehicle fields decode to empty lists and
    /// contribute zero for that dimension.
    pub fn score(&self, entry: &MemoryEntry, query: &Extraction, now: DateTime<Utc>) -> f32 {
        let mut score = 0.0f32;

        let entry_keywords: HashSet<String> = entry.keyword_list().into_iter().collect();
        if !entry_keywords.is_empty() {
            let common = query
                .keywords
                .iter()
                .filter(|k| entry_keywords.contains(*k))
                .count();
            score += common as f32 / entry_keywords.len() as f32 * KEYWORD_WEIGHT;
        }

        if entry.intent == query.intent {
            score += INTENT_WEIGHT;
        }

        let entry_vehicles: HashSet<String> = entry.vehicle_list().into_iter().collect();
        if !entry_vehicles.is_empty() && !query.entities.is_empty() {
            let common = query
                .entities
                .iter()
                .filter(|m| entry_vehicles.contains(*m))
                .count();
            score += common as f32 / entry_vehicles.len() as f32 * ENTITY_WEIGHT;
        }

        score += recency_bonus(entry.created_at, now);

        // Importance multiplies the whole composition: a low-importance entry
        // stays suppressed even on a perfect match.
        score * entry.importance
    }

    /// Whether a combined score clears the relevance floor.
    ///
    /// The floor applies to the final combined score, after the importance
    /// multiplier, never to the raw composition.
    pub fn is_relevant(&self, score: f32) -> bool {
        score > self.threshold
    }
}

/// Linear recency decay: [`RECENCY_WEIGHT`] at age zero down to 0 at
/// [`RECENCY_WINDOW_DAYS`] and beyond.
fn recency_bonus(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
    let age_days = (now - created_at).num_days();
    if age_days >= RECENCY_WINDOW_DAYS {
        return 0.0;
    }
    let age_days = age_days.max(0) as f32;
    (RECENCY_WINDOW_DAYS as f32 - age_days) / RECENCY_WINDOW_DAYS as f32 * RECENCY_WEIGHT
}

/// Importance of a turn for future recall, clamped to [0.0, 1.0].
///
/// Base 0.5; +0.2 when more than one vehicle is mentioned; +0.2 when the user
/// text carries a comparison signal word; +0.1 when the response is long.
pub fn importance(user_text: &str, response: Option<&str>, vehicles: &[String]) -> f32 {
    let mut score = 0.5f32;

    if vehicles.len() > 1 {
        score += 0.2;
    }

    let lower = user_text.to_lowercase();
    if COMPARISON_WORDS.iter().any(|w| lower.contains(w)) {
        score += 0.2;
    }

    if response.map(|r| r.len() > LONG_RESPONSE_CHARS).unwrap_or(false) {
        score += 0.1;
    }

    score.min(1.0)
}

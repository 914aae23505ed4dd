//! Chat DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::vehicle::Vehicle;
use crate::services::retrieval::ContextItem;

/// Chat turn request
#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct ChatRequest {
    /// User message
    #[validate(length(min = 1, max = 4000, message = "message must be 1-4000 characters"))]
    pub message: String,
    /// Selected vehicle catalog ids
    pub selected_vehicles: Option<Vec<String>>,
    /// Client session token
    pub session_token: Option<String>,
}

/// Vehicle details in responses
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    /// Catalog identifier
    pub id: String,
    /// Model name
    pub model_name: String,
    /// Model year
    pub model_year: i32,
    /// Trim variant
    pub trim_variant: String,
    /// Body type
    pub body_type: String,
    /// Engine type
    pub engine_type: Option<String>,
    /// Engine power (hp)
    pub horsepower_hp: Option<i32>,
    /// Base MSRP (USD)
    pub base_msrp_usd: Option<i64>,
    /// Product image link
    pub image_link: Option<String>,
    /// Computed display name
    pub display_name: String,
}

impl From<&Vehicle> for VehicleResponse {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.clone(),
            model_name: vehicle.model_name.clone(),
            model_year: vehicle.model_year,
            trim_variant: vehicle.trim_variant.clone(),
            body_type: vehicle.body_type.clone(),
            engine_type: vehicle.engine_type.clone(),
            horsepower_hp: vehicle.horsepower_hp,
            base_msrp_usd: vehicle.base_msrp_usd,
            image_link: vehicle.image_link.clone(),
            display_name: vehicle.display_name(),
        }
    }
}

/// Chat turn response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Generated response text
    pub response: String,
    /// Session token to send with the next turn
    pub session_token: String,
    /// Note on the historical context used
    pub context_used: Option<String>,
    /// Resolved selected vehicle details
    pub selected_vehicles_info: Option<Vec<VehicleResponse>>,
    /// Response time
    pub timestamp: DateTime<Utc>,
}

/// Context preview query parameters
#[derive(Debug, Deserialize)]
pub struct ContextParams {
    /// Query text
    pub q: String,
    /// Maximum items
    pub limit: Option<usize>,
}

/// One context item in the preview
#[derive(Debug, Serialize)]
pub struct ContextItemResponse {
    /// Original user text
    pub message: String,
    /// Generated response of that turn
    pub response: Option<String>,
    /// Vehicle models mentioned
    pub vehicles_mentioned: Vec<String>,
    /// Stored intent
    pub intent: String,
    /// Combined relevance score
    pub relevance_score: f32,
    /// When the turn happened
    pub timestamp: DateTime<Utc>,
}

impl From<&ContextItem> for ContextItemResponse {
    fn from(item: &ContextItem) -> Self {
        Self {
            message: item.message.clone(),
            response: item.response.clone(),
            vehicles_mentioned: item.vehicles_mentioned.clone(),
            intent: item.intent.to_string(),
            relevance_score: item.relevance_score,
            timestamp: item.timestamp,
        }
    }
}

/// Context preview response
#[derive(Debug, Serialize)]
pub struct ContextPreviewResponse {
    /// Echoed query
    pub query: String,
    /// Ranked context items, highest relevance first
    pub items: Vec<ContextItemResponse>,
}

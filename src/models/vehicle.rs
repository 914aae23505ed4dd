use serde::{Deserialize, Serialize};

/// Catalog vehicle record
///
/// Explicit mapping of a catalog row with typed optional fields. Anything the
/// catalog leaves blank stays `None`; numeric fields are never defaulted to
/// zero so absence is distinguishable from a real value.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Vehicle {
    /// Catalog identifier
    pub id: String,

    /// Model name, e.g. "X5"
    pub model_name: String,

    /// Model year
    pub model_year: i32,

    /// Trim variant, e.g. "xDrive40i"
    pub trim_variant: String,

    /// Body type, e.g. "SUV"
    pub body_type: String,

    /// Engine type
    pub engine_type: Option<String>,

    /// Engine power (hp)
    pub horsepower_hp: Option<i32>,

    /// Transmission
    pub transmission: Option<String>,

    /// Combined fuel consumption (l/100km)
    pub fuel_consumption_combined: Option<f64>,

    /// Base MSRP (USD)
    pub base_msrp_usd: Option<i64>,

    /// Product image link
    pub image_link: Option<String>,
}

impl Vehicle {
    /// Human-readable display name, e.g. "2023 X5 xDrive40i"
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.model_year, self.model_name, self.trim_variant)
            .trim()
            .to_string()
    }
}

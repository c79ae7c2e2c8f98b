use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved conversion, trimmed to the most recent entries by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub id: Uuid,
    pub from_unit: String,
    pub to_unit: String,
    pub from_value: f64,
    pub to_value: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for saving a conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConversion {
    pub from_unit: String,
    pub to_unit: String,
    pub from_value: f64,
    pub to_value: f64,
    pub category: String,
}

/// A favorite unit pair. Unique on (from_unit, to_unit, category).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub id: Uuid,
    pub from_unit: String,
    pub to_unit: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for adding a favorite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub from_unit: String,
    pub to_unit: String,
    pub category: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Unit descriptor returned by the units listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UnitDto {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub category: String,
}

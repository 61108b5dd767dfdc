use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shop catalog entry. Only `id` and `price` take part in pricing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
}

/// A scanned hourly slot and the price it would show.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCandidate {
    pub timestamp: DateTime<Utc>,
    pub price: i64,
}

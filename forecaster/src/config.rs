use crate::services::presentation::DisplayZone;
use crate::services::pricing::PriceBand;
use chrono::{DateTime, FixedOffset};
use std::path::PathBuf;

/// Shop closes at 2025-09-10 00:00 EDT.
pub const DEFAULT_SHOP_CLOSES: &str = "2025-09-10T00:00:00-04:00";
pub const DEFAULT_BASE_PRICE: f64 = 250.0;
pub const DEFAULT_TOP_K: usize = 6;
pub const DEFAULT_ITEMS_PATH: &str = "data/items.json";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "Invalid value {:?} for {}: {}", value, key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Startup configuration, read once and passed by reference afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub band: PriceBand,
    pub base_price: f64,
    pub top_k: usize,
    pub shop_closes: DateTime<FixedOffset>,
    pub items_path: PathBuf,
    pub display_zone: DisplayZone,
    pub port: u16,
}

fn parse_deadline(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|e| e.to_string())
}

fn parse_var<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }),
    }
}

impl Config {
    /// Reads the process environment, merging `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_band = PriceBand::default();

        let min_percent = parse_var("MIN_PERCENT", lookup("MIN_PERCENT"), default_band.min_percent)?;
        let max_percent = parse_var("MAX_PERCENT", lookup("MAX_PERCENT"), default_band.max_percent)?;

        let base_price: f64 = parse_var("BASE_PRICE", lookup("BASE_PRICE"), DEFAULT_BASE_PRICE)?;
        if !base_price.is_finite() || base_price <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "BASE_PRICE",
                value: base_price.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }

        let top_k = parse_var("TOP_K", lookup("TOP_K"), DEFAULT_TOP_K)?;
        let port = parse_var("PORT", lookup("PORT"), DEFAULT_PORT)?;

        let closes_raw = lookup("SHOP_CLOSES").unwrap_or_else(|| DEFAULT_SHOP_CLOSES.to_string());
        let shop_closes = parse_deadline(&closes_raw).map_err(|reason| ConfigError::Invalid {
            key: "SHOP_CLOSES",
            value: closes_raw.clone(),
            reason,
        })?;

        let items_path = lookup("ITEMS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ITEMS_PATH));

        let display_zone = match lookup("DISPLAY_TZ") {
            Some(value) => DisplayZone::parse(&value).ok_or_else(|| ConfigError::Invalid {
                key: "DISPLAY_TZ",
                value: value.clone(),
                reason: "expected 'utc', 'local' or an IANA zone name".to_string(),
            })?,
            None => DisplayZone::Utc,
        };

        Ok(Self {
            band: PriceBand::new(min_percent, max_percent),
            base_price,
            top_k,
            shop_closes,
            items_path,
            display_zone,
            port,
        })
    }
}

use crate::models::PriceCandidate;
use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

/// Zone used when rendering candidate timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    #[default]
    Utc,
    Local,
    Named(Tz),
}

impl DisplayZone {
    /// Parses `utc`, `local`, or an IANA zone name such as `America/New_York`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "utc" => Some(DisplayZone::Utc),
            "local" => Some(DisplayZone::Local),
            _ => value.trim().parse::<Tz>().ok().map(DisplayZone::Named),
        }
    }

    pub fn label(&self) -> String {
        match self {
            DisplayZone::Utc => "UTC".to_string(),
            DisplayZone::Local => "Local Time".to_string(),
            DisplayZone::Named(tz) => tz.name().to_string(),
        }
    }

    /// Renders as `MM/DD at HH:00 AM`. Minutes are always printed as `00`.
    pub fn format_slot(&self, timestamp: &DateTime<Utc>) -> String {
        const SLOT_FORMAT: &str = "%m/%d at %I:00 %p";
        match self {
            DisplayZone::Utc => timestamp.format(SLOT_FORMAT).to_string(),
            DisplayZone::Local => timestamp.with_timezone(&Local).format(SLOT_FORMAT).to_string(),
            DisplayZone::Named(tz) => timestamp.with_timezone(tz).format(SLOT_FORMAT).to_string(),
        }
    }
}

/// Signed percent difference of `price` relative to `base_price`.
pub fn percent_change(price: i64, base_price: f64) -> f64 {
    (price as f64 - base_price) / base_price * 100.0
}

pub fn describe_change(price: i64, base_price: f64) -> String {
    let change = percent_change(price, base_price);
    if change < 0.0 {
        format!("discount by {:.2}%", -change)
    } else {
        format!("hike by {:.2}%", change)
    }
}

/// Whole hours from `now` until the slot, truncated toward zero.
pub fn hours_away(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> i64 {
    (*timestamp - *now).num_hours()
}

pub fn format_candidate(
    candidate: &PriceCandidate,
    base_price: f64,
    now: &DateTime<Utc>,
    zone: &DisplayZone,
) -> String {
    format!(
        "{} {} {} ({} hours away)",
        zone.format_slot(&candidate.timestamp),
        zone.label(),
        describe_change(candidate.price, base_price),
        hours_away(&candidate.timestamp, now)
    )
}

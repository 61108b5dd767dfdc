use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const MILLIS_PER_HOUR: i64 = 1000 * 60 * 60;

/// Percentage band a randomized price may move within, relative to the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min_percent: i64,
    pub max_percent: i64,
}

impl Default for PriceBand {
    fn default() -> Self {
        Self {
            min_percent: 90,
            max_percent: 110,
        }
    }
}

impl PriceBand {
    pub fn new(min_percent: i64, max_percent: i64) -> Self {
        Self {
            min_percent,
            max_percent,
        }
    }

    /// Effective (min, max) percents. The minimum is at least 1 and the
    /// maximum is at least one point above the minimum.
    pub fn safe_bounds(&self) -> (i64, i64) {
        let safe_min = self.min_percent.max(1);
        let safe_max = self.max_percent.max(safe_min.saturating_add(1));
        (safe_min, safe_max)
    }

    /// Inclusive integer price range reachable for `base_price`.
    pub fn price_bounds(&self, base_price: f64) -> (i64, i64) {
        let (safe_min, safe_max) = self.safe_bounds();
        let min_price = (base_price * safe_min as f64 / 100.0).floor() as i64;
        let max_price = (base_price * safe_max as f64 / 100.0).ceil() as i64;
        (min_price, max_price)
    }
}

/// Hour bucket of an instant: epoch milliseconds floor-divided by one hour.
pub fn hour_index<Tz: TimeZone>(instant: &DateTime<Tz>) -> i64 {
    instant.timestamp_millis().div_euclid(MILLIS_PER_HOUR)
}

/// Start of the given hour bucket, in milliseconds since the epoch.
pub fn hour_start_millis(hour_index: i64) -> i64 {
    hour_index * MILLIS_PER_HOUR
}

fn hourly_digest(user_id: &str, item_id: &str, hour_index: i64) -> [u8; 32] {
    let combined = format!("{}-{}-{}", user_id.trim(), item_id, hour_index);
    Sha256::digest(combined.as_bytes()).into()
}

fn seed_word(digest: &[u8; 32]) -> u32 {
    // First 8 hex characters of the digest == first 4 bytes, big-endian
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Deterministic value in `[0, 1]` for a (user, item, hour) triple.
pub fn hourly_random(user_id: &str, item_id: &str, hour_index: i64) -> f64 {
    let digest = hourly_digest(user_id, item_id, hour_index);
    seed_word(&digest) as f64 / u32::MAX as f64
}

/// Randomized integer price for `base_price` within `band`, never below 1.
pub fn compute_price(
    user_id: &str,
    item_id: &str,
    hour_index: i64,
    base_price: f64,
    band: &PriceBand,
) -> i64 {
    let random = hourly_random(user_id, item_id, hour_index);
    price_from_random(random, base_price, band)
}

fn price_from_random(random: f64, base_price: f64, band: &PriceBand) -> i64 {
    let (safe_min, safe_max) = band.safe_bounds();
    let (min_price, max_price) = band.price_bounds(base_price);

    let percent_range = (safe_max - safe_min) as f64;
    let random_percent = safe_min as f64 + random * percent_range;
    let multiplier = random_percent / 100.0;

    let randomized = (base_price * multiplier).round() as i64;
    randomized.min(max_price).max(min_price).max(1)
}

/// Full breakdown of a single price computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub hour_index: i64,
    pub seed: String,
    pub random: f64,
    pub price: i64,
}

pub fn quote_price<Tz: TimeZone>(
    user_id: &str,
    item_id: &str,
    instant: &DateTime<Tz>,
    base_price: f64,
    band: &PriceBand,
) -> PriceQuote {
    let hour = hour_index(instant);
    let digest = hourly_digest(user_id, item_id, hour);
    let random = seed_word(&digest) as f64 / u32::MAX as f64;

    PriceQuote {
        hour_index: hour,
        seed: hex::encode(&digest[..4]),
        random,
        price: price_from_random(random, base_price, band),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_conformance_vector() {
        let band = PriceBand::default();
        assert_eq!(compute_price("u1", "item-a", 473800, 250.0, &band), 237);
        assert_eq!(compute_price("u1", "item-a", 473801, 250.0, &band), 265);
        assert_eq!(compute_price("user123", "item456", 0, 100.0, &band), 96);
    }

    #[test]
    fn test_compute_price_is_deterministic() {
        let band = PriceBand::default();
        let first = compute_price("alice", "sword", 10, 100.0, &band);
        for _ in 0..10 {
            assert_eq!(compute_price("alice", "sword", 10, 100.0, &band), first);
        }
    }

    #[test]
    fn test_user_id_whitespace_is_trimmed() {
        let band = PriceBand::default();
        assert_eq!(
            compute_price(" alice ", "sword", 10, 100.0, &band),
            compute_price("alice", "sword", 10, 100.0, &band)
        );
        assert_eq!(compute_price("alice", "sword", 10, 100.0, &band), 101);
    }

    #[test]
    fn test_negative_hour_index() {
        let band = PriceBand::default();
        assert_eq!(compute_price("u1", "item-a", -5, 250.0, &band), 251);
    }

    #[test]
    fn test_price_stays_within_band() {
        let band = PriceBand::default();
        for base in [1.0, 3.5, 99.0, 250.0, 10_000.0] {
            let (min_price, max_price) = band.price_bounds(base);
            for hour in 473_000..473_200 {
                let price = compute_price("bob", "hat", hour, base, &band);
                assert!(price >= min_price.max(1), "{} below band for base {}", price, base);
                assert!(price <= max_price.max(1), "{} above band for base {}", price, base);
            }
        }
    }

    #[test]
    fn test_degenerate_band_is_coerced() {
        let band = PriceBand::new(0, 0);
        assert_eq!(band.safe_bounds(), (1, 2));
        assert_eq!(band.price_bounds(1000.0), (10, 20));
        assert_eq!(compute_price("alice", "sword", 10, 1000.0, &band), 16);
    }

    #[test]
    fn test_inverted_band_is_coerced() {
        let band = PriceBand::new(120, 80);
        assert_eq!(band.safe_bounds(), (120, 121));
    }

    #[test]
    fn test_extreme_band_saturates() {
        let band = PriceBand::new(i64::MAX, 0);
        assert_eq!(band.safe_bounds(), (i64::MAX, i64::MAX));

        let price = compute_price("alice", "sword", 10, 100.0, &band);
        assert!(price >= 1);
    }

    #[test]
    fn test_price_is_at_least_one() {
        let band = PriceBand::new(0, 0);
        assert_eq!(compute_price("alice", "sword", 10, 1.0, &band), 1);
    }

    #[test]
    fn test_hourly_random_in_unit_interval() {
        for hour in 0..500 {
            let r = hourly_random("carol", "boots", hour);
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn test_hour_index_floors() {
        let at = Utc.timestamp_millis_opt(3_600_000 * 473_800 + 59 * 60 * 1000).unwrap();
        assert_eq!(hour_index(&at), 473_800);

        let before_epoch = Utc.timestamp_millis_opt(-1).unwrap();
        assert_eq!(hour_index(&before_epoch), -1);
        assert_eq!(hour_start_millis(473_800), 3_600_000 * 473_800);
    }

    #[test]
    fn test_hour_index_ignores_offset() {
        let utc = Utc.with_ymd_and_hms(2025, 9, 10, 4, 0, 0).unwrap();
        let edt = FixedOffset::west_opt(4 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 9, 10, 0, 0, 0)
            .unwrap();
        assert_eq!(hour_index(&utc), hour_index(&edt));
    }

    #[test]
    fn test_quote_matches_compute_price() {
        let band = PriceBand::default();
        let at = Utc.timestamp_millis_opt(3_600_000 * 473_800 + 1234).unwrap();
        let quote = quote_price("u1", "item-a", &at, 250.0, &band);

        assert_eq!(quote.hour_index, 473_800);
        assert_eq!(quote.seed, "3af09407");
        assert_eq!(quote.price, 237);
        assert!((quote.random - 0.230_233_432_545_846_66).abs() < 1e-12);
    }
}

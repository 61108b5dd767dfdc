use crate::models::PriceCandidate;
use crate::services::pricing::{PriceBand, compute_price, hour_index};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use log::debug;

/// Walk the window `[now, closes_at)` in fixed one-hour steps starting at the
/// exact `now` instant, pricing each step by its hour bucket.
pub fn scan_window<F>(now: DateTime<Utc>, closes_at: &DateTime<FixedOffset>, price_at: F) -> Vec<PriceCandidate>
where
    F: Fn(i64) -> i64,
{
    let mut candidates = Vec::new();
    let mut cursor = now;

    while cursor < *closes_at {
        let price = price_at(hour_index(&cursor));
        candidates.push(PriceCandidate {
            timestamp: cursor,
            price,
        });
        cursor += Duration::hours(1);
    }

    candidates
}

/// Sort cheapest first, earlier slot first on equal price, and keep `top_k`.
pub fn rank_candidates(mut candidates: Vec<PriceCandidate>, top_k: usize) -> Vec<PriceCandidate> {
    candidates.sort_by(|a, b| {
        a.price
            .cmp(&b.price)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    candidates.truncate(top_k);
    candidates
}

/// Best-time search driven by an arbitrary per-hour pricing function.
pub fn find_best_times_with<F>(
    now: DateTime<Utc>,
    closes_at: &DateTime<FixedOffset>,
    top_k: usize,
    price_at: F,
) -> Vec<PriceCandidate>
where
    F: Fn(i64) -> i64,
{
    let candidates = scan_window(now, closes_at, price_at);
    let scanned = candidates.len();
    let ranked = rank_candidates(candidates, top_k);

    debug!(
        "Scanned {} hourly slots until {}, returning {}",
        scanned,
        closes_at,
        ranked.len()
    );
    ranked
}

/// The `top_k` cheapest upcoming slots for a user and item before the shop closes.
pub fn find_best_times(
    user_id: &str,
    item_id: &str,
    now: DateTime<Utc>,
    closes_at: &DateTime<FixedOffset>,
    base_price: f64,
    band: &PriceBand,
    top_k: usize,
) -> Vec<PriceCandidate> {
    find_best_times_with(now, closes_at, top_k, |hour| {
        compute_price(user_id, item_id, hour, base_price, band)
    })
}

/// Every slot of the window in chronological order.
pub fn price_timeline(
    user_id: &str,
    item_id: &str,
    now: DateTime<Utc>,
    closes_at: &DateTime<FixedOffset>,
    base_price: f64,
    band: &PriceBand,
) -> Vec<PriceCandidate> {
    scan_window(now, closes_at, |hour| {
        compute_price(user_id, item_id, hour, base_price, band)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour_aligned_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(3_600_000 * 1_000).unwrap()
    }

    fn closes_after(now: DateTime<Utc>, hours: i64) -> DateTime<FixedOffset> {
        (now + Duration::hours(hours)).with_timezone(&FixedOffset::west_opt(4 * 3600).unwrap())
    }

    #[test]
    fn test_ranking_breaks_ties_by_earlier_hour() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, 4);
        let base = hour_index(&now);
        let prices = [5, 3, 3, 9];

        let result = find_best_times_with(now, &closes_at, 2, |hour| prices[(hour - base) as usize]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].timestamp, now + Duration::hours(1));
        assert_eq!(result[0].price, 3);
        assert_eq!(result[1].timestamp, now + Duration::hours(2));
        assert_eq!(result[1].price, 3);
    }

    #[test]
    fn test_window_exhausted_returns_empty() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, 0);

        let result = find_best_times("alice", "sword", now, &closes_at, 250.0, &PriceBand::default(), 10);

        assert!(result.is_empty());
    }

    #[test]
    fn test_now_past_closing_returns_empty() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, -3);

        assert!(scan_window(now, &closes_at, |_| 1).is_empty());
    }

    #[test]
    fn test_top_k_clamped_to_window() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, 3);

        let result = find_best_times("alice", "sword", now, &closes_at, 250.0, &PriceBand::default(), 10);

        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_zero_top_k_is_empty() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, 5);

        assert!(find_best_times_with(now, &closes_at, 0, |_| 1).is_empty());
    }

    #[test]
    fn test_scan_starts_at_exact_now() {
        let now = hour_aligned_now() + Duration::minutes(45);
        let closes_at = closes_after(hour_aligned_now(), 3);

        let slots = scan_window(now, &closes_at, |hour| hour);

        // 00:45, 01:45, 02:45 fit before 03:00
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].timestamp, now);
        assert_eq!(slots[2].timestamp, now + Duration::hours(2));
        assert_eq!(slots[0].price, hour_index(&hour_aligned_now()));
    }

    #[test]
    fn test_partial_final_hour_is_included() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, 2) + Duration::minutes(1);

        assert_eq!(scan_window(now, &closes_at, |_| 1).len(), 3);
    }

    #[test]
    fn test_results_sorted_by_price_then_time() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, 48);

        let result = find_best_times("alice", "sword", now, &closes_at, 250.0, &PriceBand::default(), 48);

        assert_eq!(result.len(), 48);
        for pair in result.windows(2) {
            assert!(
                pair[0].price < pair[1].price
                    || (pair[0].price == pair[1].price && pair[0].timestamp < pair[1].timestamp)
            );
        }
    }

    #[test]
    fn test_best_times_match_compute_price() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, 24);
        let band = PriceBand::default();

        for candidate in find_best_times("u1", "item-a", now, &closes_at, 250.0, &band, 5) {
            let expected = compute_price("u1", "item-a", hour_index(&candidate.timestamp), 250.0, &band);
            assert_eq!(candidate.price, expected);
        }
    }

    #[test]
    fn test_timeline_is_chronological() {
        let now = hour_aligned_now();
        let closes_at = closes_after(now, 6);

        let timeline = price_timeline("u1", "item-a", now, &closes_at, 250.0, &PriceBand::default());

        assert_eq!(timeline.len(), 6);
        for pair in timeline.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
    }
}

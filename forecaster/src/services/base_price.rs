use crate::services::pricing::{PriceBand, compute_price};

/// Largest observed price accepted for recovery. The scan hashes one key per
/// candidate base, so the work grows linearly with the observation.
pub const MAX_OBSERVED_PRICE: i64 = 1_000_000;

/// Inclusive range of bases whose rounded price can equal `observed`.
fn reachable_bases(observed: i64, band: &PriceBand) -> (i64, i64) {
    let (safe_min, safe_max) = band.safe_bounds();
    let observed = observed as f64;

    // round(base * percent / 100) == observed needs base * percent / 100 within half a unit
    let lowest = ((observed - 0.5) * 100.0 / safe_max as f64).floor() as i64;
    let highest = ((observed + 0.5) * 100.0 / safe_min as f64).ceil() as i64;
    (lowest, highest)
}

/// Recover the base price behind a price observed during `hour_index`.
///
/// Brute-forces integer bases from 70% to 130% of the observed price and
/// returns the first one that reproduces it. Several bases can map to the
/// same observed price, so the result is the smallest candidate, not
/// necessarily the one the shop used. Observations above
/// [`MAX_OBSERVED_PRICE`] are not searched.
pub fn recover_base_price(
    user_id: &str,
    item_id: &str,
    observed_price: i64,
    hour_index: i64,
    band: &PriceBand,
) -> Option<i64> {
    if !(1..=MAX_OBSERVED_PRICE).contains(&observed_price) {
        return None;
    }

    let observed = observed_price as f64;
    let (reachable_low, reachable_high) = reachable_bases(observed_price, band);
    let lowest = ((observed * 0.7).round() as i64).max(reachable_low).max(1);
    let highest = ((observed * 1.3).floor() as i64).min(reachable_high);

    (lowest..=highest)
        .find(|base| compute_price(user_id, item_id, hour_index, *base as f64, band) == observed_price)
}

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a percentage to two decimals, halves away from zero.
///
/// Works on the shortest decimal rendering of `value`, so `88.555` rounds to
/// `88.56` even though its binary form sits just below the midpoint.
#[must_use]
pub fn round_percent(value: f64) -> f64 {
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| {
            let scaled = value * 100.0;
            if scaled.is_finite() {
                scaled.round() / 100.0
            } else {
                value
            }
        })
}

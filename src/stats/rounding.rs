use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `dp` decimal places, half away from zero, on the exact binary
/// value of `value` (same result as fixed-point display formatting).
pub fn round_decimal(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

/// `round_decimal` back to f64; non-representable values pass through
pub fn round_to(value: f64, dp: u32) -> f64 {
    round_decimal(value, dp)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

// =============================================================================
// Decimal helpers — the single place where rounding happens
// =============================================================================
//
// Every division in the engine goes through `div`, which rounds half away from
// zero to `SCALE` fractional digits. A zero divisor yields zero rather than a
// panic so that degenerate windows map to the neutral sentinel.
// =============================================================================

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, MathematicalOps};

/// Fractional digits kept by every intermediate division.
pub const SCALE: u32 = 8;

/// Round `value` half away from zero to `dp` fractional digits.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round8(value: Decimal) -> Decimal {
    round_to(value, SCALE)
}

pub fn round2(value: Decimal) -> Decimal {
    round_to(value, 2)
}

/// `numerator / denominator`, rounded to 8 digits; zero when the divisor is zero.
pub fn div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .map(round8)
        .unwrap_or(Decimal::ZERO)
}

/// Arithmetic mean with the rounding rule of [`div`]; zero for an empty slice.
pub fn mean(values: &[Decimal]) -> Decimal {
    div(values.iter().copied().sum(), count(values.len()))
}

/// Square root rounded to 8 digits; zero for negative input.
pub fn sqrt(value: Decimal) -> Decimal {
    value.sqrt().map(round8).unwrap_or(Decimal::ZERO)
}

/// A bar/period count as a `Decimal`.
pub fn count(n: usize) -> Decimal {
    Decimal::from(n as u64)
}

/// Midpoint of the highest and lowest value.
pub fn midpoint(high: Decimal, low: Decimal) -> Decimal {
    div(high + low, Decimal::from(2))
}

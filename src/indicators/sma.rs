// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean of the most recent `period` closes, rounded half-up to
// 8 fractional digits.
// =============================================================================

use rust_decimal::Decimal;

use super::decimal::mean;

/// SMA of the last `period` values.
///
/// Returns zero when `period` is zero or fewer than `period` values exist.
pub fn calculate_sma(closes: &[Decimal], period: usize) -> Decimal {
    if period == 0 || closes.len() < period {
        return Decimal::ZERO;
    }
    mean(&closes[closes.len() - period..])
}

// =============================================================================
// Average True Range (ATR)
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar after the first:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// Two averaging modes are supported:
//   sma        : mean of the first `period` TR values
//   wilder-ema : EMA recurrence over the full TR sequence
//
// Both need `period + 1` bars (`period` TR values); otherwise ATR is zero.
// =============================================================================

use rust_decimal::Decimal;

use super::decimal::mean;
use super::ema::ema_from_values;
use crate::market_data::PricePoint;
use crate::types::AtrMode;

/// True range of `bar` given the previous close.
pub fn true_range(bar: &PricePoint, prev_close: Decimal) -> Decimal {
    let hl = bar.high - bar.low;
    let hc = (bar.high - prev_close).abs();
    let lc = (bar.low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// True range for every consecutive pair of bars (length `bars.len() - 1`).
pub fn true_ranges(bars: &[PricePoint]) -> Vec<Decimal> {
    bars.windows(2)
        .map(|w| true_range(&w[1], w[0].close))
        .collect()
}

/// ATR of `bars` (oldest first) under the chosen averaging mode.
pub fn calculate_atr(bars: &[PricePoint], period: usize, mode: AtrMode) -> Decimal {
    if period == 0 || bars.len() < period + 1 {
        return Decimal::ZERO;
    }
    let trs = true_ranges(bars);
    match mode {
        AtrMode::Sma => mean(&trs[..period]),
        AtrMode::WilderEma => ema_from_values(&trs, period),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interval;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    /// Build a test bar with the given OHLC values.
    fn bar(i: i64, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> PricePoint {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i);
        PricePoint::new(ts, open, high, low, close, dec!(100), Interval::OneHour)
    }

    #[test]
    fn atr_period_zero() {
        let bars: Vec<_> = (0..20)
            .map(|i| bar(i, dec!(100), dec!(105), dec!(95), dec!(102)))
            .collect();
        assert_eq!(calculate_atr(&bars, 0, AtrMode::Sma), Decimal::ZERO);
    }

    #[test]
    fn atr_insufficient_data() {
        // Need period + 1 = 15 bars for period=14, only have 14.
        let bars: Vec<_> = (0..14)
            .map(|i| bar(i, dec!(100), dec!(105), dec!(95), dec!(102)))
            .collect();
        assert_eq!(calculate_atr(&bars, 14, AtrMode::Sma), Decimal::ZERO);
        assert_eq!(calculate_atr(&bars, 14, AtrMode::WilderEma), Decimal::ZERO);
    }

    #[test]
    fn atr_constant_range() {
        // Every bar spans 10 around an unchanged close.
        let bars: Vec<_> = (0..30)
            .map(|i| bar(i, dec!(100), dec!(105), dec!(95), dec!(100)))
            .collect();
        assert_eq!(calculate_atr(&bars, 14, AtrMode::Sma), dec!(10));
        assert_eq!(calculate_atr(&bars, 14, AtrMode::WilderEma), dec!(10));
    }

    #[test]
    fn sma_mode_uses_the_first_window() {
        // First three TRs are 4, later ones widen; sma mode ignores the widening.
        let mut bars: Vec<_> = (0..4)
            .map(|i| bar(i, dec!(100), dec!(102), dec!(98), dec!(100)))
            .collect();
        bars.extend((4..10).map(|i| bar(i, dec!(100), dec!(120), dec!(80), dec!(100))));
        assert_eq!(calculate_atr(&bars, 3, AtrMode::Sma), dec!(4));
        assert!(calculate_atr(&bars, 3, AtrMode::WilderEma) > dec!(30));
    }

    #[test]
    fn true_range_uses_prev_close() {
        // Gap scenario: |H - prevClose| > H - L
        let bars = vec![
            bar(0, dec!(100), dec!(105), dec!(95), dec!(95)),
            bar(1, dec!(110), dec!(115), dec!(108), dec!(112)),
        ];
        assert_eq!(true_ranges(&bars), vec![dec!(20)]);
    }
}

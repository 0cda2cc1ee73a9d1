// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Seed running sums with the first `period` values, then apply Wilder's
//      smoothing:  smoothed = smoothed - smoothed / period + new
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100     (zero when TR sum is zero)
//   6. ADX = mean of the last `period` DX values, rounded to 2 digits.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use rust_decimal::Decimal;

use super::atr::true_range;
use super::decimal::{count, div, mean, round2};
use crate::market_data::PricePoint;

/// ADX of `bars` (oldest first). Zero when fewer than `2 * period` bars exist.
pub fn calculate_adx(bars: &[PricePoint], period: usize) -> Decimal {
    if period == 0 || bars.len() < 2 * period {
        return Decimal::ZERO;
    }

    // ------------------------------------------------------------------
    // Step 1 & 2: Raw +DM, -DM, and True Range for each consecutive pair
    // ------------------------------------------------------------------
    let transitions = bars.len() - 1;
    let mut plus_dm = Vec::with_capacity(transitions);
    let mut minus_dm = Vec::with_capacity(transitions);
    let mut tr_vals = Vec::with_capacity(transitions);

    for w in bars.windows(2) {
        let (prev, bar) = (&w[0], &w[1]);
        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;

        plus_dm.push(if up_move > down_move && up_move > Decimal::ZERO {
            up_move
        } else {
            Decimal::ZERO
        });
        minus_dm.push(if down_move > up_move && down_move > Decimal::ZERO {
            down_move
        } else {
            Decimal::ZERO
        });
        tr_vals.push(true_range(bar, prev.close));
    }

    // ------------------------------------------------------------------
    // Step 3: Wilder's smoothing of +DM, -DM, TR
    // ------------------------------------------------------------------
    let n = count(period);
    let mut smooth_plus_dm: Decimal = plus_dm[..period].iter().copied().sum();
    let mut smooth_minus_dm: Decimal = minus_dm[..period].iter().copied().sum();
    let mut smooth_tr: Decimal = tr_vals[..period].iter().copied().sum();

    let mut dx_values = Vec::with_capacity(transitions - period + 1);
    dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr));

    for i in period..transitions {
        smooth_plus_dm = smooth_plus_dm - div(smooth_plus_dm, n) + plus_dm[i];
        smooth_minus_dm = smooth_minus_dm - div(smooth_minus_dm, n) + minus_dm[i];
        smooth_tr = smooth_tr - div(smooth_tr, n) + tr_vals[i];
        dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr));
    }

    // ------------------------------------------------------------------
    // Step 6: ADX = mean of the most recent `period` DX values
    // ------------------------------------------------------------------
    let recent = &dx_values[dx_values.len().saturating_sub(period)..];
    round2(mean(recent))
}

// =============================================================================
// Internal helpers
// =============================================================================

/// DX from smoothed +DM, -DM, and TR values; zero without any range or
/// directional movement.
fn compute_dx(smooth_plus_dm: Decimal, smooth_minus_dm: Decimal, smooth_tr: Decimal) -> Decimal {
    if smooth_tr.is_zero() {
        return Decimal::ZERO;
    }
    let hundred = Decimal::ONE_HUNDRED;
    let plus_di = div(smooth_plus_dm, smooth_tr) * hundred;
    let minus_di = div(smooth_minus_dm, smooth_tr) * hundred;
    div((plus_di - minus_di).abs(), plus_di + minus_di) * hundred
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interval;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    /// Build a simple bar for testing. Volume is irrelevant for ADX.
    fn bar(i: i64, high: Decimal, low: Decimal, close: Decimal) -> PricePoint {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i);
        PricePoint::new(ts, close, high, low, close, dec!(1), Interval::OneHour)
    }

    #[test]
    fn adx_period_zero() {
        let bars: Vec<_> = (0..50).map(|i| bar(i, dec!(2), dec!(0.5), dec!(1.5))).collect();
        assert_eq!(calculate_adx(&bars, 0), Decimal::ZERO);
    }

    #[test]
    fn adx_insufficient_data() {
        let bars: Vec<_> = (0..27).map(|i| bar(i, dec!(2), dec!(0.5), dec!(1.5))).collect();
        assert_eq!(calculate_adx(&bars, 14), Decimal::ZERO);
    }

    #[test]
    fn adx_strong_uptrend() {
        // Consecutive higher highs and higher lows: a strong trend.
        let bars: Vec<_> = (0..60)
            .map(|i| {
                let base = Decimal::from(100 + i * 2);
                bar(i, base + dec!(1.5), base - dec!(0.5), base + dec!(1))
            })
            .collect();
        let adx = calculate_adx(&bars, 14);
        assert!(adx > dec!(25), "expected ADX > 25 for strong trend, got {adx}");
        assert_eq!(adx, adx.round_dp(2));
    }

    #[test]
    fn adx_flat_market() {
        // Identical bars, no directional movement.
        let bars: Vec<_> = (0..60).map(|i| bar(i, dec!(101), dec!(99), dec!(100))).collect();
        assert_eq!(calculate_adx(&bars, 14), Decimal::ZERO);
    }

    #[test]
    fn adx_zero_range_is_zero() {
        let bars: Vec<_> = (0..30).map(|i| bar(i, dec!(100), dec!(100), dec!(100))).collect();
        assert_eq!(calculate_adx(&bars, 14), Decimal::ZERO);
    }

    #[test]
    fn adx_minimum_bars_exact() {
        let period = 5;
        let bars: Vec<_> = (0..2 * period as i64)
            .map(|i| {
                let base = Decimal::from(100 + i);
                bar(i, base + dec!(1), base - dec!(0.5), base + dec!(0.5))
            })
            .collect();
        assert!(calculate_adx(&bars, period) > Decimal::ZERO);
        assert_eq!(calculate_adx(&bars[..bars.len() - 1], period), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn adx_result_range(moves in prop::collection::vec((0u32..500, 0u32..500, 0u32..1000), 28..90)) {
            let bars: Vec<_> = moves
                .iter()
                .enumerate()
                .map(|(i, (up, down, close))| {
                    let base = dec!(100) + Decimal::new(*close as i64, 1);
                    bar(i as i64, base + Decimal::new(*up as i64, 2), base - Decimal::new(*down as i64, 2), base)
                })
                .collect();
            let adx = calculate_adx(&bars, 14);
            prop_assert!(adx >= Decimal::ZERO && adx <= dec!(100));
        }
    }
}

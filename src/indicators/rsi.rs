// =============================================================================
// Relative Strength Index (RSI)
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the mean of the first
//          `period` gains / losses (a zero delta counts as a zero loss).
// Step 3 — For every later delta:
//            avg_gain = (avg_gain * (period - 1) + gain) / period
//            avg_loss = (avg_loss * (period - 1) + loss) / period
//          Each division rounds to 8 digits, so the averages carry that
//          rounding forward from bar to bar.
// Step 4 — Both averages zero => 0, only avg_loss zero => 100, otherwise
//            RS  = avg_gain / avg_loss
//            RSI = 100 - 100 / (1 + RS)          rounded to 2 digits
//
// Thresholds (configurable): RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

use rust_decimal::Decimal;

use super::decimal::{count, div, round2};

/// RSI of the full close series. Zero when fewer than `period + 1` closes.
pub fn calculate_rsi(closes: &[Decimal], period: usize) -> Decimal {
    rsi_series(closes, period)
        .last()
        .copied()
        .unwrap_or(Decimal::ZERO)
}

/// RSI for every prefix of `closes` long enough to produce one.
///
/// Element `i` equals `calculate_rsi(&closes[..period + 1 + i], period)`:
/// the recurrence only looks backwards, so each prefix result is the running
/// state after its last delta.
pub fn rsi_series(closes: &[Decimal], period: usize) -> Vec<Decimal> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let split = |delta: Decimal| {
        if delta > Decimal::ZERO {
            (delta, Decimal::ZERO)
        } else {
            (Decimal::ZERO, delta.abs())
        }
    };

    // --- Seed averages with the mean of the first `period` deltas ----------
    let (sum_gain, sum_loss) = closes[..=period]
        .windows(2)
        .map(|w| split(w[1] - w[0]))
        .fold((Decimal::ZERO, Decimal::ZERO), |(g, l), (gain, loss)| (g + gain, l + loss));

    let n = count(period);
    let keep = count(period - 1);
    let mut avg_gain = div(sum_gain, n);
    let mut avg_loss = div(sum_loss, n);

    let mut result = Vec::with_capacity(closes.len() - period);
    result.push(rsi_from_averages(avg_gain, avg_loss));

    // --- Incremental update for subsequent deltas --------------------------
    for w in closes[period..].windows(2) {
        let (gain, loss) = split(w[1] - w[0]);
        avg_gain = div(avg_gain * keep + gain, n);
        avg_loss = div(avg_loss * keep + loss, n);
        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Human-readable zone for an RSI value under the given thresholds.
pub fn rsi_zone(value: Decimal, oversold: Decimal, overbought: Decimal) -> &'static str {
    if value >= overbought {
        "OVERBOUGHT"
    } else if value <= oversold {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn rsi_from_averages(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
    let hundred = Decimal::ONE_HUNDRED;
    if avg_gain.is_zero() && avg_loss.is_zero() {
        return Decimal::ZERO;
    }
    if avg_loss.is_zero() {
        return hundred;
    }
    let rs = div(avg_gain, avg_loss);
    round2(hundred - div(hundred, Decimal::ONE + rs))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn dec_closes(values: &[f64]) -> Vec<Decimal> {
        values
            .iter()
            .map(|v| Decimal::try_from(*v).unwrap().round_dp(2))
            .collect()
    }

    #[test]
    fn rsi_empty_input() {
        assert_eq!(calculate_rsi(&[], 14), Decimal::ZERO);
        assert!(rsi_series(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert_eq!(calculate_rsi(&[dec!(1), dec!(2), dec!(3)], 0), Decimal::ZERO);
    }

    #[test]
    fn rsi_insufficient_data() {
        // Need period+1 closes (period deltas). 14 closes => 13 deltas < 14.
        let closes: Vec<Decimal> = (1..=14).map(Decimal::from).collect();
        assert_eq!(calculate_rsi(&closes, 14), Decimal::ZERO);
    }

    #[test]
    fn rsi_short_series_is_zero() {
        let closes: Vec<Decimal> = (1..=5).map(Decimal::from).collect();
        assert_eq!(calculate_rsi(&closes, 14), Decimal::ZERO);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        // 40000 + 100*i for i in 0..30
        let closes: Vec<Decimal> = (0..30).map(|i| Decimal::from(40_000 + 100 * i)).collect();
        assert_eq!(calculate_rsi(&closes, 14), dec!(100));
        assert!(rsi_series(&closes, 14).iter().all(|v| *v == dec!(100)));
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<Decimal> = (1..=30).rev().map(Decimal::from).collect();
        assert_eq!(calculate_rsi(&closes, 14), Decimal::ZERO);
    }

    #[test]
    fn rsi_flat_market_is_zero() {
        let closes = vec![dec!(100); 30];
        assert_eq!(calculate_rsi(&closes, 14), Decimal::ZERO);
    }

    #[test]
    fn rsi_has_two_fraction_digits() {
        let closes = dec_closes(&[
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ]);
        let rsi = calculate_rsi(&closes, 14);
        assert!(rsi > Decimal::ZERO && rsi < dec!(100));
        assert_eq!(rsi, rsi.round_dp(2));
    }

    #[test]
    fn series_matches_prefix_computation() {
        let closes = dec_closes(&[
            10.0, 11.0, 10.5, 10.7, 10.2, 10.9, 11.4, 11.1, 10.8, 11.6, 11.9, 11.3,
        ]);
        let series = rsi_series(&closes, 5);
        assert_eq!(series.len(), closes.len() - 5);
        for (i, value) in series.iter().enumerate() {
            assert_eq!(*value, calculate_rsi(&closes[..5 + 1 + i], 5));
        }
    }

    #[test]
    fn zone_boundaries_are_inclusive() {
        assert_eq!(rsi_zone(dec!(30), dec!(30), dec!(70)), "OVERSOLD");
        assert_eq!(rsi_zone(dec!(70), dec!(30), dec!(70)), "OVERBOUGHT");
        assert_eq!(rsi_zone(dec!(50), dec!(30), dec!(70)), "NEUTRAL");
    }

    proptest! {
        #[test]
        fn rsi_stays_within_bounds(raw in prop::collection::vec(1u32..1_000_000, 15..80)) {
            let closes: Vec<Decimal> = raw.iter().map(|v| Decimal::new(*v as i64, 2)).collect();
            let rsi = calculate_rsi(&closes, 14);
            prop_assert!(rsi >= Decimal::ZERO && rsi <= dec!(100));
        }
    }
}

// =============================================================================
// Stochastic RSI
// =============================================================================
//
// RSI normalised against its own recent range:
//
//   StochRSI = (RSI_last - min(RSI)) / (max(RSI) - min(RSI))
//
// over the RSI values of every prefix ending at one of the last `period`
// bars. A flat RSI window yields 0. Needs `2 * period` bars.
// =============================================================================

use rust_decimal::Decimal;

use super::decimal::div;
use super::rsi::rsi_series;

/// Stochastic RSI in `[0, 1]`; zero when fewer than `2 * period` closes exist.
pub fn calculate_stoch_rsi(closes: &[Decimal], period: usize) -> Decimal {
    if period == 0 || closes.len() < 2 * period {
        return Decimal::ZERO;
    }

    let series = rsi_series(closes, period);
    let window = &series[series.len().saturating_sub(period)..];
    let (Some(&last), Some(&min), Some(&max)) = (
        window.last(),
        window.iter().min(),
        window.iter().max(),
    ) else {
        return Decimal::ZERO;
    };

    if max == min {
        return Decimal::ZERO;
    }
    div(last - min, max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn insufficient_data_is_zero() {
        let closes: Vec<Decimal> = (1..=27).map(Decimal::from).collect();
        assert_eq!(calculate_stoch_rsi(&closes, 14), Decimal::ZERO);
    }

    #[test]
    fn constant_rsi_window_is_zero() {
        // Monotonic rise keeps RSI pinned at 100.
        let closes: Vec<Decimal> = (1..=40).map(Decimal::from).collect();
        assert_eq!(calculate_stoch_rsi(&closes, 14), Decimal::ZERO);
    }

    #[test]
    fn new_high_after_a_dip_reads_one() {
        let mut closes: Vec<Decimal> = (0..20).map(|i| dec!(100) - Decimal::from(i)).collect();
        closes.extend((0..10).map(|i| dec!(81) + Decimal::from(i * 3)));
        assert_eq!(calculate_stoch_rsi(&closes, 14), dec!(1));
    }

    proptest! {
        #[test]
        fn stays_in_unit_range(raw in prop::collection::vec(1u32..1_000_000, 0..90)) {
            let closes: Vec<Decimal> = raw.iter().map(|v| Decimal::new(*v as i64, 2)).collect();
            let value = calculate_stoch_rsi(&closes, 14);
            prop_assert!(value >= Decimal::ZERO && value <= Decimal::ONE);
        }
    }
}

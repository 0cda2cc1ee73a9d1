// =============================================================================
// MACD (Moving Average Convergence Divergence)
// =============================================================================
//
// Both EMAs run over the whole close series in a single pass, each seeded by
// the SMA of its own first `period` closes. Once the slower one is active the
// line value fast - slow is recorded for every bar.
//
//   line      = EMA_fast - EMA_slow                  (latest bar)
//   signal    = EMA(line series, signal_period)
//   histogram = line - signal
//
// While the line series is shorter than `signal_period` the signal EMA is
// not ready and reads 0, so the histogram equals the line. All three outputs
// are rounded to 8 digits and the histogram is taken from the rounded line
// and signal, so `histogram == line - signal` holds exactly.
// =============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::round8;
use super::ema::{ema_from_values, RunningEma};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdResult {
    pub line: Decimal,
    pub signal: Decimal,
    pub histogram: Decimal,
}

impl MacdResult {
    pub fn is_zero(&self) -> bool {
        self.line.is_zero() && self.signal.is_zero() && self.histogram.is_zero()
    }
}

/// MACD of the close series. All-zero when fewer than `slow` closes exist.
pub fn calculate_macd(closes: &[Decimal], fast: usize, slow: usize, signal: usize) -> MacdResult {
    if fast == 0 || slow == 0 || signal == 0 || closes.len() < slow.max(fast) {
        return MacdResult::default();
    }

    let mut fast_ema = RunningEma::new(fast);
    let mut slow_ema = RunningEma::new(slow);
    let mut lines = Vec::with_capacity(closes.len() + 1 - slow.max(fast));
    for &close in closes {
        let f = fast_ema.push(close);
        let s = slow_ema.push(close);
        if let (Some(f), Some(s)) = (f, s) {
            lines.push(f - s);
        }
    }

    let Some(&last) = lines.last() else {
        return MacdResult::default();
    };

    let line = round8(last);
    let signal_line = ema_from_values(&lines, signal);

    MacdResult {
        line,
        signal: signal_line,
        histogram: line - signal_line,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::ema::calculate_ema;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn macd_insufficient_data_is_all_zero() {
        let closes: Vec<Decimal> = (1..=5).map(Decimal::from).collect();
        let macd = calculate_macd(&closes, 12, 26, 9);
        assert!(macd.is_zero());
        assert_eq!(macd, MacdResult::default());
    }

    #[test]
    fn macd_line_equals_difference_of_emas() {
        let closes: Vec<Decimal> = (0..60).map(|i| Decimal::from(100 + (i * 7) % 13)).collect();
        let macd = calculate_macd(&closes, 12, 26, 9);
        let expected = calculate_ema(&closes, 12) - calculate_ema(&closes, 26);
        // Each EMA is rounded separately, so allow for one unit in the last place.
        assert!((macd.line - expected).abs() <= dec!(0.00000001));
    }

    #[test]
    fn macd_rising_series_is_positive() {
        let closes: Vec<Decimal> = (0..80).map(|i| Decimal::from(1_000 + i * i)).collect();
        let macd = calculate_macd(&closes, 12, 26, 9);
        assert!(macd.line > Decimal::ZERO);
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let closes = vec![dec!(250); 40];
        assert!(calculate_macd(&closes, 12, 26, 9).is_zero());
    }

    #[test]
    fn short_line_series_has_no_signal_yet() {
        // 28 closes => 3 line values, fewer than the 9-period signal.
        let closes: Vec<Decimal> = (50..78).map(Decimal::from).collect();
        let macd = calculate_macd(&closes, 12, 26, 9);
        assert!(!macd.line.is_zero());
        assert_eq!(macd.signal, Decimal::ZERO);
        assert_eq!(macd.histogram, macd.line);
    }

    #[test]
    fn signal_appears_once_enough_line_values_exist() {
        // 34 closes => 9 line values.
        let closes: Vec<Decimal> = (50..84).map(Decimal::from).collect();
        let macd = calculate_macd(&closes, 12, 26, 9);
        assert!(!macd.signal.is_zero());
        assert_eq!(macd.histogram, macd.line - macd.signal);
    }

    proptest! {
        #[test]
        fn histogram_is_line_minus_signal(raw in prop::collection::vec(1u32..10_000_000, 0..120)) {
            let closes: Vec<Decimal> = raw.iter().map(|v| Decimal::new(*v as i64, 3)).collect();
            let macd = calculate_macd(&closes, 12, 26, 9);
            prop_assert_eq!(macd.histogram, macd.line - macd.signal);
        }
    }
}

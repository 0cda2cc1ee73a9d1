// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)            (rounded to 8 digits)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period`
// values. The running value is kept at full precision and rounded to
// 8 digits only when reported.
// =============================================================================

use rust_decimal::Decimal;

use super::decimal::{count, div, round8};

/// Incremental EMA that seeds itself with the SMA of its first `period` inputs.
#[derive(Debug, Clone)]
pub struct RunningEma {
    period: usize,
    multiplier: Decimal,
    seed_sum: Decimal,
    seen: usize,
    value: Option<Decimal>,
}

impl RunningEma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            multiplier: div(Decimal::from(2), count(period + 1)),
            seed_sum: Decimal::ZERO,
            seen: 0,
            value: None,
        }
    }

    /// Feed the next value; returns the EMA once `period` values were seen.
    pub fn push(&mut self, value: Decimal) -> Option<Decimal> {
        match self.value {
            Some(prev) => {
                let m = self.multiplier;
                self.value = Some(value * m + prev * (Decimal::ONE - m));
            }
            None if self.period > 0 => {
                self.seed_sum += value;
                self.seen += 1;
                if self.seen == self.period {
                    self.value = Some(div(self.seed_sum, count(self.period)));
                }
            }
            None => {}
        }
        self.value
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }
}

/// Unrounded EMA series; element `i` belongs to input index `i + period - 1`.
///
/// Empty when `period` is zero or the input is shorter than `period`.
pub fn ema_series(values: &[Decimal], period: usize) -> Vec<Decimal> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let mut ema = RunningEma::new(period);
    values.iter().filter_map(|&v| ema.push(v)).collect()
}

/// EMA of an arbitrary decimal sequence, rounded to 8 digits.
///
/// Returns zero when the sequence is shorter than `period`.
pub fn ema_from_values(values: &[Decimal], period: usize) -> Decimal {
    ema_series(values, period)
        .last()
        .copied()
        .map(round8)
        .unwrap_or(Decimal::ZERO)
}

/// EMA of closing prices; identical recurrence to [`ema_from_values`].
pub fn calculate_ema(closes: &[Decimal], period: usize) -> Decimal {
    ema_from_values(closes, period)
}

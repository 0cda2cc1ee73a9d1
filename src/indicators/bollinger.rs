// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA or EMA), an upper band
// (middle + k*σ), and a lower band (middle - k*σ), where σ is the population
// standard deviation of the last `period` closes around the middle band.
//
// With an EMA center the EMA runs over the full close series; the deviation
// still uses only the trailing window.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::{mean, round8, sqrt};
use super::ema::calculate_ema;
use super::sma::calculate_sma;
use crate::types::BandCenter;

/// Result of a Bollinger Band calculation. All-zero when unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerBands {
    pub upper: Decimal,
    pub middle: Decimal,
    pub lower: Decimal,
}

impl BollingerBands {
    pub fn is_available(&self) -> bool {
        !self.middle.is_zero()
    }
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Returns all-zero bands when fewer than `period` closes exist.
pub fn calculate_bollinger(
    closes: &[Decimal],
    period: usize,
    k: Decimal,
    center: BandCenter,
) -> BollingerBands {
    if period == 0 || closes.len() < period {
        return BollingerBands::default();
    }

    let middle = match center {
        BandCenter::Sma => calculate_sma(closes, period),
        BandCenter::Ema => calculate_ema(closes, period),
    };

    let window = &closes[closes.len() - period..];
    let squared: Vec<Decimal> = window
        .iter()
        .map(|x| {
            let d = *x - middle;
            d * d
        })
        .collect();
    let std_dev = sqrt(mean(&squared));
    let offset = round8(k * std_dev);

    BollingerBands {
        upper: middle + offset,
        middle,
        lower: middle - offset,
    }
}

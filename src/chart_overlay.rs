// =============================================================================
// Chart Overlay — per-day indicator rows for plotting
// =============================================================================
//
// Collapses a series to one bar per UTC day and, for every day, evaluates the
// overlay indicators on all days up to and including it:
//
//   SMA20 / SMA50 / SMA200, SuperTrend(10, 3), VWAP, Bollinger(20, 2) on SMA
//
// Each value is zero until its window is filled.
// =============================================================================

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::indicators::IndicatorEngine;
use crate::market_data::PriceSeries;
use crate::runtime_config::AnalysisConfig;
use crate::types::BandCenter;

const SUPER_TREND_PERIOD: usize = 10;
const SUPER_TREND_MULTIPLIER: Decimal = dec!(3);
const BAND_PERIOD: usize = 20;
const BAND_K: Decimal = dec!(2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    pub timestamp: DateTime<Utc>,
    pub close: Decimal,
    pub sma20: Decimal,
    pub sma50: Decimal,
    pub sma200: Decimal,
    pub super_trend: Decimal,
    pub vwap: Decimal,
    pub bollinger_upper: Decimal,
    pub bollinger_lower: Decimal,
}

/// Overlay rows for `series` with an uncached engine.
pub fn build(series: &PriceSeries) -> Vec<ChartRow> {
    build_with(&IndicatorEngine::without_cache(AnalysisConfig::default()), series)
}

/// Overlay rows for `series`, evaluated through `engine`.
pub fn build_with(engine: &IndicatorEngine, series: &PriceSeries) -> Vec<ChartRow> {
    let daily = series.daily_closes();

    (1..=daily.len())
        .into_par_iter()
        .filter_map(|len| {
            let window = daily.prefix(len);
            let bar = window.last()?;
            let bands = engine.bollinger_with(&window, BAND_PERIOD, BAND_K, BandCenter::Sma);
            Some(ChartRow {
                timestamp: bar.timestamp,
                close: bar.close,
                sma20: engine.sma(&window, 20),
                sma50: engine.sma(&window, 50),
                sma200: engine.sma(&window, 200),
                super_trend: engine.super_trend_with(&window, SUPER_TREND_PERIOD, SUPER_TREND_MULTIPLIER),
                vwap: engine.vwap(&window),
                bollinger_upper: bands.upper,
                bollinger_lower: bands.lower,
            })
        })
        .collect()
}

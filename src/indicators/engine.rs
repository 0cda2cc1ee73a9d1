// =============================================================================
// Indicator Engine — configured, memoised access to every indicator
// =============================================================================
//
// The engine is stateless apart from the optional shared cache. Every method
// is total: insufficient data yields the indicator's zero sentinel. A
// snapshot computes the independent indicator groups in parallel.
// =============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::adx::calculate_adx;
use super::atr::calculate_atr;
use super::bollinger::{calculate_bollinger, BollingerBands};
use super::cache::{CacheKey, IndicatorCache, IndicatorKind, IndicatorValue};
use super::ema::calculate_ema;
use super::ichimoku::{calculate_ichimoku, IchimokuCloud};
use super::macd::{calculate_macd, MacdResult};
use super::rsi::calculate_rsi;
use super::sma::calculate_sma;
use super::stoch_rsi::calculate_stoch_rsi;
use super::supertrend::calculate_super_trend;
use super::vwap::calculate_vwap;
use crate::market_data::PriceSeries;
use crate::runtime_config::AnalysisConfig;
use crate::types::BandCenter;

// =============================================================================
// IndicatorSnapshot
// =============================================================================

/// Every indicator value the decision engine consumes, for one series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub rsi: Decimal,
    pub macd: MacdResult,
    pub sma20: Decimal,
    pub sma50: Decimal,
    pub sma200: Decimal,
    pub ema12: Decimal,
    pub atr: Decimal,
    pub bollinger: BollingerBands,
    pub stochastic_rsi: Decimal,
    pub adx: Decimal,
    pub ichimoku: IchimokuCloud,
    pub super_trend: Decimal,
    pub vwap: Decimal,
    /// Lowest low of the swing lookback window.
    pub swing_low: Decimal,
    /// Highest high of the swing lookback window.
    pub swing_high: Decimal,
}

impl IndicatorSnapshot {
    /// Flat indicator name -> value mapping; tuple indicators are expanded
    /// into dotted component names.
    pub fn named_values(&self) -> BTreeMap<&'static str, Decimal> {
        BTreeMap::from([
            ("rsi", self.rsi),
            ("macd.line", self.macd.line),
            ("macd.signal", self.macd.signal),
            ("macd.histogram", self.macd.histogram),
            ("sma20", self.sma20),
            ("sma50", self.sma50),
            ("sma200", self.sma200),
            ("ema12", self.ema12),
            ("atr", self.atr),
            ("bollinger.upper", self.bollinger.upper),
            ("bollinger.middle", self.bollinger.middle),
            ("bollinger.lower", self.bollinger.lower),
            ("stochasticRsi", self.stochastic_rsi),
            ("adx", self.adx),
            ("ichimoku.tenkan", self.ichimoku.tenkan),
            ("ichimoku.kijun", self.ichimoku.kijun),
            ("ichimoku.senkouA", self.ichimoku.senkou_a),
            ("ichimoku.senkouB", self.ichimoku.senkou_b),
            ("ichimoku.chikou", self.ichimoku.chikou),
            ("superTrend", self.super_trend),
            ("vwap", self.vwap),
            ("swingLow", self.swing_low),
            ("swingHigh", self.swing_high),
        ])
    }
}

// =============================================================================
// IndicatorEngine
// =============================================================================

#[derive(Clone)]
pub struct IndicatorEngine {
    config: AnalysisConfig,
    cache: Option<Arc<IndicatorCache>>,
}

impl IndicatorEngine {
    /// Engine with its own cache sized from the configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        let cache = Arc::new(IndicatorCache::new(config.max_cache_entries));
        Self::with_cache(config, cache)
    }

    /// Engine sharing an existing cache with other engines.
    pub fn with_cache(config: AnalysisConfig, cache: Arc<IndicatorCache>) -> Self {
        Self {
            config,
            cache: Some(cache),
        }
    }

    /// Engine that recomputes every value.
    pub fn without_cache(config: AnalysisConfig) -> Self {
        Self { config, cache: None }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<IndicatorCache>> {
        self.cache.as_ref()
    }

    fn memo(
        &self,
        series: &PriceSeries,
        kind: IndicatorKind,
        compute: impl FnOnce() -> IndicatorValue,
    ) -> IndicatorValue {
        match (&self.cache, CacheKey::for_series(kind, series)) {
            (Some(cache), Some(key)) => cache.get_or_compute(key, compute),
            _ => compute(),
        }
    }

    fn scalar(
        &self,
        series: &PriceSeries,
        kind: IndicatorKind,
        compute: impl FnOnce() -> Decimal,
    ) -> Decimal {
        self.memo(series, kind, || IndicatorValue::Scalar(compute()))
            .as_scalar()
            .unwrap_or_default()
    }

    // --- Individual indicators ----------------------------------------------

    pub fn rsi(&self, series: &PriceSeries) -> Decimal {
        let period = self.config.rsi_period;
        self.scalar(series, IndicatorKind::Rsi { period }, || {
            calculate_rsi(&series.closes(), period)
        })
    }

    pub fn macd(&self, series: &PriceSeries) -> MacdResult {
        let (fast, slow, signal) = (
            self.config.macd_fast,
            self.config.macd_slow,
            self.config.macd_signal,
        );
        self.memo(series, IndicatorKind::Macd { fast, slow, signal }, || {
            IndicatorValue::Macd(calculate_macd(&series.closes(), fast, slow, signal))
        })
        .as_macd()
        .unwrap_or_default()
    }

    pub fn sma(&self, series: &PriceSeries, period: usize) -> Decimal {
        self.scalar(series, IndicatorKind::Sma { period }, || {
            calculate_sma(&series.closes(), period)
        })
    }

    pub fn ema(&self, series: &PriceSeries, period: usize) -> Decimal {
        self.scalar(series, IndicatorKind::Ema { period }, || {
            calculate_ema(&series.closes(), period)
        })
    }

    pub fn atr(&self, series: &PriceSeries) -> Decimal {
        let (period, mode) = (self.config.atr_period, self.config.atr_mode);
        self.scalar(series, IndicatorKind::Atr { period, mode }, || {
            calculate_atr(series.bars(), period, mode)
        })
    }

    pub fn bollinger(&self, series: &PriceSeries) -> BollingerBands {
        let period = self.config.bollinger_period;
        let k = self.config.bollinger_k_decimal();
        let center = self.config.bollinger_center;
        self.bollinger_with(series, period, k, center)
    }

    /// Bollinger Bands with explicit parameters (chart overlays use 20/2/SMA).
    pub fn bollinger_with(
        &self,
        series: &PriceSeries,
        period: usize,
        k: Decimal,
        center: BandCenter,
    ) -> BollingerBands {
        self.memo(series, IndicatorKind::Bollinger { period, k, center }, || {
            IndicatorValue::Bollinger(calculate_bollinger(&series.closes(), period, k, center))
        })
        .as_bollinger()
        .unwrap_or_default()
    }

    pub fn stoch_rsi(&self, series: &PriceSeries) -> Decimal {
        let period = self.config.stochastic_period;
        self.scalar(series, IndicatorKind::StochRsi { period }, || {
            calculate_stoch_rsi(&series.closes(), period)
        })
    }

    pub fn adx(&self, series: &PriceSeries) -> Decimal {
        let period = self.config.adx_period;
        self.scalar(series, IndicatorKind::Adx { period }, || {
            calculate_adx(series.bars(), period)
        })
    }

    pub fn ichimoku(&self, series: &PriceSeries) -> IchimokuCloud {
        self.memo(series, IndicatorKind::Ichimoku, || {
            IndicatorValue::Ichimoku(calculate_ichimoku(series.bars()))
        })
        .as_ichimoku()
        .unwrap_or_default()
    }

    pub fn super_trend(&self, series: &PriceSeries) -> Decimal {
        let period = self.config.super_trend_period;
        let multiplier = self.config.super_trend_multiplier_decimal();
        self.super_trend_with(series, period, multiplier)
    }

    pub fn super_trend_with(&self, series: &PriceSeries, period: usize, multiplier: Decimal) -> Decimal {
        self.scalar(series, IndicatorKind::SuperTrend { period, multiplier }, || {
            calculate_super_trend(series.bars(), period, multiplier)
        })
    }

    pub fn vwap(&self, series: &PriceSeries) -> Decimal {
        self.scalar(series, IndicatorKind::Vwap, || calculate_vwap(series.bars()))
    }

    // --- Snapshot -------------------------------------------------------------

    /// Compute every indicator for `series`.
    ///
    /// Independent groups run on the rayon pool; the result does not depend on
    /// scheduling or on whether a cache is attached.
    pub fn snapshot(&self, series: &PriceSeries) -> IndicatorSnapshot {
        let [p20, p50, p200] = self.config.trend_sma_periods;

        let ((momentum, trend), (volatility, structure)) = rayon::join(
            || {
                rayon::join(
                    || (self.rsi(series), self.macd(series), self.stoch_rsi(series)),
                    || {
                        (
                            self.sma(series, p20),
                            self.sma(series, p50),
                            self.sma(series, p200),
                            self.ema(series, self.config.ema_period),
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || (self.atr(series), self.bollinger(series), self.adx(series)),
                    || (self.ichimoku(series), self.super_trend(series), self.vwap(series)),
                )
            },
        );

        let (rsi, macd, stochastic_rsi) = momentum;
        let (sma20, sma50, sma200, ema12) = trend;
        let (atr, bollinger, adx) = volatility;
        let (ichimoku, super_trend, vwap) = structure;

        let lookback = self.config.swing_lookback;
        let snapshot = IndicatorSnapshot {
            rsi,
            macd,
            sma20,
            sma50,
            sma200,
            ema12,
            atr,
            bollinger,
            stochastic_rsi,
            adx,
            ichimoku,
            super_trend,
            vwap,
            swing_low: series.recent_low(lookback).unwrap_or_default(),
            swing_high: series.recent_high(lookback).unwrap_or_default(),
        };

        debug!(
            interval = %series.interval(),
            bars = series.len(),
            rsi = %snapshot.rsi,
            adx = %snapshot.adx,
            "indicator snapshot computed"
        );
        snapshot
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PricePoint;
    use crate::types::Interval;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn wavy_series(n: i64) -> PriceSeries {
        let bars = (0..n)
            .map(|i| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i);
                let c = Decimal::from(1_000 + i * 3 + (i * 37) % 23);
                PricePoint::new(ts, c, c + dec!(4), c - dec!(3), c, dec!(10) + Decimal::from(i % 7), Interval::OneHour)
            })
            .collect();
        PriceSeries::new(Interval::OneHour, bars).unwrap()
    }

    #[test]
    fn cache_never_changes_results() {
        let series = wavy_series(260);
        let cached = IndicatorEngine::new(AnalysisConfig::default());
        let plain = IndicatorEngine::without_cache(AnalysisConfig::default());
        let first = cached.snapshot(&series);
        let second = cached.snapshot(&series);
        assert_eq!(first, second);
        assert_eq!(first, plain.snapshot(&series));

        let stats = cached.cache().unwrap().stats();
        assert!(stats.hits > 0);
        assert!(stats.misses > 0);
    }

    #[test]
    fn prefix_series_gets_its_own_entry() {
        let series = wavy_series(80);
        let engine = IndicatorEngine::new(AnalysisConfig::default());
        let full = engine.rsi(&series);
        let shorter = series.without_last();
        assert_eq!(engine.rsi(&shorter), calculate_rsi(&shorter.closes(), 14));
        assert_eq!(engine.rsi(&series), full);
    }

    #[test]
    fn short_series_yields_sentinels() {
        let series = wavy_series(5);
        let engine = IndicatorEngine::new(AnalysisConfig::default());
        let snap = engine.snapshot(&series);
        assert_eq!(snap.rsi, Decimal::ZERO);
        assert!(snap.macd.is_zero());
        assert_eq!(snap.sma20, Decimal::ZERO);
        assert_eq!(snap.bollinger, BollingerBands::default());
        assert_eq!(snap.ichimoku, IchimokuCloud::default());
        assert_eq!(snap.adx, Decimal::ZERO);
        assert!(snap.vwap > Decimal::ZERO);
    }

    #[test]
    fn empty_series_snapshot_is_all_zero() {
        let series = PriceSeries::new(Interval::OneDay, Vec::new()).unwrap();
        let engine = IndicatorEngine::new(AnalysisConfig::default());
        assert_eq!(engine.snapshot(&series), IndicatorSnapshot::default());
    }

    #[test]
    fn atr_modes_are_cached_separately() {
        let series = wavy_series(60);
        let sma_engine = IndicatorEngine::new(AnalysisConfig::default());
        let cache = Arc::clone(sma_engine.cache().unwrap());
        let ema_engine = IndicatorEngine::with_cache(
            AnalysisConfig {
                atr_mode: crate::types::AtrMode::WilderEma,
                ..AnalysisConfig::default()
            },
            cache,
        );
        let a = sma_engine.atr(&series);
        let b = ema_engine.atr(&series);
        assert_eq!(a, calculate_atr(series.bars(), 14, crate::types::AtrMode::Sma));
        assert_eq!(b, calculate_atr(series.bars(), 14, crate::types::AtrMode::WilderEma));
    }

    #[test]
    fn named_values_cover_tuple_components() {
        let snap = IndicatorEngine::without_cache(AnalysisConfig::default()).snapshot(&wavy_series(60));
        let named = snap.named_values();
        assert_eq!(named["macd.histogram"], snap.macd.histogram);
        assert_eq!(named["ichimoku.senkouB"], snap.ichimoku.senkou_b);
        assert_eq!(named["bollinger.upper"], snap.bollinger.upper);
        assert_eq!(named.len(), 23);
    }
}

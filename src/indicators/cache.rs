// =============================================================================
// Indicator Cache — memoised indicator values keyed by parameters and series
// =============================================================================
//
// Design:
//   - parking_lot::RwLock around a HashMap; readers never block each other.
//   - Atomic hit/miss counters for lock-free stats.
//   - Values are a pure function of their key, so two threads computing the
//     same key concurrently store identical values; the last write wins.
//   - When the map reaches `max_entries` it is cleared before the next insert.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::bollinger::BollingerBands;
use super::ichimoku::IchimokuCloud;
use super::macd::MacdResult;
use crate::market_data::PriceSeries;
use crate::types::{AtrMode, BandCenter, Interval};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// An indicator together with every parameter that affects its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Rsi { period: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Sma { period: usize },
    Ema { period: usize },
    Atr { period: usize, mode: AtrMode },
    Bollinger { period: usize, k: Decimal, center: BandCenter },
    StochRsi { period: usize },
    Adx { period: usize },
    Ichimoku,
    SuperTrend { period: usize, multiplier: Decimal },
    Vwap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: IndicatorKind,
    pub interval: Interval,
    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
    pub len: usize,
}

impl CacheKey {
    /// Key for `kind` over `series`; `None` for an empty series.
    pub fn for_series(kind: IndicatorKind, series: &PriceSeries) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;
        Some(Self {
            kind,
            interval: series.interval(),
            first_timestamp: first.timestamp,
            last_timestamp: last.timestamp,
            len: series.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorValue {
    Scalar(Decimal),
    Macd(MacdResult),
    Bollinger(BollingerBands),
    Ichimoku(IchimokuCloud),
}

impl IndicatorValue {
    pub fn as_scalar(&self) -> Option<Decimal> {
        match self {
            IndicatorValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_macd(&self) -> Option<MacdResult> {
        match self {
            IndicatorValue::Macd(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bollinger(&self) -> Option<BollingerBands> {
        match self {
            IndicatorValue::Bollinger(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_ichimoku(&self) -> Option<IchimokuCloud> {
        match self {
            IndicatorValue::Ichimoku(v) => Some(*v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct IndicatorCache {
    entries: RwLock<HashMap<CacheKey, IndicatorValue>>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl IndicatorCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<IndicatorValue> {
        self.entries.read().get(key).copied()
    }

    pub fn insert(&self, key: CacheKey, value: IndicatorValue) {
        let mut entries = self.entries.write();
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            debug!(evicted = entries.len(), "indicator cache full, clearing");
            entries.clear();
        }
        entries.insert(key, value);
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// The computation runs without holding the lock.
    pub fn get_or_compute(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> IndicatorValue,
    ) -> IndicatorValue {
        if let Some(value) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(kind = ?key.kind, last = %key.last_timestamp, "indicator cache hit");
            return value;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute();
        self.insert(key, value);
        value
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for IndicatorCache {
    fn default() -> Self {
        Self::new(crate::runtime_config::AnalysisConfig::default().max_cache_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PricePoint;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn series(n: i64) -> PriceSeries {
        let bars = (0..n)
            .map(|i| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i);
                let c = Decimal::from(100 + i);
                PricePoint::new(ts, c, c, c, c, dec!(1), Interval::OneHour)
            })
            .collect();
        PriceSeries::new(Interval::OneHour, bars).unwrap()
    }

    #[test]
    fn empty_series_has_no_key() {
        assert!(CacheKey::for_series(IndicatorKind::Vwap, &series(0)).is_none());
    }

    #[test]
    fn parameters_are_part_of_the_key() {
        let s = series(10);
        let a = CacheKey::for_series(IndicatorKind::Sma { period: 5 }, &s).unwrap();
        let b = CacheKey::for_series(IndicatorKind::Sma { period: 6 }, &s).unwrap();
        let c = CacheKey::for_series(
            IndicatorKind::Atr { period: 5, mode: AtrMode::WilderEma },
            &s,
        )
        .unwrap();
        let d = CacheKey::for_series(IndicatorKind::Atr { period: 5, mode: AtrMode::Sma }, &s).unwrap();
        assert_ne!(a, b);
        assert_ne!(c, d);
    }

    #[test]
    fn same_tail_different_length_do_not_alias() {
        let long = series(10);
        let bars = long.bars()[5..].to_vec();
        let short = PriceSeries::new(Interval::OneHour, bars).unwrap();
        let kind = IndicatorKind::Sma { period: 3 };
        assert_ne!(
            CacheKey::for_series(kind, &long),
            CacheKey::for_series(kind, &short)
        );
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let cache = IndicatorCache::new(16);
        let key = CacheKey::for_series(IndicatorKind::Vwap, &series(3)).unwrap();
        let first = cache.get_or_compute(key, || IndicatorValue::Scalar(dec!(7)));
        let second = cache.get_or_compute(key, || IndicatorValue::Scalar(dec!(99)));
        assert_eq!(first, second);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, entries: 1 });
    }

    #[test]
    fn full_cache_is_cleared_before_insert() {
        let cache = IndicatorCache::new(2);
        let s = series(3);
        for period in 1..=3 {
            let key = CacheKey::for_series(IndicatorKind::Sma { period }, &s).unwrap();
            cache.insert(key, IndicatorValue::Scalar(Decimal::from(period as u64)));
        }
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_writers_agree() {
        let cache = Arc::new(IndicatorCache::new(64));
        let key = CacheKey::for_series(IndicatorKind::Ichimoku, &series(5)).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.get_or_compute(key, || IndicatorValue::Scalar(dec!(1.5)))
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), IndicatorValue::Scalar(dec!(1.5)));
        }
        assert_eq!(cache.len(), 1);
    }
}

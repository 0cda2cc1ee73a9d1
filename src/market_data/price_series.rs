use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::types::Interval;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar as produced by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub interval: Interval,
}

impl PricePoint {
    /// Prices are stored at a fixed 8-digit scale.
    pub const PRICE_SCALE: u32 = 8;

    pub fn new(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
        interval: Interval,
    ) -> Self {
        Self {
            timestamp,
            open: rescale(open),
            high: rescale(high),
            low: rescale(low),
            close: rescale(close),
            volume: rescale(volume),
            interval,
        }
    }
}

fn rescale(value: Decimal) -> Decimal {
    let mut value = crate::indicators::decimal::round_to(value, PricePoint::PRICE_SCALE);
    value.rescale(PricePoint::PRICE_SCALE);
    value
}

// ---------------------------------------------------------------------------
// PriceSeries
// ---------------------------------------------------------------------------

/// Immutable, validated view of bars ordered oldest to newest.
///
/// Construction rejects mixed intervals, out-of-order or duplicate
/// timestamps and negative values. The series is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceSeries {
    interval: Interval,
    bars: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validate `bars` and wrap them. An empty vector is accepted and takes
    /// `interval` as its classification.
    pub fn new(interval: Interval, bars: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if bar.interval != interval {
                return Err(SeriesError::MixedIntervals {
                    index,
                    expected: interval,
                    found: bar.interval,
                });
            }
            for (field, value) in [
                ("open", bar.open),
                ("high", bar.high),
                ("low", bar.low),
                ("close", bar.close),
                ("volume", bar.volume),
            ] {
                if value.is_sign_negative() && !value.is_zero() {
                    return Err(SeriesError::NegativeValue { index, field });
                }
            }
            if index > 0 {
                let previous = bars[index - 1].timestamp;
                if bar.timestamp == previous {
                    return Err(SeriesError::DuplicateTimestamp {
                        index,
                        timestamp: bar.timestamp,
                    });
                }
                if bar.timestamp < previous {
                    return Err(SeriesError::OutOfOrder {
                        index,
                        previous,
                        timestamp: bar.timestamp,
                    });
                }
            }
        }
        Ok(Self { interval, bars })
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn bars(&self) -> &[PricePoint] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.bars.last()
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The first `len` bars as a new series (clamped to the series length).
    pub fn prefix(&self, len: usize) -> PriceSeries {
        let len = len.min(self.bars.len());
        PriceSeries {
            interval: self.interval,
            bars: self.bars[..len].to_vec(),
        }
    }

    /// The series with its newest bar removed.
    pub fn without_last(&self) -> PriceSeries {
        self.prefix(self.bars.len().saturating_sub(1))
    }

    /// Lowest low across the most recent `count` bars.
    pub fn recent_low(&self, count: usize) -> Option<Decimal> {
        self.recent(count).iter().map(|b| b.low).min()
    }

    /// Highest high across the most recent `count` bars.
    pub fn recent_high(&self, count: usize) -> Option<Decimal> {
        self.recent(count).iter().map(|b| b.high).max()
    }

    fn recent(&self, count: usize) -> &[PricePoint] {
        if count == 0 {
            return &[];
        }
        let start = self.bars.len().saturating_sub(count);
        &self.bars[start..]
    }

    /// One bar per calendar day (UTC): the latest bar seen for that day,
    /// oldest day first.
    pub fn daily_closes(&self) -> PriceSeries {
        let mut daily: Vec<PricePoint> = Vec::new();
        let mut current_day: Option<NaiveDate> = None;
        for bar in &self.bars {
            let day = bar.timestamp.date_naive();
            if current_day == Some(day) {
                if let Some(last) = daily.last_mut() {
                    *last = bar.clone();
                }
            } else {
                daily.push(bar.clone());
                current_day = Some(day);
            }
        }
        PriceSeries {
            interval: self.interval,
            bars: daily,
        }
    }
}

// =============================================================================
// Boundary error types
// =============================================================================
//
// The indicator and decision engines are total and never fail. These errors
// only arise where data enters the crate.

use chrono::{DateTime, Utc};

use crate::types::Interval;

/// An interval string that matches none of the known aliases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid interval: {input}")]
pub struct IntervalParseError {
    pub input: String,
}

/// Rejection reasons for a bar sequence handed to [`crate::market_data::PriceSeries`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("bar {index} has interval {found}, series is {expected}")]
    MixedIntervals {
        index: usize,
        expected: Interval,
        found: Interval,
    },

    #[error("bar {index} at {timestamp} does not come after the previous bar at {previous}")]
    OutOfOrder {
        index: usize,
        previous: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    #[error("bar {index} at {timestamp} duplicates an existing timestamp")]
    DuplicateTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    #[error("bar {index} has a negative {field}")]
    NegativeValue { index: usize, field: &'static str },
}

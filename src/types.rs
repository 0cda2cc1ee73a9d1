// =============================================================================
// Shared types used across the signal engine
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntervalParseError;

// =============================================================================
// Interval
// =============================================================================

/// Bar interval classification of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

/// Every accepted spelling, matched after lower-casing and trimming.
const INTERVAL_ALIASES: &[(&str, Interval)] = &[
    ("1h", Interval::OneHour),
    ("1hour", Interval::OneHour),
    ("hourly", Interval::OneHour),
    ("4h", Interval::FourHours),
    ("4hours", Interval::FourHours),
    ("1d", Interval::OneDay),
    ("1day", Interval::OneDay),
    ("daily", Interval::OneDay),
];

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::OneHour, Interval::FourHours, Interval::OneDay];

    /// Canonical short form (`1h`, `4h`, `1d`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
        }
    }

    /// Nominal length of one bar.
    pub fn duration(&self) -> chrono::Duration {
        match self {
            Self::OneHour => chrono::Duration::hours(1),
            Self::FourHours => chrono::Duration::hours(4),
            Self::OneDay => chrono::Duration::days(1),
        }
    }

    /// All aliases that resolve to this interval.
    pub fn aliases(&self) -> impl Iterator<Item = &'static str> + '_ {
        INTERVAL_ALIASES
            .iter()
            .filter(move |(_, iv)| iv == self)
            .map(|(alias, _)| *alias)
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        INTERVAL_ALIASES
            .iter()
            .find(|(alias, _)| *alias == needle)
            .map(|(_, iv)| *iv)
            .ok_or_else(|| IntervalParseError {
                input: s.to_string(),
            })
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Signal
// =============================================================================

/// Discrete trading opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    BuyWeak,
    SellWeak,
}

impl Default for Signal {
    fn default() -> Self {
        Self::Hold
    }
}

impl Signal {
    /// `true` for the two actionable signals that produce price levels.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Buy | Self::Sell)
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Hold => "Wait",
            Self::BuyWeak => "Lean buy",
            Self::SellWeak => "Lean sell",
        }
    }

    pub fn trade_advice(&self) -> &'static str {
        match self {
            Self::Buy => "BUY (a LONG position can be opened)",
            Self::Sell => "SELL (a SHORT position can be opened)",
            Self::Hold | Self::BuyWeak | Self::SellWeak => "WAIT (do not open a position)",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
            Self::BuyWeak => write!(f, "BUY_WEAK"),
            Self::SellWeak => write!(f, "SELL_WEAK"),
        }
    }
}

// =============================================================================
// Indicator modes
// =============================================================================

/// How ATR averages the true-range sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtrMode {
    /// Simple mean of the first `period` true ranges.
    Sma,
    /// EMA-from-values over the whole true-range sequence.
    WilderEma,
}

impl Default for AtrMode {
    fn default() -> Self {
        Self::Sma
    }
}

impl std::fmt::Display for AtrMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sma => write!(f, "sma"),
            Self::WilderEma => write!(f, "wilder-ema"),
        }
    }
}

/// Center line of the Bollinger bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandCenter {
    Sma,
    Ema,
}

impl Default for BandCenter {
    fn default() -> Self {
        Self::Ema
    }
}

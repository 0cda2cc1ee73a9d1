// =============================================================================
// Market Sentiment — annotation only, never a gate on the signal
// =============================================================================
//
// The sentiment collaborator supplies a fear/greed reading, an aggregate
// sentiment score and two on-chain labels. They are folded into a separate
// bias vote:
//
//   fear/greed <= 25   => +2 bullish      (extreme fear)
//   fear/greed >= 75   => +2 bearish      (extreme greed)
//   sentiment  >  0.6  => +1 bullish
//   sentiment  <  0.4  => +1 bearish
//   whale  Accumulation / Distribution    => +1 bullish / bearish
//   flow   Inflow / Outflow               => +1 bullish / bearish
//
// A failed lookup is replaced by neutral defaults and logged.
// =============================================================================

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Supplies the latest market-sentiment reading.
pub trait SentimentSource: Send + Sync {
    fn snapshot(&self) -> Result<SentimentSnapshot>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSnapshot {
    pub fear_greed_value: u32,
    pub fear_greed_label: String,
    pub sentiment_value: Decimal,
    pub sentiment_label: String,
    pub whale_movement: String,
    pub flow_direction: String,
}

impl SentimentSnapshot {
    pub fn neutral() -> Self {
        Self {
            fear_greed_value: 50,
            fear_greed_label: "Neutral".to_string(),
            sentiment_value: dec!(0.5),
            sentiment_label: "Neutral".to_string(),
            whale_movement: "Neutral".to_string(),
            flow_direction: "Neutral".to_string(),
        }
    }
}

impl Default for SentimentSnapshot {
    fn default() -> Self {
        Self::neutral()
    }
}

/// A fixed reading is itself a source.
impl SentimentSource for SentimentSnapshot {
    fn snapshot(&self) -> Result<SentimentSnapshot> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentBias {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for SentimentBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "BULLISH"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

pub fn sentiment_bias(sentiment: &SentimentSnapshot) -> SentimentBias {
    let mut bullish = 0u32;
    let mut bearish = 0u32;

    if sentiment.fear_greed_value <= 25 {
        bullish += 2;
    } else if sentiment.fear_greed_value >= 75 {
        bearish += 2;
    }

    if sentiment.sentiment_value > dec!(0.6) {
        bullish += 1;
    } else if sentiment.sentiment_value < dec!(0.4) {
        bearish += 1;
    }

    match sentiment.whale_movement.as_str() {
        "Accumulation" => bullish += 1,
        "Distribution" => bearish += 1,
        _ => {}
    }

    match sentiment.flow_direction.as_str() {
        "Inflow" => bullish += 1,
        "Outflow" => bearish += 1,
        _ => {}
    }

    match bullish.cmp(&bearish) {
        std::cmp::Ordering::Greater => SentimentBias::Bullish,
        std::cmp::Ordering::Less => SentimentBias::Bearish,
        std::cmp::Ordering::Equal => SentimentBias::Neutral,
    }
}

/// Ask `source` for a reading, substituting neutral defaults on failure or
/// when no source is configured.
pub fn resolve_sentiment(source: Option<&dyn SentimentSource>) -> SentimentSnapshot {
    let Some(source) = source else {
        return SentimentSnapshot::neutral();
    };
    match source.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, "sentiment lookup failed, using neutral defaults");
            SentimentSnapshot::neutral()
        }
    }
}

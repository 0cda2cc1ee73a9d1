// =============================================================================
// Analysis Result — the immutable outcome of one signal generation
// =============================================================================
//
// Combines the aggregated signal, vote counts, trade levels, per-indicator
// rationale and the raw indicator values that produced them. Built once per
// request and serialised by whatever presentation layer sits on top.
// =============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::indicators::IndicatorSnapshot;
use crate::signals::levels::TakeProfitSource;
use crate::signals::sentiment::{SentimentBias, SentimentSnapshot};
use crate::signals::votes::Vote;
use crate::types::{Interval, Signal};

/// Reasoning text used when no bars were available.
pub const INSUFFICIENT_DATA: &str = "insufficient data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Aggregated BUY / SELL / HOLD.
    pub signal: Signal,

    /// First actionable opinion of RSI, MACD and SMA20, in that order.
    pub aggressive_signal: Signal,

    pub buy_signals: u32,
    pub sell_signals: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit_source: Option<TakeProfitSource>,

    /// Indicator name -> human-readable rationale.
    pub explanations: BTreeMap<String, String>,

    /// One-line summary of the vote and every indicator's rationale.
    pub reasoning: String,

    pub entry_explanation: String,
    pub levels_explanation: String,

    /// LONG / SHORT / WAIT advice text.
    pub trade_advice: String,

    pub indicators: IndicatorSnapshot,
    pub votes: Vec<Vote>,

    pub sentiment: SentimentSnapshot,
    pub sentiment_bias: SentimentBias,

    pub current_price: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,

    /// Timestamp of the newest bar the analysis used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl AnalysisResult {
    /// HOLD result for an interval without any bars.
    pub fn insufficient_data(interval: Interval, sentiment: SentimentSnapshot) -> Self {
        let sentiment_bias = crate::signals::sentiment::sentiment_bias(&sentiment);
        Self {
            signal: Signal::Hold,
            aggressive_signal: Signal::Hold,
            buy_signals: 0,
            sell_signals: 0,
            entry_price: None,
            stop_loss: None,
            take_profit: None,
            take_profit_source: None,
            explanations: BTreeMap::new(),
            reasoning: INSUFFICIENT_DATA.to_string(),
            entry_explanation: "HOLD: no trade suggested".to_string(),
            levels_explanation: "No price data, levels not computed".to_string(),
            trade_advice: Signal::Hold.trade_advice().to_string(),
            indicators: IndicatorSnapshot::default(),
            votes: Vec::new(),
            sentiment,
            sentiment_bias,
            current_price: Decimal::ZERO,
            interval: Some(interval),
            timestamp: None,
        }
    }

    /// Attach the interval and newest-bar timestamp the analysis ran on.
    pub fn with_bar(mut self, interval: Interval, timestamp: Option<DateTime<Utc>>) -> Self {
        self.interval = Some(interval);
        self.timestamp = timestamp;
        self
    }

    /// Flat indicator name -> value mapping.
    pub fn indicator_values(&self) -> BTreeMap<&'static str, Decimal> {
        self.indicators.named_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_result_is_hold_without_levels() {
        let r = AnalysisResult::insufficient_data(Interval::OneDay, SentimentSnapshot::neutral());
        assert_eq!(r.signal, Signal::Hold);
        assert_eq!(r.reasoning, INSUFFICIENT_DATA);
        assert!(r.entry_price.is_none() && r.stop_loss.is_none() && r.take_profit.is_none());
        assert!(r.indicator_values().values().all(|v| v.is_zero()));
    }

    #[test]
    fn serialises_camel_case_without_empty_levels() {
        let r = AnalysisResult::insufficient_data(Interval::OneHour, SentimentSnapshot::neutral());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["signal"], "HOLD");
        assert_eq!(json["interval"], "1h");
        assert!(json.get("stopLoss").is_none());
        assert!(json.get("buySignals").is_some());
        assert_eq!(json["sentimentBias"], "NEUTRAL");
    }
}

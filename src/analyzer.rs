// =============================================================================
// Analyzer — one signal per interval, from bars to AnalysisResult
// =============================================================================
//
// Pipeline:
//   1. Fetch the most recent `signal_lookback` bars for the interval
//   2. Validate them into a PriceSeries (never re-sorted)
//   3. Resolve sentiment (neutral defaults on failure)
//   4. Indicator snapshot of the full series
//   5. Indicator snapshot without the newest bar -> previous MACD histogram
//   6. Decision engine: votes, aggressive opinion, trade levels
//   7. Stamp the interval and newest-bar timestamp
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analysis_result::AnalysisResult;
use crate::indicators::IndicatorEngine;
use crate::market_data::{PriceSeries, PriceSource};
use crate::runtime_config::AnalysisConfig;
use crate::signals::sentiment::{resolve_sentiment, SentimentSnapshot, SentimentSource};
use crate::signals::DecisionEngine;
use crate::types::Interval;

pub struct Analyzer {
    indicators: IndicatorEngine,
    decision: DecisionEngine,
    prices: Arc<dyn PriceSource>,
    sentiment: Option<Arc<dyn SentimentSource>>,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig, prices: Arc<dyn PriceSource>) -> Self {
        Self {
            indicators: IndicatorEngine::new(config.clone()),
            decision: DecisionEngine::new(config),
            prices,
            sentiment: None,
        }
    }

    /// Attach a sentiment collaborator. Without one every result carries the
    /// neutral defaults.
    pub fn with_sentiment(mut self, source: Arc<dyn SentimentSource>) -> Self {
        self.sentiment = Some(source);
        self
    }

    pub fn indicators(&self) -> &IndicatorEngine {
        &self.indicators
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.decision.config()
    }

    /// Run the full pipeline on an already validated series.
    pub fn analyze(&self, series: &PriceSeries, sentiment: SentimentSnapshot) -> AnalysisResult {
        let Some(last) = series.last() else {
            debug!(interval = %series.interval(), "no bars, returning insufficient-data result");
            return AnalysisResult::insufficient_data(series.interval(), sentiment);
        };
        let price = last.close;
        let timestamp = last.timestamp;

        let snapshot = self.indicators.snapshot(series);
        let previous_histogram = (series.len() >= 2)
            .then(|| self.indicators.macd(&series.without_last()).histogram);

        self.decision
            .evaluate(&snapshot, price, previous_histogram, sentiment)
            .with_bar(series.interval(), Some(timestamp))
    }

    /// Fetch the latest bars for `interval` and analyze them.
    pub fn generate_signal(&self, interval: Interval) -> Result<AnalysisResult> {
        let lookback = self.config().signal_lookback;
        let bars = self
            .prices
            .latest_bars(interval, lookback)
            .with_context(|| format!("failed to fetch {interval} bars"))?;
        let series = PriceSeries::new(interval, bars)
            .with_context(|| format!("invalid {interval} bar sequence"))?;

        let sentiment = resolve_sentiment(self.sentiment.as_deref());
        let result = self.analyze(&series, sentiment);

        info!(
            %interval,
            bars = series.len(),
            signal = %result.signal,
            buy = result.buy_signals,
            sell = result.sell_signals,
            "signal generated"
        );
        Ok(result)
    }
}

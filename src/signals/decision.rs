// =============================================================================
// Decision Engine — multi-indicator vote and trade levels
// =============================================================================
//
// Pure function of (indicator snapshot, current price, previous MACD
// histogram, sentiment, configuration). Nothing is remembered between calls.
//
// Vote order:
//   1. RSI            oversold BUY / overbought SELL (weak leans do not vote)
//   2. MACD           histogram crossing, else line vs signal
//   3. SMA20/50/200   +2 when price is beyond all three, else one per SMA,
//                     plus one for a fully ordered stack; SMA20 alone
//                     when the stack is incomplete
//   4. Bollinger      below lower band BUY, above upper band SELL
//   5. Stochastic RSI < 0.20 BUY, > 0.80 SELL
//   6. ADX            > 25 adds one vote to the side already ahead
//   7. Ichimoku       tenkan vs kijun (ties SELL), then price vs cloud
//   8. SuperTrend     price above BUY, below SELL
//   9. VWAP           price above BUY, below SELL
//
// More BUY votes => BUY, more SELL votes => SELL, otherwise HOLD.
// =============================================================================

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::levels::compute_levels;
use super::sentiment::{sentiment_bias, SentimentSnapshot};
use super::votes::{aggressive_signal, macd_opinion, price_opinion, rsi_opinion, Side, VoteTally};
use crate::analysis_result::AnalysisResult;
use crate::indicators::rsi::rsi_zone;
use crate::indicators::IndicatorSnapshot;
use crate::runtime_config::AnalysisConfig;
use crate::types::Signal;

const STOCH_OVERSOLD: Decimal = dec!(0.20);
const STOCH_OVERBOUGHT: Decimal = dec!(0.80);
const ADX_TREND_THRESHOLD: Decimal = dec!(25);

/// Explanation keys, in reasoning order.
const EXPLANATION_ORDER: [&str; 9] = [
    "rsi",
    "macd",
    "trend",
    "bollinger",
    "stochasticRsi",
    "adx",
    "ichimoku",
    "superTrend",
    "vwap",
];

/// Votes plus the rationale each indicator gave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteOutcome {
    pub tally: VoteTally,
    pub explanations: BTreeMap<String, String>,
}

impl VoteOutcome {
    pub fn signal(&self) -> Signal {
        self.tally.signal()
    }

    fn explain(&mut self, indicator: &str, text: String) {
        self.explanations.insert(indicator.to_string(), text);
    }
}

#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: AnalysisConfig,
}

impl DecisionEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn rsi_thresholds(&self) -> (Decimal, Decimal) {
        (
            Decimal::from(self.config.rsi_oversold),
            Decimal::from(self.config.rsi_overbought),
        )
    }

    // -------------------------------------------------------------------------
    // Vote aggregation
    // -------------------------------------------------------------------------

    /// Cast every indicator's votes for `price`.
    pub fn determine_signal(
        &self,
        snapshot: &IndicatorSnapshot,
        price: Decimal,
        previous_histogram: Option<Decimal>,
    ) -> VoteOutcome {
        let mut out = VoteOutcome::default();

        // --- 1. RSI -----------------------------------------------------------
        let (oversold, overbought) = self.rsi_thresholds();
        let rsi = rsi_opinion(snapshot.rsi, oversold, overbought);
        out.tally.cast_opinion("rsi", rsi);
        let rsi_text = match rsi {
            Signal::Buy => "oversold, BUY signal",
            Signal::Sell => "overbought, SELL signal",
            Signal::BuyWeak => "neutral, leaning bullish",
            Signal::SellWeak => "neutral, leaning bearish",
            Signal::Hold => "neutral",
        };
        out.explain(
            "rsi",
            format!(
                "RSI: {} ({}, zone {})",
                snapshot.rsi,
                rsi_text,
                rsi_zone(snapshot.rsi, oversold, overbought)
            ),
        );

        // --- 2. MACD ----------------------------------------------------------
        let macd = macd_opinion(&snapshot.macd, previous_histogram);
        out.tally.cast_opinion("macd", macd);
        let crossed = previous_histogram.is_some_and(|prev| {
            (prev < Decimal::ZERO && snapshot.macd.histogram > Decimal::ZERO)
                || (prev > Decimal::ZERO && snapshot.macd.histogram < Decimal::ZERO)
        });
        let macd_text = match (macd, crossed) {
            (Signal::Buy, true) => "bullish histogram crossover",
            (Signal::Sell, true) => "bearish histogram crossover",
            (Signal::Buy, false) => "bullish, line above signal",
            (Signal::Sell, false) => "bearish, line below signal",
            _ => "neutral",
        };
        out.explain(
            "macd",
            format!(
                "MACD: {} / signal {} / histogram {} ({})",
                snapshot.macd.line, snapshot.macd.signal, snapshot.macd.histogram, macd_text
            ),
        );

        // --- 3. SMA alignment -------------------------------------------------
        let trend_text = self.trend_votes(&mut out.tally, snapshot, price);
        out.explain("trend", trend_text);

        // --- 4. Bollinger -----------------------------------------------------
        let bb = &snapshot.bollinger;
        let bollinger_text = if !bb.is_available() {
            "Bollinger: unavailable".to_string()
        } else if price > bb.upper {
            out.tally.cast("bollinger", Side::Sell, 1);
            format!("Bollinger: price above upper band {} (SELL signal)", bb.upper)
        } else if price < bb.lower {
            out.tally.cast("bollinger", Side::Buy, 1);
            format!("Bollinger: price below lower band {} (BUY signal)", bb.lower)
        } else {
            format!("Bollinger: price inside bands {} - {} (neutral)", bb.lower, bb.upper)
        };
        out.explain("bollinger", bollinger_text);

        // --- 5. Stochastic RSI ------------------------------------------------
        let stoch = snapshot.stochastic_rsi;
        let stoch_text = if stoch < STOCH_OVERSOLD {
            out.tally.cast("stochasticRsi", Side::Buy, 1);
            "oversold, BUY signal"
        } else if stoch > STOCH_OVERBOUGHT {
            out.tally.cast("stochasticRsi", Side::Sell, 1);
            "overbought, SELL signal"
        } else {
            "neutral"
        };
        out.explain("stochasticRsi", format!("Stoch RSI: {stoch} ({stoch_text})"));

        // --- 6. ADX amplifier -------------------------------------------------
        let adx_text = if snapshot.adx > ADX_TREND_THRESHOLD {
            match out.tally.leader() {
                Some(side) => {
                    out.tally.cast("adx", side, 1);
                    format!("strong trend, confirms {}", side.signal())
                }
                None => "strong trend, no side ahead".to_string(),
            }
        } else {
            "weak trend".to_string()
        };
        out.explain("adx", format!("ADX: {} ({})", snapshot.adx, adx_text));

        // --- 7. Ichimoku ------------------------------------------------------
        let ichimoku_text = self.ichimoku_votes(&mut out.tally, snapshot, price);
        out.explain("ichimoku", ichimoku_text);

        // --- 8. SuperTrend ----------------------------------------------------
        let st = price_opinion(price, snapshot.super_trend);
        out.tally.cast_opinion("superTrend", st);
        let st_text = match st {
            _ if snapshot.super_trend.is_zero() => "SuperTrend: unavailable".to_string(),
            Signal::Buy => format!("SuperTrend: {} uptrend (BUY signal)", snapshot.super_trend),
            Signal::Sell => format!("SuperTrend: {} downtrend (SELL signal)", snapshot.super_trend),
            _ => format!("SuperTrend: {} (neutral)", snapshot.super_trend),
        };
        out.explain("superTrend", st_text);

        // --- 9. VWAP ----------------------------------------------------------
        let vwap = price_opinion(price, snapshot.vwap);
        out.tally.cast_opinion("vwap", vwap);
        let vwap_text = match vwap {
            _ if snapshot.vwap.is_zero() => "VWAP: unavailable".to_string(),
            Signal::Buy => format!("VWAP: price above VWAP {} (BUY signal)", snapshot.vwap),
            Signal::Sell => format!("VWAP: price below VWAP {} (SELL signal)", snapshot.vwap),
            _ => format!("VWAP: price equals VWAP {} (neutral)", snapshot.vwap),
        };
        out.explain("vwap", vwap_text);

        out
    }

    fn trend_votes(&self, tally: &mut VoteTally, snapshot: &IndicatorSnapshot, price: Decimal) -> String {
        let smas = [
            ("SMA20", snapshot.sma20),
            ("SMA50", snapshot.sma50),
            ("SMA200", snapshot.sma200),
        ];

        // Without the full stack only SMA20 votes; price at the SMA counts as SELL.
        if smas.iter().any(|(_, v)| v.is_zero()) {
            return if snapshot.sma20.is_zero() {
                "Trend: SMAs unavailable".to_string()
            } else if price > snapshot.sma20 {
                tally.cast("trend", Side::Buy, 1);
                format!("Trend: price above SMA20 {} (BUY)", snapshot.sma20)
            } else {
                tally.cast("trend", Side::Sell, 1);
                format!("Trend: price at or below SMA20 {} (SELL)", snapshot.sma20)
            };
        }

        let mut text = if smas.iter().all(|(_, v)| price > *v) {
            tally.cast("trend", Side::Buy, 2);
            "Strong uptrend (price above all SMAs)".to_string()
        } else if smas.iter().all(|(_, v)| price < *v) {
            tally.cast("trend", Side::Sell, 2);
            "Strong downtrend (price below all SMAs)".to_string()
        } else {
            let per_sma: Vec<String> = smas
                .iter()
                .map(|(name, level)| {
                    if price > *level {
                        tally.cast("trend", Side::Buy, 1);
                        format!("above {name}")
                    } else {
                        tally.cast("trend", Side::Sell, 1);
                        format!("at or below {name}")
                    }
                })
                .collect();
            format!("Mixed trend (price {})", per_sma.join(", "))
        };

        let (s20, s50, s200) = (snapshot.sma20, snapshot.sma50, snapshot.sma200);
        if s20 > s50 && s50 > s200 {
            tally.cast("trend", Side::Buy, 1);
            text.push_str(" | bullish SMA order (SMA20 > SMA50 > SMA200)");
        } else if s20 < s50 && s50 < s200 {
            tally.cast("trend", Side::Sell, 1);
            text.push_str(" | bearish SMA order (SMA20 < SMA50 < SMA200)");
        }
        text
    }

    fn ichimoku_votes(&self, tally: &mut VoteTally, snapshot: &IndicatorSnapshot, price: Decimal) -> String {
        let cloud = &snapshot.ichimoku;
        if !cloud.is_available() {
            return "Ichimoku: unavailable".to_string();
        }

        let cross = if cloud.tenkan > cloud.kijun {
            tally.cast("ichimoku", Side::Buy, 1);
            "tenkan > kijun (BUY)"
        } else {
            tally.cast("ichimoku", Side::Sell, 1);
            "tenkan <= kijun (SELL)"
        };

        let position = if price > cloud.cloud_top() {
            tally.cast("ichimoku", Side::Buy, 1);
            "price above the cloud (BUY)"
        } else if price < cloud.cloud_bottom() {
            tally.cast("ichimoku", Side::Sell, 1);
            "price below the cloud (SELL)"
        } else {
            "price inside the cloud (neutral)"
        };

        format!("Ichimoku: {cross} | {position}")
    }

    /// RSI -> MACD -> SMA20, first actionable opinion wins.
    pub fn aggressive_signal(
        &self,
        snapshot: &IndicatorSnapshot,
        price: Decimal,
        previous_histogram: Option<Decimal>,
    ) -> Signal {
        let (oversold, overbought) = self.rsi_thresholds();
        aggressive_signal(
            rsi_opinion(snapshot.rsi, oversold, overbought),
            macd_opinion(&snapshot.macd, previous_histogram),
            price_opinion(price, snapshot.sma20),
        )
    }

    // -------------------------------------------------------------------------
    // Full evaluation
    // -------------------------------------------------------------------------

    /// Vote, pick levels for an actionable signal and assemble the result.
    pub fn evaluate(
        &self,
        snapshot: &IndicatorSnapshot,
        price: Decimal,
        previous_histogram: Option<Decimal>,
        sentiment: SentimentSnapshot,
    ) -> AnalysisResult {
        let outcome = self.determine_signal(snapshot, price, previous_histogram);
        let signal = outcome.signal();
        let aggressive = self.aggressive_signal(snapshot, price, previous_histogram);

        let (entry_price, stop_loss, take_profit, take_profit_source, entry_explanation, levels_explanation) =
            match outcome.tally.leader() {
                Some(side) => {
                    let levels = compute_levels(side, price, snapshot, &self.config);
                    (
                        Some(levels.entry_price),
                        levels.stop_loss,
                        levels.take_profit,
                        Some(levels.take_profit_source),
                        levels.entry_explanation,
                        levels.levels_explanation,
                    )
                }
                None => (
                    None,
                    None,
                    None,
                    None,
                    "HOLD: no trade suggested".to_string(),
                    "Neutral: stop loss and take profit not computed".to_string(),
                ),
            };

        let advice_basis = if self.config.aggressive_signal {
            aggressive
        } else {
            signal
        };

        let rationale: Vec<&str> = EXPLANATION_ORDER
            .iter()
            .filter_map(|key| outcome.explanations.get(*key).map(String::as_str))
            .collect();
        let reasoning = format!(
            "{} buy vs {} sell votes. {} | Signal: {}",
            outcome.tally.buy,
            outcome.tally.sell,
            rationale.join(" | "),
            signal.display_text()
        );

        let bias = sentiment_bias(&sentiment);
        debug!(
            %signal,
            %aggressive,
            buy = outcome.tally.buy,
            sell = outcome.tally.sell,
            sentiment = %bias,
            "decision evaluated"
        );

        AnalysisResult {
            signal,
            aggressive_signal: aggressive,
            buy_signals: outcome.tally.buy,
            sell_signals: outcome.tally.sell,
            entry_price,
            stop_loss,
            take_profit,
            take_profit_source,
            explanations: outcome.explanations,
            reasoning,
            entry_explanation,
            levels_explanation,
            trade_advice: advice_basis.trade_advice().to_string(),
            indicators: *snapshot,
            votes: outcome.tally.votes,
            sentiment,
            sentiment_bias: bias,
            current_price: price,
            interval: None,
            timestamp: None,
        }
    }
}

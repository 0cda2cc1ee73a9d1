// =============================================================================
// Trade Levels — entry, stop loss and take profit for an actionable signal
// =============================================================================
//
// Entry is always the current price.
//
// Stop loss:   SMA20 -/+ 0.5 * ATR           (only when SMA20 is available)
//
// Take profit candidates (BUY side; SELL mirrors each one):
//   1. Bollinger upper band
//   2. Ichimoku cloud top
//   3. Fibonacci extension of the recent swing:
//        price + (price - swing low) * 1.618
//
// A candidate qualifies when it lies on the profitable side of price and more
// than 0.5 * ATR away. BUY takes the lowest qualifying candidate, SELL the
// highest. Without any qualifying candidate the target is price +/- 2 * ATR.
//
// Finally any level closer to price than the minimum distance (1 % of price
// by default) is dropped.
// =============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::votes::Side;
use crate::indicators::decimal::{div, round8};
use crate::indicators::IndicatorSnapshot;
use crate::runtime_config::AnalysisConfig;

// =============================================================================
// Types
// =============================================================================

/// Where a take-profit level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TakeProfitSource {
    BollingerBand,
    IchimokuCloud,
    FibonacciExtension,
    AtrDefault,
}

impl TakeProfitSource {
    fn describe(&self, side: Side) -> &'static str {
        match (self, side) {
            (Self::BollingerBand, Side::Buy) => "Bollinger upper band (nearest valid level)",
            (Self::BollingerBand, Side::Sell) => "Bollinger lower band (nearest valid level)",
            (Self::IchimokuCloud, Side::Buy) => "Ichimoku cloud top (trend resistance)",
            (Self::IchimokuCloud, Side::Sell) => "Ichimoku cloud bottom (trend support)",
            (Self::FibonacciExtension, _) => "Fibonacci extension (golden ratio level)",
            (Self::AtrDefault, _) => "default 2xATR (other levels too far or too close)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeProfitCandidate {
    pub source: TakeProfitSource,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLevels {
    pub entry_price: Decimal,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    /// Source of the selected take profit, before the minimum-distance filter.
    pub take_profit_source: TakeProfitSource,
    pub entry_explanation: String,
    pub levels_explanation: String,
}

// =============================================================================
// Candidate generation & selection
// =============================================================================

/// Take-profit candidates for `side`, in fixed order: Bollinger, Ichimoku,
/// Fibonacci. Unavailable indicators contribute nothing.
pub fn take_profit_candidates(
    side: Side,
    price: Decimal,
    snapshot: &IndicatorSnapshot,
    fibonacci_extension: Decimal,
) -> Vec<TakeProfitCandidate> {
    let mut candidates = Vec::with_capacity(3);

    if snapshot.bollinger.is_available() {
        let band = match side {
            Side::Buy => snapshot.bollinger.upper,
            Side::Sell => snapshot.bollinger.lower,
        };
        candidates.push(TakeProfitCandidate {
            source: TakeProfitSource::BollingerBand,
            price: band,
        });
    }

    if snapshot.ichimoku.is_available() {
        let edge = match side {
            Side::Buy => snapshot.ichimoku.cloud_top(),
            Side::Sell => snapshot.ichimoku.cloud_bottom(),
        };
        candidates.push(TakeProfitCandidate {
            source: TakeProfitSource::IchimokuCloud,
            price: edge,
        });
    }

    let swing = match side {
        Side::Buy => snapshot.swing_low,
        Side::Sell => snapshot.swing_high,
    };
    if !swing.is_zero() {
        let extension = match side {
            Side::Buy => price + round8((price - swing) * fibonacci_extension),
            Side::Sell => price - round8((swing - price) * fibonacci_extension),
        };
        candidates.push(TakeProfitCandidate {
            source: TakeProfitSource::FibonacciExtension,
            price: extension,
        });
    }

    candidates
}

/// Pick the take profit among `candidates`, falling back to price +/- 2 * ATR.
pub fn select_take_profit(
    side: Side,
    price: Decimal,
    atr: Decimal,
    candidates: &[TakeProfitCandidate],
) -> TakeProfitCandidate {
    let half_atr = div(atr, Decimal::from(2));
    let qualifies = |c: &&TakeProfitCandidate| match side {
        Side::Buy => c.price > price && c.price - price > half_atr,
        Side::Sell => c.price < price && price - c.price > half_atr,
    };

    let valid = candidates.iter().filter(qualifies);
    let chosen = match side {
        Side::Buy => valid.min_by_key(|c| c.price),
        Side::Sell => valid.max_by_key(|c| c.price),
    };

    chosen.copied().unwrap_or_else(|| {
        let offset = atr * Decimal::from(2);
        TakeProfitCandidate {
            source: TakeProfitSource::AtrDefault,
            price: match side {
                Side::Buy => price + offset,
                Side::Sell => price - offset,
            },
        }
    })
}

/// Drop a level that sits closer to price than `min_distance`.
pub fn filter_min_distance(level: Option<Decimal>, price: Decimal, min_distance: Decimal) -> Option<Decimal> {
    level.filter(|l| (*l - price).abs() >= min_distance)
}

// =============================================================================
// Full level computation
// =============================================================================

pub fn compute_levels(
    side: Side,
    price: Decimal,
    snapshot: &IndicatorSnapshot,
    config: &AnalysisConfig,
) -> TradeLevels {
    let half_atr = div(snapshot.atr, Decimal::from(2));
    let min_distance = round8(price * config.min_level_distance_fraction());

    let raw_stop = (!snapshot.sma20.is_zero()).then(|| match side {
        Side::Buy => snapshot.sma20 - half_atr,
        Side::Sell => snapshot.sma20 + half_atr,
    });

    let candidates = take_profit_candidates(side, price, snapshot, config.fibonacci_extension_decimal());
    let chosen = select_take_profit(side, price, snapshot.atr, &candidates);

    let stop_loss = filter_min_distance(raw_stop, price, min_distance);
    let take_profit = filter_min_distance(Some(chosen.price), price, min_distance);

    let (label, sign) = match side {
        Side::Buy => ("LONG", "-"),
        Side::Sell => ("SHORT", "+"),
    };

    let mut parts = Vec::new();
    match raw_stop {
        Some(sl) => {
            let mut text = format!("Stop loss: SMA20 {sign} 0.5xATR = {sl}");
            if stop_loss.is_none() {
                text.push_str(" (dropped, closer than the minimum distance)");
            }
            parts.push(text);
        }
        None => parts.push("Stop loss: SMA20 unavailable".to_string()),
    }

    let listed: Vec<String> = candidates
        .iter()
        .map(|c| format!("{:?} {}", c.source, c.price))
        .collect();
    let mut tp_text = format!("Take profit: {} (candidates: {})", chosen.price, listed.join(", "));
    if take_profit.is_none() {
        tp_text.push_str(" (dropped, closer than the minimum distance)");
    }
    parts.push(tp_text);
    parts.push(format!("Selected: {}", chosen.source.describe(side)));

    TradeLevels {
        entry_price: price,
        stop_loss,
        take_profit,
        take_profit_source: chosen.source,
        entry_explanation: format!("{label} entry: enter at the current price {price}"),
        levels_explanation: parts.join(" | "),
    }
}

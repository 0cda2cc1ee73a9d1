// =============================================================================
// Vote Tally — per-indicator opinions aggregated into one signal
// =============================================================================
//
// Each indicator casts zero or more whole votes for the buy or sell side.
// The side with more votes wins; a tie is HOLD. Every vote is recorded with
// the indicator that cast it so the result can be audited.
// =============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::indicators::MacdResult;
use crate::types::Signal;

/// Direction a vote is cast for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn signal(&self) -> Signal {
        match self {
            Side::Buy => Signal::Buy,
            Side::Sell => Signal::Sell,
        }
    }
}

/// A single recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub indicator: &'static str,
    pub side: Side,
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub buy: u32,
    pub sell: u32,
    pub votes: Vec<Vote>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(&mut self, indicator: &'static str, side: Side, weight: u32) {
        if weight == 0 {
            return;
        }
        match side {
            Side::Buy => self.buy += weight,
            Side::Sell => self.sell += weight,
        }
        self.votes.push(Vote {
            indicator,
            side,
            weight,
        });
    }

    /// Cast one vote for the side of an actionable opinion; weak and HOLD
    /// opinions are ignored.
    pub fn cast_opinion(&mut self, indicator: &'static str, opinion: Signal) {
        match opinion {
            Signal::Buy => self.cast(indicator, Side::Buy, 1),
            Signal::Sell => self.cast(indicator, Side::Sell, 1),
            Signal::Hold | Signal::BuyWeak | Signal::SellWeak => {}
        }
    }

    /// The side currently ahead, if any.
    pub fn leader(&self) -> Option<Side> {
        match self.buy.cmp(&self.sell) {
            std::cmp::Ordering::Greater => Some(Side::Buy),
            std::cmp::Ordering::Less => Some(Side::Sell),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Final aggregated signal: BUY, SELL or HOLD.
    pub fn signal(&self) -> Signal {
        self.leader().map_or(Signal::Hold, |side| side.signal())
    }
}

// =============================================================================
// Opinions
// =============================================================================

/// RSI opinion: inclusive oversold/overbought thresholds, weak lean around 50.
pub fn rsi_opinion(rsi: Decimal, oversold: Decimal, overbought: Decimal) -> Signal {
    let midline = Decimal::from(50);
    if rsi <= oversold {
        Signal::Buy
    } else if rsi >= overbought {
        Signal::Sell
    } else if rsi > midline {
        Signal::BuyWeak
    } else if rsi < midline {
        Signal::SellWeak
    } else {
        Signal::Hold
    }
}

/// MACD opinion: a histogram sign change since the previous bar wins,
/// otherwise line/signal position confirmed by the histogram sign.
pub fn macd_opinion(macd: &MacdResult, previous_histogram: Option<Decimal>) -> Signal {
    let zero = Decimal::ZERO;
    if let Some(prev) = previous_histogram {
        if prev < zero && macd.histogram > zero {
            return Signal::Buy;
        }
        if prev > zero && macd.histogram < zero {
            return Signal::Sell;
        }
    }
    if macd.line > macd.signal && macd.histogram > zero {
        Signal::Buy
    } else if macd.line < macd.signal && macd.histogram < zero {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Price relative to a level; HOLD when the level is unavailable (zero) or
/// equal to price.
pub fn price_opinion(price: Decimal, level: Decimal) -> Signal {
    if level.is_zero() || price == level {
        Signal::Hold
    } else if price > level {
        Signal::Buy
    } else {
        Signal::Sell
    }
}

/// First actionable opinion in priority order RSI, MACD, primary SMA.
pub fn aggressive_signal(rsi: Signal, macd: Signal, sma: Signal) -> Signal {
    [rsi, macd, sma]
        .into_iter()
        .find(Signal::is_actionable)
        .unwrap_or(Signal::Hold)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rsi_thresholds_are_inclusive() {
        assert_eq!(rsi_opinion(dec!(30), dec!(30), dec!(70)), Signal::Buy);
        assert_eq!(rsi_opinion(dec!(70), dec!(30), dec!(70)), Signal::Sell);
        assert_eq!(rsi_opinion(dec!(30.01), dec!(30), dec!(70)), Signal::SellWeak);
        assert_eq!(rsi_opinion(dec!(69.99), dec!(30), dec!(70)), Signal::BuyWeak);
        assert_eq!(rsi_opinion(dec!(50), dec!(30), dec!(70)), Signal::Hold);
    }

    #[test]
    fn macd_bullish_crossing() {
        let macd = MacdResult {
            line: dec!(100),
            signal: dec!(50),
            histogram: dec!(50),
        };
        assert_eq!(macd_opinion(&macd, Some(dec!(-10))), Signal::Buy);
    }

    #[test]
    fn macd_bearish_crossing() {
        let macd = MacdResult {
            line: dec!(50),
            signal: dec!(100),
            histogram: dec!(-50),
        };
        assert_eq!(macd_opinion(&macd, Some(dec!(10))), Signal::Sell);
    }

    #[test]
    fn macd_crossing_beats_position() {
        // Histogram turned negative while the line is still above signal.
        let macd = MacdResult {
            line: dec!(5),
            signal: dec!(4),
            histogram: dec!(-1),
        };
        assert_eq!(macd_opinion(&macd, Some(dec!(2))), Signal::Sell);
        assert_eq!(macd_opinion(&macd, None), Signal::Hold);
    }

    #[test]
    fn macd_all_zero_is_hold() {
        assert_eq!(macd_opinion(&MacdResult::default(), Some(Decimal::ZERO)), Signal::Hold);
    }

    #[test]
    fn price_opinion_skips_missing_levels() {
        assert_eq!(price_opinion(dec!(10), Decimal::ZERO), Signal::Hold);
        assert_eq!(price_opinion(dec!(10), dec!(9)), Signal::Buy);
        assert_eq!(price_opinion(dec!(10), dec!(11)), Signal::Sell);
        assert_eq!(price_opinion(dec!(10), dec!(10)), Signal::Hold);
    }

    #[test]
    fn tally_majority_and_tie() {
        let mut tally = VoteTally::new();
        tally.cast("rsi", Side::Buy, 1);
        tally.cast("trend", Side::Sell, 2);
        assert_eq!(tally.signal(), Signal::Sell);
        tally.cast_opinion("vwap", Signal::Buy);
        assert_eq!(tally.signal(), Signal::Hold);
        tally.cast_opinion("rsi", Signal::BuyWeak);
        assert_eq!((tally.buy, tally.sell), (2, 2));
        assert_eq!(tally.votes.len(), 3);
    }

    #[test]
    fn aggressive_takes_first_actionable() {
        assert_eq!(aggressive_signal(Signal::BuyWeak, Signal::Sell, Signal::Buy), Signal::Sell);
        assert_eq!(aggressive_signal(Signal::Buy, Signal::Sell, Signal::Sell), Signal::Buy);
        assert_eq!(aggressive_signal(Signal::Hold, Signal::Hold, Signal::Buy), Signal::Buy);
        assert_eq!(aggressive_signal(Signal::Hold, Signal::Hold, Signal::Hold), Signal::Hold);
    }
}

// =============================================================================
// SuperTrend
// =============================================================================
//
// ATR band around the bar midpoint that flips side when price closes through
// it:
//
//   hl2         = (H + L) / 2
//   basic upper = hl2 + multiplier * ATR
//   basic lower = hl2 - multiplier * ATR
//
// The final upper band only moves down (and the final lower band only moves
// up) unless the previous close broke through it. An up-trend ends when the
// close drops below the final lower band, a down-trend when it rises above
// the final upper band. The reported line is the lower band in an up-trend
// and the upper band in a down-trend.
//
// ATR here is Wilder's: seeded with the mean of the first `period` true
// ranges, then ATR = (ATR * (period - 1) + TR) / period. Needs `period + 1`
// bars; otherwise zero.
// =============================================================================

use rust_decimal::Decimal;

use super::atr::true_ranges;
use super::decimal::{count, div, mean, midpoint, round8};
use crate::market_data::PricePoint;

pub fn calculate_super_trend(bars: &[PricePoint], period: usize, multiplier: Decimal) -> Decimal {
    if period == 0 || bars.len() < period + 1 {
        return Decimal::ZERO;
    }

    let trs = true_ranges(bars);
    let n = count(period);
    let keep = count(period - 1);
    let mut atr = mean(&trs[..period]);

    let bands = |bar: &PricePoint, atr: Decimal| {
        let hl2 = midpoint(bar.high, bar.low);
        let offset = round8(multiplier * atr);
        (hl2, hl2 + offset, hl2 - offset)
    };

    // First bar with a full ATR window.
    let first = &bars[period];
    let (hl2, mut upper, mut lower) = bands(first, atr);
    let mut uptrend = first.close >= hl2;
    let mut prev_close = first.close;

    for (i, bar) in bars.iter().enumerate().skip(period + 1) {
        atr = div(atr * keep + trs[i - 1], n);
        let (_, basic_upper, basic_lower) = bands(bar, atr);

        if basic_upper < upper || prev_close > upper {
            upper = basic_upper;
        }
        if basic_lower > lower || prev_close < lower {
            lower = basic_lower;
        }

        if uptrend && bar.close < lower {
            uptrend = false;
        } else if !uptrend && bar.close > upper {
            uptrend = true;
        }
        prev_close = bar.close;
    }

    if uptrend {
        lower
    } else {
        upper
    }
}

// =============================================================================
// Ichimoku Cloud
// =============================================================================
//
//   tenkan   = (highest high + lowest low) / 2 over the last 9 bars
//   kijun    = same over the last 26 bars
//   senkou A = (tenkan + kijun) / 2
//   senkou B = same midpoint over the last 52 bars
//   chikou   = close 26 bars before the newest bar
//
// The senkou spans are reported as computed at the newest bar; they are not
// projected 26 bars forward. Needs 52 bars; otherwise every line is zero.
// =============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::midpoint;
use crate::market_data::PricePoint;

pub const TENKAN_PERIOD: usize = 9;
pub const KIJUN_PERIOD: usize = 26;
pub const SENKOU_B_PERIOD: usize = 52;
pub const CHIKOU_SHIFT: usize = 26;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IchimokuCloud {
    pub tenkan: Decimal,
    pub kijun: Decimal,
    pub senkou_a: Decimal,
    pub senkou_b: Decimal,
    pub chikou: Decimal,
}

impl IchimokuCloud {
    pub fn is_available(&self) -> bool {
        !(self.senkou_a.is_zero() && self.senkou_b.is_zero())
    }

    pub fn cloud_top(&self) -> Decimal {
        self.senkou_a.max(self.senkou_b)
    }

    pub fn cloud_bottom(&self) -> Decimal {
        self.senkou_a.min(self.senkou_b)
    }
}

pub fn calculate_ichimoku(bars: &[PricePoint]) -> IchimokuCloud {
    if bars.len() < SENKOU_B_PERIOD {
        return IchimokuCloud::default();
    }

    let tenkan = channel_midpoint(bars, TENKAN_PERIOD);
    let kijun = channel_midpoint(bars, KIJUN_PERIOD);
    let chikou_index = bars.len().saturating_sub(CHIKOU_SHIFT + 1);

    IchimokuCloud {
        tenkan,
        kijun,
        senkou_a: midpoint(tenkan, kijun),
        senkou_b: channel_midpoint(bars, SENKOU_B_PERIOD),
        chikou: bars[chikou_index].close,
    }
}

/// Midpoint of the highest high and lowest low over the last `period` bars.
fn channel_midpoint(bars: &[PricePoint], period: usize) -> Decimal {
    let window = &bars[bars.len().saturating_sub(period)..];
    let high = window.iter().map(|b| b.high).max().unwrap_or_default();
    let low = window.iter().map(|b| b.low).min().unwrap_or_default();
    midpoint(high, low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interval;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn rising(n: i64) -> Vec<PricePoint> {
        (0..n)
            .map(|i| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i);
                let c = Decimal::from(100 + i);
                PricePoint::new(ts, c, c + dec!(1), c - dec!(1), c, dec!(5), Interval::OneHour)
            })
            .collect()
    }

    #[test]
    fn insufficient_data_is_all_zero() {
        let cloud = calculate_ichimoku(&rising(51));
        assert_eq!(cloud, IchimokuCloud::default());
        assert!(!cloud.is_available());
    }

    #[test]
    fn lines_for_a_steady_rise() {
        // Closes 100..=159; high = close + 1, low = close - 1.
        let cloud = calculate_ichimoku(&rising(60));
        // tenkan: highs up to 160, lows from 150 - 1 = 150 => 155
        assert_eq!(cloud.tenkan, dec!(155));
        // kijun: 160 and 133 - 1 = 133 => 146.5
        assert_eq!(cloud.kijun, dec!(146.5));
        assert_eq!(cloud.senkou_a, dec!(150.75));
        // senkou B: 160 and 107 => 133.5
        assert_eq!(cloud.senkou_b, dec!(133.5));
        // chikou: close of bar 59 - 26 = 33
        assert_eq!(cloud.chikou, dec!(133));
        assert_eq!(cloud.cloud_top(), dec!(150.75));
        assert_eq!(cloud.cloud_bottom(), dec!(133.5));
        assert!(cloud.is_available());
    }
}

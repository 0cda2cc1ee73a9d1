// =============================================================================
// Volume-Weighted Average Price (VWAP)
// =============================================================================
//
//   typical = (H + L + C) / 3
//   VWAP    = Σ(typical * volume) / Σ(volume)
//
// Cumulative over the whole series. Zero for an empty series or when no
// volume traded.
// =============================================================================

use rust_decimal::Decimal;

use super::decimal::div;
use crate::market_data::PricePoint;

pub fn calculate_vwap(bars: &[PricePoint]) -> Decimal {
    let three = Decimal::from(3);
    let (weighted, volume) = bars.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(weighted, volume), bar| {
            let typical = div(bar.high + bar.low + bar.close, three);
            (weighted + typical * bar.volume, volume + bar.volume)
        },
    );
    div(weighted, volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interval;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn bar(i: i64, high: Decimal, low: Decimal, close: Decimal, volume: Decimal) -> PricePoint {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i);
        PricePoint::new(ts, close, high, low, close, volume, Interval::OneHour)
    }

    #[test]
    fn empty_series_is_zero() {
        assert_eq!(calculate_vwap(&[]), Decimal::ZERO);
    }

    #[test]
    fn zero_volume_is_zero() {
        let bars = vec![bar(0, dec!(11), dec!(9), dec!(10), Decimal::ZERO)];
        assert_eq!(calculate_vwap(&bars), Decimal::ZERO);
    }

    #[test]
    fn weights_by_volume() {
        let bars = vec![
            bar(0, dec!(11), dec!(9), dec!(10), dec!(1)),
            bar(1, dec!(21), dec!(19), dec!(20), dec!(3)),
        ];
        // (10 * 1 + 20 * 3) / 4
        assert_eq!(calculate_vwap(&bars), dec!(17.5));
    }
}

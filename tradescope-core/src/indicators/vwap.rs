//! Volume-weighted average price over a trailing window.
//!
//! VWAP = Σ(typical × volume) / Σvolume, typical = (H + L + C) / 3.
//! Zero total volume → plain mean of typical prices.

use serde::{Deserialize, Serialize};

use super::{mean, tail};
use crate::domain::Bar;

/// Price position relative to VWAP, bucketed by percent deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VwapSignal {
    /// deviation > +2 %
    Overbought,
    /// +0.5 % .. +2 %
    Bullish,
    Neutral,
    /// -2 % .. -0.5 %
    Bearish,
    /// deviation < -2 %
    Oversold,
}

impl VwapSignal {
    pub fn from_deviation(deviation_percent: f64) -> Self {
        if deviation_percent > 2.0 {
            Self::Overbought
        } else if deviation_percent >= 0.5 {
            Self::Bullish
        } else if deviation_percent > -0.5 {
            Self::Neutral
        } else if deviation_percent >= -2.0 {
            Self::Bearish
        } else {
            Self::Oversold
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VwapReading {
    pub value: f64,
    pub deviation_percent: f64,
    pub signal: VwapSignal,
}

pub fn vwap(bars: &[Bar], window: usize, price: f64) -> VwapReading {
    let recent = tail(bars, window.max(1));

    let total_volume: f64 = recent.iter().map(|b| b.volume).sum();
    let value = if recent.is_empty() {
        price
    } else if total_volume > 0.0 {
        recent.iter().map(|b| b.typical_price() * b.volume).sum::<f64>() / total_volume
    } else {
        let typical: Vec<f64> = recent.iter().map(Bar::typical_price).collect();
        mean(&typical)
    };

    let deviation_percent = if value > 0.0 {
        (price - value) / value * 100.0
    } else {
        0.0
    };

    VwapReading {
        value,
        deviation_percent,
        signal: VwapSignal::from_deviation(deviation_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::TimeZone;

    fn bar(day: i64, close: f64, volume: f64) -> Bar {
        let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        Bar::new(base + chrono::Duration::days(day), close, close, close, close, volume)
    }

    #[test]
    fn volume_weighting() {
        let bars = vec![bar(0, 100.0, 1.0), bar(1, 110.0, 3.0)];
        let reading = vwap(&bars, 20, 107.5);
        assert_approx(reading.value, 107.5, DEFAULT_EPSILON);
        assert_approx(reading.deviation_percent, 0.0, DEFAULT_EPSILON);
        assert_eq!(reading.signal, VwapSignal::Neutral);
    }

    #[test]
    fn zero_volume_uses_mean_typical_price() {
        let bars = vec![bar(0, 100.0, 0.0), bar(1, 110.0, 0.0)];
        assert_approx(vwap(&bars, 20, 105.0).value, 105.0, DEFAULT_EPSILON);
    }

    #[test]
    fn signal_bands() {
        assert_eq!(VwapSignal::from_deviation(2.5), VwapSignal::Overbought);
        assert_eq!(VwapSignal::from_deviation(1.0), VwapSignal::Bullish);
        assert_eq!(VwapSignal::from_deviation(0.2), VwapSignal::Neutral);
        assert_eq!(VwapSignal::from_deviation(-1.0), VwapSignal::Bearish);
        assert_eq!(VwapSignal::from_deviation(-3.0), VwapSignal::Oversold);
    }

    #[test]
    fn empty_window_anchors_on_price() {
        let reading = vwap(&[], 20, 50.0);
        assert_eq!(reading.value, 50.0);
        assert_eq!(reading.signal, VwapSignal::Neutral);
    }
}

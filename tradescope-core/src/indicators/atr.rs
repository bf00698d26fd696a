//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR is the simple mean of the trailing `period` true ranges. TR[0] has
//! no previous close and is excluded once enough history exists.

use serde::{Deserialize, Serialize};

use super::{mean, tail};
use crate::domain::Bar;

/// Compute the True Range series from bars.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(bars.len());
    let Some(first) = bars.first() else {
        return tr;
    };
    tr.push(first.range());

    for pair in bars.windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);
        let pc = prev.close;
        tr.push(bar.range().max((bar.high - pc).abs()).max((bar.low - pc).abs()));
    }

    tr
}

/// Rolling ATR aligned with `bars`; NaN until `period` true ranges exist.
pub fn atr_series(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() <= period {
        return out;
    }

    let tr = true_range(bars);
    let width = period as f64;
    let mut window_sum: f64 = tr[1..=period].iter().sum();
    out[period] = window_sum / width;
    for i in (period + 1)..bars.len() {
        window_sum += tr[i] - tr[i - period];
        out[i] = window_sum / width;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtrReading {
    pub value: f64,
    /// ATR as a percentage of `price`; 0 when price is not positive.
    pub percent_of_price: f64,
}

/// ATR at the last bar, expressed against `price`.
///
/// Fewer than two bars → high - low of the last bar (0 for no bars).
pub fn atr(bars: &[Bar], period: usize, price: f64) -> AtrReading {
    let value = match bars.len() {
        0 => 0.0,
        1 => bars[0].range(),
        _ => {
            let tr = true_range(bars);
            mean(tail(&tr[1..], period.max(1)))
        }
    };

    let percent_of_price = if price > 0.0 { value / price * 100.0 } else { 0.0 };

    AtrReading {
        value,
        percent_of_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};
    use chrono::TimeZone;

    fn bar(day: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        Bar::new(base + chrono::Duration::days(day), open, high, low, close, 1000.0)
    }

    #[test]
    fn true_range_uses_previous_close_gap() {
        let bars = vec![
            bar(0, 100.0, 102.0, 99.0, 101.0),
            // Gap up: |high - prev_close| = 9 dominates high - low = 3
            bar(1, 108.0, 110.0, 107.0, 109.0),
            // Gap down: |low - prev_close| = 10 dominates
            bar(2, 100.0, 101.0, 99.0, 100.0),
        ];
        let tr = true_range(&bars);
        assert_approx(tr[0], 3.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 9.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_constant_range() {
        // make_bars: high/low are 1 beyond open/close, steps of 1 → TR = 3 every bar
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let reading = atr(&bars, 14, 129.0);
        assert_approx(reading.value, 3.0, DEFAULT_EPSILON);
        assert_approx(reading.percent_of_price, 3.0 / 129.0 * 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_series_matches_snapshot() {
        let closes = [100.0, 103.0, 99.0, 104.0, 101.0, 107.0, 102.0, 108.0];
        let bars = make_bars(&closes);
        let series = atr_series(&bars, 3);
        assert!(series[2].is_nan());
        for i in 3..bars.len() {
            assert_approx(series[i], atr(&bars[..=i], 3, 100.0).value, 1e-9);
        }
    }

    #[test]
    fn atr_short_history_fallbacks() {
        let one = vec![bar(0, 100.0, 105.0, 98.0, 101.0)];
        assert_approx(atr(&one, 14, 101.0).value, 7.0, DEFAULT_EPSILON);
        let none = atr(&[], 14, 100.0);
        assert_eq!(none.value, 0.0);
        assert_eq!(atr(&one, 14, 0.0).percent_of_price, 0.0);
    }
}

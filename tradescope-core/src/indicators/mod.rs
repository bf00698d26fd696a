//! Indicator library.
//!
//! Indicators are pure functions: bar history in, numbers out. Series
//! helpers (`ema_of_series`, `atr_series`) return a vector aligned with the
//! input (NaN during warmup). Snapshot helpers (`macd`, `bollinger`, `adx`,
//! ...) read only the trailing window they need and degrade to a documented
//! fallback instead of failing when history is short.
//!
//! # Look-ahead contamination guard
//! No indicator value at bar t may depend on price data from bar t+1 or later.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod levels;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod stochastic;
pub mod vwap;

pub use adx::{adx, AdxReading, TrendStrength};
pub use atr::{atr, atr_series, true_range, AtrReading};
pub use bollinger::{bollinger, BollingerReading};
pub use ema::{ema_last, ema_of_series};
pub use levels::{
    fibonacci, key_levels, pivot_points, swing_points, FibLevel, Fibonacci, KeyLevels,
    PivotPoints, SwingKind, SwingPoint,
};
pub use macd::{macd, MacdMomentum, MacdReading};
pub use rsi::rsi;
pub use sma::sma_last;
pub use snapshot::{IndicatorSnapshot, INDICATOR_SET_VERSION};
pub use stochastic::{stochastic, williams_r, OscillatorZone, StochasticReading, WilliamsReading};
pub use vwap::{vwap, VwapReading, VwapSignal};

use crate::domain::Bar;

/// Close prices of a bar slice.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Last `n` items of a slice (the whole slice when shorter).
pub(crate) fn tail<T>(values: &[T], n: usize) -> &[T] {
    &values[values.len().saturating_sub(n)..]
}

/// Arithmetic mean; 0.0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for fewer than two values.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                base + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                1000.0,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

//! Moving Average Convergence Divergence (MACD).
//!
//! line = EMA(fast) - EMA(slow), signal = EMA(signal_period) of line,
//! histogram = line - signal.
//!
//! Besides the three values the reading carries:
//! - `crossover`: the histogram changed sign on the last bar
//! - `zero_line_bias`: sign of the MACD line
//! - `momentum`: whether |histogram| is growing or shrinking
//!
//! When the histogram is indistinguishable from zero (a perfectly steady
//! trend makes line and signal coincide), `trend` falls back to the
//! zero-line bias.

use serde::{Deserialize, Serialize};

use super::ema::ema_of_series;
use crate::domain::Direction;

/// Growth of the histogram magnitude versus the previous bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdMomentum {
    Expanding,
    Contracting,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdReading {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
    pub trend: Direction,
    pub crossover: Option<Direction>,
    pub zero_line_bias: Direction,
    pub momentum: MacdMomentum,
}

impl MacdReading {
    /// Reading for a series too short to produce a slow EMA.
    pub fn neutral() -> Self {
        Self {
            line: 0.0,
            signal: 0.0,
            histogram: 0.0,
            trend: Direction::Neutral,
            crossover: None,
            zero_line_bias: Direction::Neutral,
            momentum: MacdMomentum::Flat,
        }
    }
}

/// Compute the MACD reading at the last close.
///
/// Fewer than `slow` closes → [`MacdReading::neutral`].
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdReading {
    if closes.len() < slow.max(fast) || fast == 0 || slow == 0 {
        return MacdReading::neutral();
    }

    let fast_ema = ema_of_series(closes, fast);
    let slow_ema = ema_of_series(closes, slow);
    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .filter(|v| v.is_finite())
        .collect();

    let Some(&last_line) = line.last() else {
        return MacdReading::neutral();
    };

    let signal_series: Vec<f64> = ema_of_series(&line, signal_period)
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();

    let price = closes.last().copied().unwrap_or(0.0);
    let tolerance = 1e-9 * price.abs().max(1.0);

    // Signal line needs `signal_period` line values; before that it tracks the line.
    let (signal, histogram, prev_histogram) = match signal_series.len() {
        0 => (last_line, 0.0, None),
        len => {
            let hist_now = last_line - signal_series[len - 1];
            let prev = if len >= 2 {
                Some(line[line.len() - 2] - signal_series[len - 2])
            } else {
                None
            };
            (signal_series[len - 1], hist_now, prev)
        }
    };

    let zero_line_bias = sign_of(last_line, tolerance);

    let trend = match sign_of(histogram, tolerance) {
        Direction::Neutral => zero_line_bias,
        d => d,
    };

    let crossover = prev_histogram.and_then(|prev| {
        if prev <= tolerance && histogram > tolerance {
            Some(Direction::Bullish)
        } else if prev >= -tolerance && histogram < -tolerance {
            Some(Direction::Bearish)
        } else {
            None
        }
    });

    let momentum = match prev_histogram {
        Some(prev) if histogram.abs() > prev.abs() + tolerance => MacdMomentum::Expanding,
        Some(prev) if histogram.abs() + tolerance < prev.abs() => MacdMomentum::Contracting,
        _ => MacdMomentum::Flat,
    };

    MacdReading {
        line: last_line,
        signal,
        histogram,
        trend,
        crossover,
        zero_line_bias,
        momentum,
    }
}

fn sign_of(value: f64, tolerance: f64) -> Direction {
    if value > tolerance {
        Direction::Bullish
    } else if value < -tolerance {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}

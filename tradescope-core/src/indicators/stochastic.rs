//! Stochastic oscillator and Williams %R.
//!
//! Both place the close within the trailing high/low range:
//! - %K = (close - LL) / (HH - LL) × 100, %D = SMA(d_period) of %K
//! - %R = (HH - close) / (HH - LL) × -100
//!
//! Zero range → %K 50 and %R -50. Shorter history than the period uses
//! the bars available.

use serde::{Deserialize, Serialize};

use super::{mean, tail};
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorZone {
    Overbought,
    Oversold,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticReading {
    pub k: f64,
    pub d: f64,
    pub zone: OscillatorZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WilliamsReading {
    pub value: f64,
    pub zone: OscillatorZone,
}

/// Highest high and lowest low over a window.
fn extremes(window: &[Bar]) -> (f64, f64) {
    window.iter().fold((f64::MIN, f64::MAX), |(hh, ll), b| {
        (hh.max(b.high), ll.min(b.low))
    })
}

fn percent_k(window: &[Bar]) -> f64 {
    let Some(last) = window.last() else {
        return 50.0;
    };
    let (hh, ll) = extremes(window);
    let range = hh - ll;
    if range <= 0.0 {
        50.0
    } else {
        ((last.close - ll) / range * 100.0).clamp(0.0, 100.0)
    }
}

/// Stochastic %K/%D at the last bar. Overbought at %K ≥ 80, oversold ≤ 20.
pub fn stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> StochasticReading {
    let k_period = k_period.max(1);
    let n = bars.len();

    let ks: Vec<f64> = (n.saturating_sub(d_period.max(1))..n)
        .map(|end| {
            let start = (end + 1).saturating_sub(k_period);
            percent_k(&bars[start..=end])
        })
        .collect();

    let k = ks.last().copied().unwrap_or(50.0);
    let d = if ks.is_empty() { 50.0 } else { mean(&ks) };

    let zone = if k >= 80.0 {
        OscillatorZone::Overbought
    } else if k <= 20.0 {
        OscillatorZone::Oversold
    } else {
        OscillatorZone::Neutral
    };

    StochasticReading { k, d, zone }
}

/// Williams %R at the last bar. Overbought at ≥ -20, oversold ≤ -80.
pub fn williams_r(bars: &[Bar], period: usize) -> WilliamsReading {
    let window = tail(bars, period.max(1));
    let value = match window.last() {
        None => -50.0,
        Some(last) => {
            let (hh, ll) = extremes(window);
            let range = hh - ll;
            if range <= 0.0 {
                -50.0
            } else {
                ((hh - last.close) / range * -100.0).clamp(-100.0, 0.0)
            }
        }
    };

    let zone = if value >= -20.0 {
        OscillatorZone::Overbought
    } else if value <= -80.0 {
        OscillatorZone::Oversold
    } else {
        OscillatorZone::Neutral
    };

    WilliamsReading { value, zone }
}

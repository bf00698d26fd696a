//! Bollinger Bands: SMA ± k standard deviations.
//!
//! Uses population stddev (divide by N). Besides the bands the reading
//! reports:
//! - width: (upper - lower) / middle
//! - position: where `price` sits between the bands, clamped to [0, 1]
//! - squeeze: current width < 0.7 × mean of the previous (up to 20) widths

use serde::{Deserialize, Serialize};

use super::{mean, std_dev, tail};

/// Width ratio below which the bands count as squeezed.
pub const SQUEEZE_RATIO: f64 = 0.7;

/// Number of historical widths averaged for the squeeze comparison.
pub const SQUEEZE_LOOKBACK: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerReading {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
    pub position: f64,
    pub squeeze: bool,
    /// Mean width the squeeze was judged against (0 when no history).
    pub average_width: f64,
}

/// Bollinger reading at the last close, with `price` placed within the bands.
///
/// Shorter series than `period` use every close available; an empty series
/// collapses all bands onto `price`.
pub fn bollinger(closes: &[f64], period: usize, k: f64, price: f64) -> BollingerReading {
    let period = period.max(1);
    if closes.is_empty() {
        return BollingerReading {
            upper: price,
            middle: price,
            lower: price,
            width: 0.0,
            position: 0.5,
            squeeze: false,
            average_width: 0.0,
        };
    }

    let (upper, middle, lower) = bands(tail(closes, period), k);
    let width = band_width(upper, middle, lower);

    let range = upper - lower;
    let position = if range > 0.0 {
        ((price - lower) / range).clamp(0.0, 1.0)
    } else {
        0.5
    };

    // Widths of the windows ending on each of the previous bars.
    let previous: Vec<f64> = if closes.len() > period {
        let first_end = period.max(closes.len().saturating_sub(SQUEEZE_LOOKBACK + 1) + 1);
        (first_end..closes.len())
            .map(|end| {
                let (u, m, l) = bands(&closes[end - period..end], k);
                band_width(u, m, l)
            })
            .collect()
    } else {
        Vec::new()
    };

    let average_width = mean(&previous);
    let squeeze = !previous.is_empty() && width < SQUEEZE_RATIO * average_width;

    BollingerReading {
        upper,
        middle,
        lower,
        width,
        position,
        squeeze,
        average_width,
    }
}

fn bands(window: &[f64], k: f64) -> (f64, f64, f64) {
    let middle = mean(window);
    let sd = std_dev(window);
    (middle + k * sd, middle, middle - k * sd)
}

fn band_width(upper: f64, middle: f64, lower: f64) -> f64 {
    if middle == 0.0 {
        0.0
    } else {
        (upper - lower) / middle
    }
}

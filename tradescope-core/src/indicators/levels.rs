//! Price levels: Fibonacci retracements, classic pivots and fractal swings.
//!
//! [`key_levels`] merges all three into the candidate support/resistance
//! set used by the trade setup calculator.

use serde::{Deserialize, Serialize};

use super::tail;
use crate::domain::Bar;

/// Retracement ratios, as fractions of the swing range.
pub const FIB_RETRACEMENTS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

/// Extension ratios, projected beyond the swing.
pub const FIB_EXTENSIONS: [f64; 2] = [1.272, 1.618];

/// Bars searched for the Fibonacci swing.
pub const FIB_LOOKBACK: usize = 50;

/// Bars searched for fractal swing points.
pub const SWING_LOOKBACK: usize = 60;

/// Bars on each side a fractal extreme must dominate.
pub const SWING_WING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibLevel {
    pub ratio: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fibonacci {
    pub swing_high: f64,
    pub swing_low: f64,
    /// True when the swing low came before the swing high.
    pub uptrend: bool,
    pub retracements: Vec<FibLevel>,
    pub extensions: Vec<FibLevel>,
}

impl Fibonacci {
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.retracements
            .iter()
            .chain(&self.extensions)
            .map(|l| l.price)
            .chain([self.swing_high, self.swing_low])
    }
}

/// Fibonacci levels over the trailing `lookback` bars.
///
/// An uptrend retraces down from the swing high and extends above it; a
/// downtrend mirrors. `None` for an empty window or a zero range.
pub fn fibonacci(bars: &[Bar], lookback: usize) -> Option<Fibonacci> {
    let window = tail(bars, lookback.max(1));
    let (high_idx, high) = window
        .iter()
        .enumerate()
        .map(|(i, b)| (i, b.high))
        .fold(None, |best: Option<(usize, f64)>, (i, h)| match best {
            Some((_, bh)) if bh >= h => best,
            _ => Some((i, h)),
        })?;
    let (low_idx, low) = window
        .iter()
        .enumerate()
        .map(|(i, b)| (i, b.low))
        .fold(None, |best: Option<(usize, f64)>, (i, l)| match best {
            Some((_, bl)) if bl <= l => best,
            _ => Some((i, l)),
        })?;

    let range = high - low;
    if range.is_nan() || range <= 0.0 {
        return None;
    }

    let uptrend = high_idx >= low_idx;
    let retracements = FIB_RETRACEMENTS
        .iter()
        .map(|&ratio| FibLevel {
            ratio,
            price: if uptrend {
                high - range * ratio
            } else {
                low + range * ratio
            },
        })
        .collect();
    let extensions = FIB_EXTENSIONS
        .iter()
        .map(|&ratio| FibLevel {
            ratio,
            price: if uptrend {
                low + range * ratio
            } else {
                high - range * ratio
            },
        })
        .collect();

    Some(Fibonacci {
        swing_high: high,
        swing_low: low,
        uptrend,
        retracements,
        extensions,
    })
}

/// Classic floor-trader pivots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotPoints {
    pub pivot: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

impl PivotPoints {
    pub fn from_bar(bar: &Bar) -> Self {
        let (h, l, c) = (bar.high, bar.low, bar.close);
        let p = (h + l + c) / 3.0;
        Self {
            pivot: p,
            r1: 2.0 * p - l,
            r2: p + (h - l),
            r3: h + 2.0 * (p - l),
            s1: 2.0 * p - h,
            s2: p - (h - l),
            s3: l - 2.0 * (h - p),
        }
    }

    pub fn prices(&self) -> [f64; 7] {
        [self.s3, self.s2, self.s1, self.pivot, self.r1, self.r2, self.r3]
    }
}

/// Pivots from the bar before the last one (the last bar is the session in
/// progress); a single bar uses itself.
pub fn pivot_points(bars: &[Bar]) -> Option<PivotPoints> {
    let prior = match bars.len() {
        0 => return None,
        1 => &bars[0],
        n => &bars[n - 2],
    };
    Some(PivotPoints::from_bar(prior))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingKind {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    /// Index into the slice passed to [`swing_points`].
    pub index: usize,
    pub price: f64,
    pub kind: SwingKind,
}

/// Fractal swing highs and lows: a bar whose high (low) is strictly beyond
/// the `wing` bars before it and not exceeded by the `wing` bars after it.
/// Ordered by index.
pub fn swing_points(bars: &[Bar], wing: usize) -> Vec<SwingPoint> {
    let n = bars.len();
    let mut points = Vec::new();
    if wing == 0 || n < 2 * wing + 1 {
        return points;
    }

    for i in wing..(n - wing) {
        let (mut is_high, mut is_low) = (true, true);
        for b in &bars[i - wing..i] {
            is_high &= bars[i].high > b.high;
            is_low &= bars[i].low < b.low;
        }
        // A plateau registers once, on its first bar.
        for b in &bars[i + 1..=i + wing] {
            is_high &= bars[i].high >= b.high;
            is_low &= bars[i].low <= b.low;
        }

        if is_high {
            points.push(SwingPoint {
                index: i,
                price: bars[i].high,
                kind: SwingKind::High,
            });
        }
        if is_low {
            points.push(SwingPoint {
                index: i,
                price: bars[i].low,
                kind: SwingKind::Low,
            });
        }
    }

    points
}

/// Candidate support and resistance levels around a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    /// Levels strictly below price, nearest first.
    pub supports: Vec<f64>,
    /// Levels strictly above price, nearest first.
    pub resistances: Vec<f64>,
}

impl KeyLevels {
    pub fn nearest_support(&self) -> Option<f64> {
        self.supports.first().copied()
    }

    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistances.first().copied()
    }
}

/// Swing, Fibonacci and pivot levels split around `price`.
pub fn key_levels(bars: &[Bar], price: f64) -> KeyLevels {
    let swing_window = tail(bars, SWING_LOOKBACK);
    let mut candidates: Vec<f64> = swing_points(swing_window, SWING_WING)
        .iter()
        .map(|p| p.price)
        .collect();
    if let Some(fib) = fibonacci(bars, FIB_LOOKBACK) {
        candidates.extend(fib.prices());
    }
    if let Some(pivots) = pivot_points(bars) {
        candidates.extend(pivots.prices());
    }
    candidates.retain(|v| v.is_finite() && *v > 0.0);

    let mut supports: Vec<f64> = candidates.iter().copied().filter(|&v| v < price).collect();
    let mut resistances: Vec<f64> = candidates.iter().copied().filter(|&v| v > price).collect();
    supports.sort_by(|a, b| b.total_cmp(a));
    supports.dedup();
    resistances.sort_by(f64::total_cmp);
    resistances.dedup();

    KeyLevels {
        supports,
        resistances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn fibonacci_uptrend_retraces_from_high() {
        let closes: Vec<f64> = (0..=10).map(|i| 100.0 + i as f64 * 10.0).collect();
        let fib = fibonacci(&make_bars(&closes), 50).unwrap();
        // low = 99 (first bar), high = 201 (last bar)
        assert!(fib.uptrend);
        assert_approx(fib.swing_low, 99.0, DEFAULT_EPSILON);
        assert_approx(fib.swing_high, 201.0, DEFAULT_EPSILON);
        assert_approx(fib.retracements[2].price, 150.0, DEFAULT_EPSILON);
        assert_approx(fib.extensions[0].price, 99.0 + 102.0 * 1.272, 1e-9);
    }

    #[test]
    fn fibonacci_downtrend_retraces_from_low() {
        let closes: Vec<f64> = (0..=10).map(|i| 200.0 - i as f64 * 10.0).collect();
        let fib = fibonacci(&make_bars(&closes), 50).unwrap();
        assert!(!fib.uptrend);
        assert!(fib.retracements[0].price < fib.retracements[4].price);
        assert!(fib.extensions[1].price < fib.swing_low);
    }

    #[test]
    fn fibonacci_needs_a_range() {
        assert!(fibonacci(&[], 50).is_none());
    }

    #[test]
    fn classic_pivots() {
        let bars = make_bars(&[100.0, 110.0, 105.0]);
        // prior bar: open 100, close 110, high 111, low 99
        let p = pivot_points(&bars).unwrap();
        let pivot = (111.0 + 99.0 + 110.0) / 3.0;
        assert_approx(p.pivot, pivot, DEFAULT_EPSILON);
        assert_approx(p.r1, 2.0 * pivot - 99.0, DEFAULT_EPSILON);
        assert_approx(p.s1, 2.0 * pivot - 111.0, DEFAULT_EPSILON);
        assert_approx(p.r2, pivot + 12.0, DEFAULT_EPSILON);
        assert_approx(p.s3, 99.0 - 2.0 * (111.0 - pivot), DEFAULT_EPSILON);
        assert!(p.s3 < p.s2 && p.s2 < p.s1 && p.s1 < p.pivot);
        assert!(p.pivot < p.r1 && p.r1 < p.r2 && p.r2 < p.r3);
    }

    #[test]
    fn swing_points_find_fractals() {
        let closes = [100.0, 102.0, 106.0, 103.0, 101.0, 97.0, 99.0, 102.0, 104.0];
        let points = swing_points(&make_bars(&closes), 2);
        assert!(points
            .iter()
            .any(|p| p.kind == SwingKind::High && p.index == 2 && p.price == 107.0));
        assert!(points
            .iter()
            .any(|p| p.kind == SwingKind::Low && p.index == 5 && p.price == 96.0));
    }

    #[test]
    fn key_levels_split_around_price() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + 8.0 * ((i as f64) * 0.4).sin())
            .collect();
        let bars = make_bars(&closes);
        let levels = key_levels(&bars, 100.0);
        assert!(levels.supports.iter().all(|&s| s < 100.0));
        assert!(levels.resistances.iter().all(|&r| r > 100.0));
        let support = levels.nearest_support().unwrap();
        assert!(levels.supports.iter().all(|&s| s <= support));
        let resistance = levels.nearest_resistance().unwrap();
        assert!(levels.resistances.iter().all(|&r| r >= resistance));
    }
}

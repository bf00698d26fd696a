//! Chart patterns: double tops/bottoms, flags, triangles and breakouts.

use super::{PatternDetector, PatternKind, PatternMatch};
use crate::domain::{Bar, Direction};
use crate::indicators::{mean, swing_points, tail, SwingKind};
use crate::regression::fit_line;

// ─── Double bottom / double top ──────────────────────────────────────

/// Bars searched for the two extremes.
const DOUBLE_WINDOW: usize = 40;
/// Minimum bars between the two extremes.
const DOUBLE_MIN_SEPARATION: usize = 5;
/// Maximum relative difference between the two extremes.
const DOUBLE_TOLERANCE: f64 = 0.03;
/// Move away from the extremes that confirms the pattern.
const DOUBLE_CONFIRMATION: f64 = 0.05;

/// Two comparable fractal lows (bottom) or highs (top) with price moved
/// decisively away since the second one.
#[derive(Debug, Clone)]
pub struct DoubleExtreme {
    direction: Direction,
}

impl DoubleExtreme {
    pub fn bottom() -> Self {
        Self {
            direction: Direction::Bullish,
        }
    }

    pub fn top() -> Self {
        Self {
            direction: Direction::Bearish,
        }
    }
}

impl PatternDetector for DoubleExtreme {
    fn name(&self) -> &str {
        match self.direction {
            Direction::Bearish => "double_top",
            _ => "double_bottom",
        }
    }

    fn min_bars(&self) -> usize {
        2 * DOUBLE_MIN_SEPARATION + 5
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let bullish = self.direction == Direction::Bullish;
        let wanted = if bullish { SwingKind::Low } else { SwingKind::High };
        let window = tail(bars, DOUBLE_WINDOW);
        let last_close = window.last()?.close;

        let extremes: Vec<_> = swing_points(window, 2)
            .into_iter()
            .filter(|p| p.kind == wanted)
            .collect();

        // Most recent qualifying pair wins.
        for (j, second) in extremes.iter().enumerate().rev() {
            for first in extremes[..j].iter().rev() {
                if second.index - first.index < DOUBLE_MIN_SEPARATION {
                    continue;
                }
                let reference = first.price.min(second.price);
                if reference <= 0.0 {
                    continue;
                }
                if (first.price - second.price).abs() / reference > DOUBLE_TOLERANCE {
                    continue;
                }

                let confirmed = if bullish {
                    last_close >= first.price.max(second.price) * (1.0 + DOUBLE_CONFIRMATION)
                } else {
                    last_close <= first.price.min(second.price) * (1.0 - DOUBLE_CONFIRMATION)
                };
                if !confirmed {
                    continue;
                }

                let (name, target) = if bullish {
                    ("Double Bottom", 1.05)
                } else {
                    ("Double Top", 0.95)
                };
                return Some(PatternMatch::new(
                    name,
                    self.direction,
                    70.0,
                    target,
                    PatternKind::Chart,
                ));
            }
        }

        None
    }
}

// ─── Flags ───────────────────────────────────────────────────────────

const FLAG_BARS: usize = 10;
const POLE_BARS: usize = 30;
/// Minimum pole move as a fraction of the pole's starting close.
const POLE_MIN_MOVE: f64 = 0.08;
/// Maximum flag range as a fraction of the pole height.
const FLAG_MAX_RANGE: f64 = 0.4;
/// Maximum with-trend drift of the flag, as a fraction of price per bar.
const FLAG_MAX_DRIFT: f64 = 0.001;
const FLAG_VOLUME_SURGE: f64 = 1.5;

/// A strong pole followed by a tight, flat or counter-trend consolidation.
#[derive(Debug, Clone)]
pub struct Flag {
    direction: Direction,
}

impl Flag {
    pub fn bullish() -> Self {
        Self {
            direction: Direction::Bullish,
        }
    }

    pub fn bearish() -> Self {
        Self {
            direction: Direction::Bearish,
        }
    }
}

impl PatternDetector for Flag {
    fn name(&self) -> &str {
        match self.direction {
            Direction::Bearish => "bearish_flag",
            _ => "bullish_flag",
        }
    }

    fn min_bars(&self) -> usize {
        FLAG_BARS + POLE_BARS
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let n = bars.len();
        if n < self.min_bars() {
            return None;
        }
        let bullish = self.direction == Direction::Bullish;
        let pole = &bars[n - FLAG_BARS - POLE_BARS..n - FLAG_BARS];
        let flag = &bars[n - FLAG_BARS..];

        let pole_start = pole.first()?.close;
        let pole_end = pole.last()?.close;
        if pole_start <= 0.0 || pole_end <= 0.0 {
            return None;
        }
        let pole_move = (pole_end - pole_start) / pole_start;
        let pole_ok = if bullish {
            pole_move >= POLE_MIN_MOVE
        } else {
            pole_move <= -POLE_MIN_MOVE
        };
        if !pole_ok {
            return None;
        }

        let flag_high = flag.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let flag_low = flag.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        if flag_high - flag_low > FLAG_MAX_RANGE * (pole_end - pole_start).abs() {
            return None;
        }

        let flag_closes: Vec<f64> = flag.iter().map(|b| b.close).collect();
        let drift = fit_line(&flag_closes).slope / pole_end;
        let drift_ok = if bullish {
            drift <= FLAG_MAX_DRIFT
        } else {
            drift >= -FLAG_MAX_DRIFT
        };
        if !drift_ok {
            return None;
        }

        let volumes: Vec<f64> = flag.iter().map(|b| b.volume).collect();
        let (early, late) = volumes.split_at(FLAG_BARS / 2);
        let early_avg = mean(early);
        let surge = early_avg > 0.0 && mean(late) >= FLAG_VOLUME_SURGE * early_avg;
        let confidence = if surge { 78.0 } else { 70.0 };

        let (name, target) = if bullish {
            ("Bullish Flag", 1.0 + pole_move.abs() / 2.0)
        } else {
            ("Bearish Flag", 1.0 - pole_move.abs() / 2.0)
        };
        Some(PatternMatch::new(
            name,
            self.direction,
            confidence,
            target,
            PatternKind::Chart,
        ))
    }
}

// ─── Triangles ───────────────────────────────────────────────────────

const TRIANGLE_BARS: usize = 20;
/// Slope magnitude (fraction of mean price per bar) treated as flat.
const TRIANGLE_FLAT: f64 = 0.0005;

/// Ascending, descending or symmetrical triangle from fitted highs and lows.
#[derive(Debug, Clone, Copy)]
pub struct Triangle;

impl PatternDetector for Triangle {
    fn name(&self) -> &str {
        "triangle"
    }

    fn min_bars(&self) -> usize {
        TRIANGLE_BARS
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        if bars.len() < TRIANGLE_BARS {
            return None;
        }
        let window = tail(bars, TRIANGLE_BARS);
        let highs: Vec<f64> = window.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = window.iter().map(|b| b.low).collect();
        let closes: Vec<f64> = window.iter().map(|b| b.close).collect();
        let price = mean(&closes);
        if price <= 0.0 {
            return None;
        }

        let high_slope = fit_line(&highs).slope / price;
        let low_slope = fit_line(&lows).slope / price;

        let flat = |s: f64| s.abs() <= TRIANGLE_FLAT;
        let rising = |s: f64| s > TRIANGLE_FLAT;
        let falling = |s: f64| s < -TRIANGLE_FLAT;

        let (name, class, confidence, target) = if flat(high_slope) && rising(low_slope) {
            ("Ascending Triangle", Direction::Bullish, 65.0, 1.04)
        } else if flat(low_slope) && falling(high_slope) {
            ("Descending Triangle", Direction::Bearish, 65.0, 0.96)
        } else if falling(high_slope) && rising(low_slope) {
            ("Symmetrical Triangle", Direction::Neutral, 55.0, 1.0)
        } else {
            return None;
        };

        Some(PatternMatch::new(
            name,
            class,
            confidence,
            target,
            PatternKind::Chart,
        ))
    }
}

// ─── Breakouts ───────────────────────────────────────────────────────

const BREAKOUT_LOOKBACK: usize = 20;
const BREAKOUT_VOLUME: f64 = 1.5;

/// Close beyond the prior range extreme on expanded volume.
#[derive(Debug, Clone)]
pub struct Breakout {
    direction: Direction,
}

impl Breakout {
    pub fn up() -> Self {
        Self {
            direction: Direction::Bullish,
        }
    }

    pub fn down() -> Self {
        Self {
            direction: Direction::Bearish,
        }
    }
}

impl PatternDetector for Breakout {
    fn name(&self) -> &str {
        match self.direction {
            Direction::Bearish => "breakdown",
            _ => "breakout",
        }
    }

    fn min_bars(&self) -> usize {
        BREAKOUT_LOOKBACK + 1
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let (last, history) = bars.split_last()?;
        if history.len() < BREAKOUT_LOOKBACK {
            return None;
        }
        let prior = tail(history, BREAKOUT_LOOKBACK);

        let volumes: Vec<f64> = prior.iter().map(|b| b.volume).collect();
        let avg_volume = mean(&volumes);
        if avg_volume <= 0.0 || last.volume < BREAKOUT_VOLUME * avg_volume {
            return None;
        }

        let bullish = self.direction == Direction::Bullish;
        let fired = if bullish {
            let prior_high = prior.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            last.close > prior_high
        } else {
            let prior_low = prior.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            last.close < prior_low
        };
        if !fired {
            return None;
        }

        let (name, target) = if bullish {
            ("Breakout", 1.05)
        } else {
            ("Breakdown", 0.95)
        };
        Some(PatternMatch::new(
            name,
            self.direction,
            75.0,
            target,
            PatternKind::Chart,
        ))
    }
}

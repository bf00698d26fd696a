//! Pattern detection: chart and candlestick patterns over trailing bars.
//!
//! Each detector is an independent predicate over the bar history: it reads
//! only the trailing window it needs and returns at most one match. Detectors
//! never see indicator state or each other's output. Several may fire on the
//! same history; all matches go to the scorer.

pub mod candlestick;
pub mod chart;

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Direction};

pub use candlestick::{Doji, Engulfing, Hammer, ShootingStar, StarReversal, ThreeCandles};
pub use chart::{Breakout, DoubleExtreme, Flag, Triangle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternStrength {
    Weak,
    Moderate,
    Strong,
}

impl PatternStrength {
    /// Strong ≥ 75, Moderate ≥ 65, otherwise Weak.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 75.0 {
            Self::Strong
        } else if confidence >= 65.0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Chart,
    Candlestick,
}

/// A detected pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub name: String,
    pub class: Direction,
    pub strength: PatternStrength,
    /// 0–100; detectors emit 55–80.
    pub confidence_weight: f64,
    /// Suggested target relative to the current price (1.05 = +5 %).
    pub suggested_target_multiplier: f64,
    pub kind: PatternKind,
}

impl PatternMatch {
    pub fn new(
        name: impl Into<String>,
        class: Direction,
        confidence_weight: f64,
        suggested_target_multiplier: f64,
        kind: PatternKind,
    ) -> Self {
        let confidence_weight = confidence_weight.clamp(0.0, 100.0);
        Self {
            name: name.into(),
            class,
            strength: PatternStrength::from_confidence(confidence_weight),
            confidence_weight,
            suggested_target_multiplier,
            kind,
        }
    }
}

/// Trait for pattern detectors.
///
/// # Look-ahead guard
/// `detect` reads the history up to and including the last bar only; the
/// match describes the market as of that bar.
pub trait PatternDetector: Send + Sync {
    /// Human-readable name (e.g., "double_bottom").
    fn name(&self) -> &str;

    /// Bars needed before the detector can fire.
    fn min_bars(&self) -> usize;

    /// Returns `Some(PatternMatch)` if the pattern is present at the last bar.
    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch>;
}

/// The standard detector set, in evaluation order: chart patterns first,
/// then candlesticks.
pub fn default_detectors() -> Vec<Box<dyn PatternDetector>> {
    vec![
        Box::new(DoubleExtreme::bottom()),
        Box::new(DoubleExtreme::top()),
        Box::new(Flag::bullish()),
        Box::new(Flag::bearish()),
        Box::new(Triangle),
        Box::new(Breakout::up()),
        Box::new(Breakout::down()),
        Box::new(Hammer),
        Box::new(ShootingStar),
        Box::new(Doji),
        Box::new(Engulfing),
        Box::new(StarReversal),
        Box::new(ThreeCandles),
    ]
}

/// Run every standard detector; matches come back in detector order.
pub fn detect_all(bars: &[Bar]) -> Vec<PatternMatch> {
    run_detectors(&default_detectors(), bars)
}

/// Run the given detectors, skipping those without enough history.
pub fn run_detectors(detectors: &[Box<dyn PatternDetector>], bars: &[Bar]) -> Vec<PatternMatch> {
    detectors
        .iter()
        .filter(|d| bars.len() >= d.min_bars())
        .filter_map(|d| d.detect(bars))
        .collect()
}

/// Bars built from explicit OHLC tuples, one day apart, volume 1000.
#[cfg(test)]
pub(crate) fn ohlc_bars(rows: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    rows.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            Bar::new(
                base + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                1000.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn strength_from_confidence() {
        assert_eq!(PatternStrength::from_confidence(55.0), PatternStrength::Weak);
        assert_eq!(PatternStrength::from_confidence(70.0), PatternStrength::Moderate);
        assert_eq!(PatternStrength::from_confidence(78.0), PatternStrength::Strong);
    }

    #[test]
    fn detectors_have_unique_names() {
        let detectors = default_detectors();
        let mut names: Vec<&str> = detectors.iter().map(|d| d.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), detectors.len());
    }

    #[test]
    fn detect_all_on_tiny_history_is_empty_or_candles_only() {
        let bars = make_bars(&[100.0, 101.0]);
        assert!(detect_all(&bars)
            .iter()
            .all(|m| m.kind == PatternKind::Candlestick));
        assert!(detect_all(&[]).is_empty());
    }

    #[test]
    fn detect_all_is_deterministic() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + 6.0 * ((i as f64) * 0.3).sin())
            .collect();
        let bars = make_bars(&closes);
        assert_eq!(detect_all(&bars), detect_all(&bars));
    }
}

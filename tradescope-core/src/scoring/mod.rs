//! Composite scoring: fuse indicator readings, patterns and the regression
//! projection into one directional call with a 0–100 score.
//!
//! Every source is evaluated in the fixed order of [`SignalSource::ALL`] and
//! emits at most a handful of [`ContributingSignal`]s. Weights come from the
//! active profile; the scorer holds no state of its own.

pub mod composite;
pub mod trend;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Direction;

pub use composite::{composite_signal, NEUTRAL_BAND, SCORE_CEILING, SCORE_FLOOR};
pub use trend::TrendAlignment;

/// Signal sources, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Macd,
    MaAlignment,
    Trend,
    EmaCross,
    Regression,
    Adx,
    Rsi,
    Stochastic,
    Williams,
    Vwap,
    Bollinger,
    Patterns,
    Volume,
}

impl SignalSource {
    pub const ALL: [SignalSource; 13] = [
        Self::Macd,
        Self::MaAlignment,
        Self::Trend,
        Self::EmaCross,
        Self::Regression,
        Self::Adx,
        Self::Rsi,
        Self::Stochastic,
        Self::Williams,
        Self::Vwap,
        Self::Bollinger,
        Self::Patterns,
        Self::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Macd => "macd",
            Self::MaAlignment => "ma_alignment",
            Self::Trend => "trend",
            Self::EmaCross => "ema_cross",
            Self::Regression => "regression",
            Self::Adx => "adx",
            Self::Rsi => "rsi",
            Self::Stochastic => "stochastic",
            Self::Williams => "williams",
            Self::Vwap => "vwap",
            Self::Bollinger => "bollinger",
            Self::Patterns => "patterns",
            Self::Volume => "volume",
        }
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of evidence. Informational entries carry weight 0 and
/// direction Neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingSignal {
    pub source: SignalSource,
    pub label: String,
    pub direction: Direction,
    pub weight: f64,
}

/// Output of the composite scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSignal {
    pub symbol: String,
    pub profile_id: String,
    pub direction: Direction,
    /// Dominant side's points, clamped to 30..=95.
    pub score: f64,
    pub bullish_score: f64,
    pub bearish_score: f64,
    /// Distinct sources agreeing with `direction`; 0 when neutral.
    pub alignment_count: usize,
    /// |bullish − bearish|.
    pub conviction: f64,
    pub contributing_signals: Vec<ContributingSignal>,
}

impl CompositeSignal {
    /// Contributions pointing the same way as the call.
    pub fn supporting(&self) -> impl Iterator<Item = &ContributingSignal> {
        self.contributing_signals
            .iter()
            .filter(move |c| c.direction == self.direction && c.weight > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_order_and_names_are_stable() {
        assert_eq!(SignalSource::ALL.first(), Some(&SignalSource::Macd));
        assert_eq!(SignalSource::ALL.last(), Some(&SignalSource::Volume));
        let mut sorted = SignalSource::ALL;
        sorted.sort();
        assert_eq!(sorted, SignalSource::ALL);
        assert_eq!(SignalSource::MaAlignment.to_string(), "ma_alignment");
    }

    #[test]
    fn source_serializes_snake_case() {
        let json = serde_json::to_string(&SignalSource::EmaCross).unwrap();
        assert_eq!(json, "\"ema_cross\"");
    }
}

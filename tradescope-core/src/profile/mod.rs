//! Strategy profiles: typed, validated parameter sets per trading horizon.
//!
//! Profiles are loaded once (from the embedded `profiles.toml` or a user
//! file), validated at load time and never mutated afterwards. Unknown or
//! missing fields are rejected by the deserializer.

pub mod registry;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::regression::ConfidenceLevel;
use crate::scoring::SignalSource;

pub use registry::StrategyRegistry;

/// Errors raised while loading or looking up strategy profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to parse profile TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("profile '{id}' is invalid: {reason}")]
    Invalid { id: String, reason: String },

    #[error("duplicate profile id '{0}'")]
    Duplicate(String),

    #[error("unknown strategy profile '{id}' (known: {})", .known.join(", "))]
    UnknownProfile { id: String, known: Vec<String> },

    #[error("failed to read profile file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Points each signal source contributes at full strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightTable {
    pub macd: f64,
    pub ma_alignment: f64,
    pub trend: f64,
    pub ema_cross: f64,
    pub regression: f64,
    pub adx: f64,
    pub rsi: f64,
    pub stochastic: f64,
    pub williams: f64,
    pub vwap: f64,
    pub bollinger: f64,
    pub patterns: f64,
    pub volume: f64,
}

impl WeightTable {
    pub fn weight(&self, source: SignalSource) -> f64 {
        match source {
            SignalSource::Macd => self.macd,
            SignalSource::MaAlignment => self.ma_alignment,
            SignalSource::Trend => self.trend,
            SignalSource::EmaCross => self.ema_cross,
            SignalSource::Regression => self.regression,
            SignalSource::Adx => self.adx,
            SignalSource::Rsi => self.rsi,
            SignalSource::Stochastic => self.stochastic,
            SignalSource::Williams => self.williams,
            SignalSource::Vwap => self.vwap,
            SignalSource::Bollinger => self.bollinger,
            SignalSource::Patterns => self.patterns,
            SignalSource::Volume => self.volume,
        }
    }
}

/// A named, immutable parameter set for one trading horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyProfile {
    pub id: String,
    /// Bar timeframe label, e.g. "1d".
    pub timeframe: String,
    /// Expected holding period label, e.g. "3-10 days".
    pub holding_period: String,
    pub min_risk_reward: f64,
    pub stop_loss_percent: f64,
    pub target_percent: f64,
    /// Minimum composite score (0–100) for acceptance.
    pub min_confidence: f64,
    /// Minimum number of sources agreeing with the signal direction.
    pub min_indicator_align: usize,
    /// Maximum ATR as a percent of price.
    pub max_volatility_percent: f64,
    pub atr_multiplier: f64,
    pub regression_length: usize,
    pub prediction_bars: usize,
    pub confidence_level: ConfidenceLevel,
    pub weights: WeightTable,
}

impl StrategyProfile {
    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let invalid = |reason: String| ProfileError::Invalid {
            id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".into()));
        }

        let positive = [
            ("min_risk_reward", self.min_risk_reward),
            ("stop_loss_percent", self.stop_loss_percent),
            ("target_percent", self.target_percent),
            ("max_volatility_percent", self.max_volatility_percent),
            ("atr_multiplier", self.atr_multiplier),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{field} must be positive, got {value}")));
            }
        }

        if self.stop_loss_percent >= 100.0 {
            return Err(invalid(format!(
                "stop_loss_percent must be below 100, got {}",
                self.stop_loss_percent
            )));
        }
        if self.target_percent >= 100.0 {
            return Err(invalid(format!(
                "target_percent must be below 100, got {}",
                self.target_percent
            )));
        }
        // A bearish target extended to the minimum R:R sits at
        // entry × (1 − stop% × R:R / 100), which must stay above zero.
        if self.stop_loss_percent * self.min_risk_reward >= 100.0 {
            return Err(invalid(format!(
                "stop_loss_percent {} × min_risk_reward {} must be below 100",
                self.stop_loss_percent, self.min_risk_reward
            )));
        }
        if !(0.0..=100.0).contains(&self.min_confidence) {
            return Err(invalid(format!(
                "min_confidence must be within 0..=100, got {}",
                self.min_confidence
            )));
        }
        if self.min_indicator_align > SignalSource::ALL.len() {
            return Err(invalid(format!(
                "min_indicator_align {} exceeds the {} signal sources",
                self.min_indicator_align,
                SignalSource::ALL.len()
            )));
        }
        if self.regression_length < 3 {
            return Err(invalid(format!(
                "regression_length must be at least 3, got {}",
                self.regression_length
            )));
        }
        if self.prediction_bars == 0 {
            return Err(invalid("prediction_bars must be at least 1".into()));
        }

        for source in SignalSource::ALL {
            let w = self.weights.weight(source);
            if !w.is_finite() || w < 0.0 {
                return Err(invalid(format!(
                    "weight for {} must be finite and non-negative, got {w}",
                    source.as_str()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_profile() -> StrategyProfile {
    StrategyProfile {
        id: "test".into(),
        timeframe: "1d".into(),
        holding_period: "days".into(),
        min_risk_reward: 2.0,
        stop_loss_percent: 5.0,
        target_percent: 10.0,
        min_confidence: 70.0,
        min_indicator_align: 4,
        max_volatility_percent: 6.0,
        atr_multiplier: 2.0,
        regression_length: 50,
        prediction_bars: 10,
        confidence_level: ConfidenceLevel::P95,
        weights: WeightTable {
            macd: 15.0,
            ma_alignment: 15.0,
            trend: 12.0,
            ema_cross: 8.0,
            regression: 10.0,
            adx: 8.0,
            rsi: 10.0,
            stochastic: 8.0,
            williams: 6.0,
            vwap: 8.0,
            bollinger: 6.0,
            patterns: 15.0,
            volume: 10.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_profile_passes() {
        assert!(test_profile().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_percentages() {
        let mut p = test_profile();
        p.stop_loss_percent = 0.0;
        let err = p.validate().unwrap_err();
        assert!(matches!(err, ProfileError::Invalid { ref id, .. } if id == "test"));
        assert!(err.to_string().contains("stop_loss_percent"));
    }

    #[test]
    fn rejects_stops_whose_bearish_target_reaches_zero() {
        let mut p = test_profile();
        p.stop_loss_percent = 60.0;
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("min_risk_reward"));

        // 49 × 2.0 = 98: still a positive target
        p.stop_loss_percent = 49.0;
        assert!(p.validate().is_ok());

        let mut p = test_profile();
        p.target_percent = 100.0;
        assert!(p.validate().unwrap_err().to_string().contains("target_percent"));
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let mut p = test_profile();
        p.min_confidence = 120.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_short_regression() {
        let mut p = test_profile();
        p.regression_length = 2;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_negative_weight() {
        let mut p = test_profile();
        p.weights.vwap = -1.0;
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("vwap"));
    }

    #[test]
    fn weight_lookup_covers_every_source() {
        let w = test_profile().weights;
        assert_eq!(w.weight(SignalSource::Macd), 15.0);
        assert_eq!(w.weight(SignalSource::Volume), 10.0);
        let total: f64 = SignalSource::ALL.iter().map(|s| w.weight(*s)).sum();
        assert_eq!(total, 131.0);
    }
}

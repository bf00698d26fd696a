//! Quality gate: accept or reject a scored signal with explicit reasons.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Direction;
use crate::profile::StrategyProfile;
use crate::scoring::CompositeSignal;
use crate::setup::TradeSetup;

/// Slack for R:R comparisons; extended targets land exactly on the minimum.
const RATIO_EPSILON: f64 = 1e-9;

/// One failed acceptance condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NoDirection,
    LowConfidence { score: f64, min: f64 },
    NoTradeSetup,
    PoorRiskReward { ratio: f64, min: f64 },
    LowAlignment { count: usize, min: usize },
    HighVolatility { atr_percent: f64, max: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDirection => write!(f, "no clear direction"),
            Self::LowConfidence { score, min } => {
                write!(f, "low confidence: score {score:.1} < {min:.1}")
            }
            Self::NoTradeSetup => write!(f, "no trade setup"),
            Self::PoorRiskReward { ratio, min } => {
                write!(f, "poor risk/reward: {ratio:.2} < {min:.2}")
            }
            Self::LowAlignment { count, min } => {
                write!(f, "low alignment: {count} sources < {min}")
            }
            Self::HighVolatility { atr_percent, max } => {
                write!(f, "high volatility: ATR {atr_percent:.2}% > {max:.2}%")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub accepted: bool,
    pub signal: CompositeSignal,
    pub trade_setup: Option<TradeSetup>,
    pub skip_reasons: Vec<SkipReason>,
    /// All reasons joined with "; ", `None` when accepted.
    pub skip_reason: Option<String>,
}

impl GateResult {
    pub fn score(&self) -> f64 {
        self.signal.score
    }

    pub fn risk_reward(&self) -> f64 {
        self.trade_setup
            .as_ref()
            .map_or(0.0, |s| s.risk_reward_ratio)
    }
}

/// Evaluate every acceptance condition; all failures are reported.
///
/// Volatility is read from the setup's ATR, so a missing setup skips that
/// check (the signal is already rejected for lacking one).
pub fn evaluate(
    signal: CompositeSignal,
    trade_setup: Option<TradeSetup>,
    profile: &StrategyProfile,
) -> GateResult {
    let mut reasons = Vec::new();

    if signal.direction == Direction::Neutral {
        reasons.push(SkipReason::NoDirection);
    }
    if signal.score < profile.min_confidence {
        reasons.push(SkipReason::LowConfidence {
            score: signal.score,
            min: profile.min_confidence,
        });
    }
    match &trade_setup {
        None if signal.direction.is_actionable() => reasons.push(SkipReason::NoTradeSetup),
        Some(setup) if setup.risk_reward_ratio + RATIO_EPSILON < profile.min_risk_reward => {
            reasons.push(SkipReason::PoorRiskReward {
                ratio: setup.risk_reward_ratio,
                min: profile.min_risk_reward,
            })
        }
        _ => {}
    }
    if signal.alignment_count < profile.min_indicator_align {
        reasons.push(SkipReason::LowAlignment {
            count: signal.alignment_count,
            min: profile.min_indicator_align,
        });
    }
    if let Some(atr_percent) = trade_setup.as_ref().map(TradeSetup::atr_percent) {
        if atr_percent > profile.max_volatility_percent {
            reasons.push(SkipReason::HighVolatility {
                atr_percent,
                max: profile.max_volatility_percent,
            });
        }
    }

    let skip_reason = (!reasons.is_empty()).then(|| {
        reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    });

    GateResult {
        accepted: reasons.is_empty(),
        signal,
        trade_setup,
        skip_reasons: reasons,
        skip_reason,
    }
}

/// Accepted first (score desc, R:R desc, symbol asc), then rejected by score desc.
pub fn rank_results(results: &mut [GateResult]) {
    results.sort_by(compare_results);
}

/// Ranking order used by [`rank_results`].
pub fn compare_results(a: &GateResult, b: &GateResult) -> Ordering {
    b.accepted
        .cmp(&a.accepted)
        .then_with(|| b.score().total_cmp(&a.score()))
        .then_with(|| {
            if a.accepted {
                b.risk_reward().total_cmp(&a.risk_reward())
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.signal.symbol.cmp(&b.signal.symbol))
}

//! Trade setup: entry, stop, target and size for a directional signal.
//!
//! Sizing is fixed-fractional: a position loses at most
//! `max_risk_percent` of capital if the stop is hit.

use serde::{Deserialize, Serialize};

use crate::domain::Direction;
use crate::profile::StrategyProfile;

/// Stop buffer beyond a support/resistance level (0.5 %).
const LEVEL_BUFFER: f64 = 0.005;

/// Capital and per-trade risk for sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBudget {
    pub capital: f64,
    pub max_risk_percent: f64,
}

impl Default for RiskBudget {
    fn default() -> Self {
        Self {
            capital: 100_000.0,
            max_risk_percent: 2.0,
        }
    }
}

impl RiskBudget {
    pub fn risk_amount(&self) -> f64 {
        self.capital * self.max_risk_percent / 100.0
    }

    pub fn is_valid(&self) -> bool {
        self.capital.is_finite()
            && self.capital > 0.0
            && self.max_risk_percent.is_finite()
            && self.max_risk_percent > 0.0
            && self.max_risk_percent <= 100.0
    }
}

/// Everything the calculator reads besides the profile and budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupInputs {
    pub direction: Direction,
    pub entry: f64,
    pub atr: f64,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub projected_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub direction: Direction,
    pub entry: f64,
    pub target: f64,
    pub stop_loss: f64,
    pub risk_per_unit: f64,
    pub reward_per_unit: f64,
    pub risk_reward_ratio: f64,
    pub position_size: u64,
    pub capital_at_risk_percent: f64,
    pub atr: f64,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    /// Target pushed out to meet the profile's minimum R:R.
    pub target_extended: bool,
}

impl TradeSetup {
    /// ATR as a percent of entry.
    pub fn atr_percent(&self) -> f64 {
        if self.entry > 0.0 {
            self.atr / self.entry * 100.0
        } else {
            0.0
        }
    }

    /// Stop and target on the correct sides of entry.
    pub fn is_ordered(&self) -> bool {
        match self.direction {
            Direction::Bullish => self.stop_loss < self.entry && self.entry < self.target,
            Direction::Bearish => self.target < self.entry && self.entry < self.stop_loss,
            Direction::Neutral => false,
        }
    }
}

/// Build a setup for `inputs`; `None` for a neutral call, an invalid entry
/// or budget, a degenerate (zero) risk, or a target at or below zero.
pub fn build_setup(
    inputs: &SetupInputs,
    profile: &StrategyProfile,
    budget: &RiskBudget,
) -> Option<TradeSetup> {
    let entry = inputs.entry;
    if !entry.is_finite() || entry <= 0.0 || !budget.is_valid() {
        return None;
    }
    let min_rr = profile.min_risk_reward;
    let stop_fraction = profile.stop_loss_percent / 100.0;
    let target_fraction = profile.target_percent / 100.0;
    let atr_offset = profile.atr_multiplier * inputs.atr;
    let has_atr = inputs.atr.is_finite() && inputs.atr > 0.0;

    let (stop_loss, target) = match inputs.direction {
        Direction::Neutral => return None,
        Direction::Bullish => {
            let mut stops = Vec::with_capacity(2);
            if has_atr {
                stops.push(entry - atr_offset);
            }
            if let Some(support) = inputs.support.filter(|&s| s < entry) {
                stops.push(support * (1.0 - LEVEL_BUFFER));
            }
            let floor = entry * (1.0 - stop_fraction);
            let stop = stops.into_iter().reduce(f64::min).map_or(floor, |s| s.max(floor));

            let risk = entry - stop;
            let mut targets = vec![entry + min_rr * risk];
            targets.extend(inputs.resistance.filter(|&r| r > entry));
            if inputs.projected_price > entry {
                targets.push(inputs.projected_price);
            }
            let best = targets.into_iter().fold(f64::NEG_INFINITY, f64::max);
            (stop, best.min(entry * (1.0 + target_fraction)))
        }
        Direction::Bearish => {
            let mut stops = Vec::with_capacity(2);
            if has_atr {
                stops.push(entry + atr_offset);
            }
            if let Some(resistance) = inputs.resistance.filter(|&r| r > entry) {
                stops.push(resistance * (1.0 + LEVEL_BUFFER));
            }
            let ceiling = entry * (1.0 + stop_fraction);
            let stop = stops
                .into_iter()
                .reduce(f64::max)
                .map_or(ceiling, |s| s.min(ceiling));

            let risk = stop - entry;
            let mut targets = vec![entry - min_rr * risk];
            targets.extend(inputs.support.filter(|&s| s < entry));
            if inputs.projected_price < entry {
                targets.push(inputs.projected_price);
            }
            let best = targets.into_iter().fold(f64::INFINITY, f64::min);
            (stop, best.max(entry * (1.0 - target_fraction)))
        }
    };

    let risk_per_unit = (entry - stop_loss).abs();
    if !risk_per_unit.is_finite() || risk_per_unit <= 0.0 {
        return None;
    }

    let mut target = target;
    let mut reward_per_unit = (target - entry).abs();
    let mut target_extended = false;
    if reward_per_unit / risk_per_unit < min_rr {
        reward_per_unit = min_rr * risk_per_unit;
        target = match inputs.direction {
            Direction::Bearish => entry - reward_per_unit,
            _ => entry + reward_per_unit,
        };
        target_extended = true;
    }
    if !target.is_finite() || target <= 0.0 {
        return None;
    }

    let position_size = ((budget.risk_amount() / risk_per_unit).floor() as u64).max(1);
    let capital_at_risk_percent = position_size as f64 * risk_per_unit / budget.capital * 100.0;

    Some(TradeSetup {
        direction: inputs.direction,
        entry,
        target,
        stop_loss,
        risk_per_unit,
        reward_per_unit,
        risk_reward_ratio: reward_per_unit / risk_per_unit,
        position_size,
        capital_at_risk_percent,
        atr: inputs.atr,
        support: inputs.support,
        resistance: inputs.resistance,
        target_extended,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use crate::profile::test_profile;

    fn inputs(direction: Direction) -> SetupInputs {
        SetupInputs {
            direction,
            entry: 100.0,
            atr: 2.0,
            support: Some(97.0),
            resistance: Some(104.0),
            projected_price: 100.0,
        }
    }

    #[test]
    fn bullish_stop_uses_lower_candidate() {
        // ATR stop 96, support stop 96.515 → 96; floor 95.
        let setup = build_setup(&inputs(Direction::Bullish), &test_profile(), &RiskBudget::default())
            .unwrap();
        assert_approx(setup.stop_loss, 96.0, DEFAULT_EPSILON);
        assert_approx(setup.risk_per_unit, 4.0, DEFAULT_EPSILON);
        // targets: 108, 104 → 108 (cap 110)
        assert_approx(setup.target, 108.0, DEFAULT_EPSILON);
        assert_approx(setup.risk_reward_ratio, 2.0, 1e-9);
        assert!(!setup.target_extended);
        assert!(setup.is_ordered());
        // 2000 / 4 = 500 units, exactly 2 %
        assert_eq!(setup.position_size, 500);
        assert_approx(setup.capital_at_risk_percent, 2.0, 1e-9);
    }

    #[test]
    fn bearish_target_below_zero_yields_no_setup() {
        // ceiling 160 → risk 60 → extended target 100 − 2 × 60 = −20
        let mut profile = test_profile();
        profile.stop_loss_percent = 60.0;
        let mut i = inputs(Direction::Bearish);
        i.atr = 40.0;
        i.support = None;
        i.resistance = None;
        assert!(build_setup(&i, &profile, &RiskBudget::default()).is_none());

        profile.stop_loss_percent = 40.0;
        let setup = build_setup(&i, &profile, &RiskBudget::default()).unwrap();
        assert_approx(setup.target, 20.0, 1e-9);
        assert!(setup.is_ordered());
    }

    #[test]
    fn bullish_stop_capped_at_stop_percent() {
        let mut i = inputs(Direction::Bullish);
        i.atr = 5.0;
        let setup = build_setup(&i, &test_profile(), &RiskBudget::default()).unwrap();
        assert_approx(setup.stop_loss, 95.0, DEFAULT_EPSILON);
    }

    #[test]
    fn target_capped_then_extended() {
        // Stop 95 (risk 5) → min R:R target 110 equals the cap; a tighter
        // target cap forces an extension beyond it.
        let mut profile = test_profile();
        profile.target_percent = 6.0;
        let mut i = inputs(Direction::Bullish);
        i.atr = 5.0;
        let setup = build_setup(&i, &profile, &RiskBudget::default()).unwrap();
        assert!(setup.target_extended);
        assert_approx(setup.target, 110.0, 1e-9);
        assert_approx(setup.risk_reward_ratio, 2.0, 1e-9);
        assert_approx(setup.stop_loss, 95.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bearish_mirrors_bullish() {
        let setup = build_setup(&inputs(Direction::Bearish), &test_profile(), &RiskBudget::default())
            .unwrap();
        // ATR stop 104, resistance stop 104.52 → 104.52
        assert_approx(setup.stop_loss, 104.52, 1e-9);
        assert!(setup.target < setup.entry);
        assert!(setup.is_ordered());
        assert!(setup.risk_reward_ratio >= 2.0 - 1e-9);
    }

    #[test]
    fn no_atr_and_no_levels_uses_percent_stop() {
        let i = SetupInputs {
            direction: Direction::Bullish,
            entry: 50.0,
            atr: 0.0,
            support: None,
            resistance: None,
            projected_price: 50.0,
        };
        let setup = build_setup(&i, &test_profile(), &RiskBudget::default()).unwrap();
        assert_approx(setup.stop_loss, 47.5, DEFAULT_EPSILON);
        assert_approx(setup.target, 55.0, 1e-9);
    }

    #[test]
    fn neutral_and_invalid_inputs_yield_none() {
        let budget = RiskBudget::default();
        assert!(build_setup(&inputs(Direction::Neutral), &test_profile(), &budget).is_none());

        let mut bad = inputs(Direction::Bullish);
        bad.entry = f64::NAN;
        assert!(build_setup(&bad, &test_profile(), &budget).is_none());

        let broke = RiskBudget {
            capital: 0.0,
            max_risk_percent: 2.0,
        };
        assert!(build_setup(&inputs(Direction::Bullish), &test_profile(), &broke).is_none());
    }

    #[test]
    fn risk_percent_is_bounded_by_capital() {
        let budget = |max_risk_percent| RiskBudget {
            capital: 10_000.0,
            max_risk_percent,
        };
        assert!(budget(100.0).is_valid());
        assert!(!budget(150.0).is_valid());
        assert!(!budget(0.0).is_valid());
        assert!(build_setup(&inputs(Direction::Bullish), &test_profile(), &budget(150.0)).is_none());
    }

    #[test]
    fn tiny_budget_still_sizes_one_unit() {
        let budget = RiskBudget {
            capital: 100.0,
            max_risk_percent: 1.0,
        };
        let setup = build_setup(&inputs(Direction::Bullish), &test_profile(), &budget).unwrap();
        assert_eq!(setup.position_size, 1);
        assert!(setup.capital_at_risk_percent > budget.max_risk_percent);
    }
}

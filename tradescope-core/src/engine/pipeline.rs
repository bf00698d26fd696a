//! score → build_trade_setup → gate, and `analyze` chaining all three.

use tracing::debug;

use super::{Analysis, AnalysisError, AnalysisReport};
use crate::domain::{validate_bars, Bar, BarError};
use crate::fingerprint::input_hash;
use crate::gate::{self as quality_gate, GateResult};
use crate::indicators::IndicatorSnapshot;
use crate::patterns::{detect_all, PatternMatch};
use crate::profile::StrategyProfile;
use crate::regression::{project, RegressionProjection};
use crate::scoring::{composite_signal, CompositeSignal};
use crate::setup::{build_setup, RiskBudget, SetupInputs, TradeSetup};

/// Bars required before a symbol is analyzed at all.
pub const MIN_BARS: usize = 30;

/// Intermediate results shared by scoring and setup construction.
struct Evidence {
    snapshot: IndicatorSnapshot,
    patterns: Vec<PatternMatch>,
    projection: RegressionProjection,
}

impl Evidence {
    fn gather(bars: &[Bar], current_price: f64, profile: &StrategyProfile) -> Self {
        Self {
            snapshot: IndicatorSnapshot::compute(bars, current_price),
            patterns: detect_all(bars),
            projection: project(
                bars,
                current_price,
                profile.regression_length,
                profile.prediction_bars,
                profile.confidence_level,
            ),
        }
    }

    fn setup_inputs(&self, signal: &CompositeSignal, current_price: f64) -> SetupInputs {
        SetupInputs {
            direction: signal.direction,
            entry: current_price,
            atr: self.snapshot.atr.value,
            support: self.snapshot.levels.nearest_support(),
            resistance: self.snapshot.levels.nearest_resistance(),
            projected_price: self.projection.volatility_adjusted_price,
        }
    }
}

fn check_inputs(bars: &[Bar], current_price: f64) -> Result<(), AnalysisError> {
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(AnalysisError::InvalidPrice(current_price));
    }
    if bars.len() < MIN_BARS {
        return Err(AnalysisError::InsufficientData {
            required: MIN_BARS,
            available: bars.len(),
        });
    }
    validate_bars(bars).map_err(|e| match e {
        BarError::Unordered { index } => AnalysisError::UnorderedBars { index },
        BarError::Insane { index } => AnalysisError::MalformedBar { index },
    })
}

/// Score one symbol under `profile`.
pub fn score(
    symbol: &str,
    bars: &[Bar],
    current_price: f64,
    profile: &StrategyProfile,
) -> Result<CompositeSignal, AnalysisError> {
    check_inputs(bars, current_price)?;
    let evidence = Evidence::gather(bars, current_price, profile);
    Ok(composite_signal(
        symbol,
        profile,
        &evidence.snapshot,
        &evidence.patterns,
        &evidence.projection,
    ))
}

/// Trade plan for an already scored signal; `None` when neutral or when the
/// inputs cannot support a plan.
pub fn build_trade_setup(
    signal: &CompositeSignal,
    bars: &[Bar],
    current_price: f64,
    profile: &StrategyProfile,
    budget: &RiskBudget,
) -> Option<TradeSetup> {
    if !signal.direction.is_actionable() || check_inputs(bars, current_price).is_err() {
        return None;
    }
    let evidence = Evidence::gather(bars, current_price, profile);
    build_setup(&evidence.setup_inputs(signal, current_price), profile, budget)
}

pub fn gate(
    signal: CompositeSignal,
    trade_setup: Option<TradeSetup>,
    profile: &StrategyProfile,
) -> GateResult {
    quality_gate::evaluate(signal, trade_setup, profile)
}

/// Full pipeline for one symbol.
///
/// Too little history is an outcome, not an error: it comes back as
/// [`Analysis::InsufficientData`]. Bad prices and malformed bars are errors.
pub fn analyze(
    symbol: &str,
    bars: &[Bar],
    current_price: f64,
    profile: &StrategyProfile,
    budget: &RiskBudget,
) -> Result<Analysis, AnalysisError> {
    match check_inputs(bars, current_price) {
        Ok(()) => {}
        Err(AnalysisError::InsufficientData {
            required,
            available,
        }) => {
            debug!(symbol, available, required, "insufficient history");
            return Ok(Analysis::InsufficientData {
                symbol: symbol.to_string(),
                available,
                required,
            });
        }
        Err(e) => return Err(e),
    }

    let evidence = Evidence::gather(bars, current_price, profile);
    let signal = composite_signal(
        symbol,
        profile,
        &evidence.snapshot,
        &evidence.patterns,
        &evidence.projection,
    );
    debug!(
        symbol,
        profile = %profile.id,
        direction = %signal.direction,
        score = signal.score,
        bullish = signal.bullish_score,
        bearish = signal.bearish_score,
        alignment = signal.alignment_count,
        patterns = evidence.patterns.len(),
        "scored"
    );

    let trade_setup = if signal.direction.is_actionable() {
        build_setup(&evidence.setup_inputs(&signal, current_price), profile, budget)
    } else {
        None
    };
    let gate = quality_gate::evaluate(signal, trade_setup, profile);
    if let Some(reason) = &gate.skip_reason {
        debug!(symbol, profile = %profile.id, reason = %reason, "rejected");
    }

    let Evidence {
        snapshot,
        patterns,
        projection,
    } = evidence;

    Ok(Analysis::Complete(Box::new(AnalysisReport {
        symbol: symbol.to_string(),
        profile_id: profile.id.clone(),
        bar_count: bars.len(),
        current_price,
        input_hash: input_hash(symbol, bars, current_price, profile),
        indicators: snapshot,
        patterns,
        projection,
        gate,
    })))
}

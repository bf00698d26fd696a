//! Analysis outcome types.

use serde::{Deserialize, Serialize};

use crate::domain::Direction;
use crate::fingerprint::InputHash;
use crate::gate::GateResult;
use crate::indicators::IndicatorSnapshot;
use crate::patterns::PatternMatch;
use crate::regression::RegressionProjection;
use crate::scoring::CompositeSignal;
use crate::setup::TradeSetup;

/// Everything computed for one symbol under one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub profile_id: String,
    pub bar_count: usize,
    pub current_price: f64,
    pub input_hash: InputHash,
    pub indicators: IndicatorSnapshot,
    pub patterns: Vec<PatternMatch>,
    pub projection: RegressionProjection,
    pub gate: GateResult,
}

impl AnalysisReport {
    pub fn signal(&self) -> &CompositeSignal {
        &self.gate.signal
    }

    pub fn direction(&self) -> Direction {
        self.gate.signal.direction
    }

    pub fn trade_setup(&self) -> Option<&TradeSetup> {
        self.gate.trade_setup.as_ref()
    }

    pub fn accepted(&self) -> bool {
        self.gate.accepted
    }
}

/// Result of [`analyze`](super::analyze): a full report, or an explicit
/// "cannot analyze" when the history is too short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Analysis {
    Complete(Box<AnalysisReport>),
    InsufficientData {
        symbol: String,
        available: usize,
        required: usize,
    },
}

impl Analysis {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Complete(report) => &report.symbol,
            Self::InsufficientData { symbol, .. } => symbol,
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Complete(report) => Some(report),
            Self::InsufficientData { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<AnalysisReport> {
        match self {
            Self::Complete(report) => Some(*report),
            Self::InsufficientData { .. } => None,
        }
    }
}

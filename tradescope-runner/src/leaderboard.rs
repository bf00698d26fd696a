//! Ranked leaderboard of a scan's analyzed symbols.
//!
//! One row per analyzed symbol, ordered like the quality gate ranks results:
//! accepted first by score then R:R, rejected after by score. Symbols with
//! insufficient data or failed fetches are not ranked.

use serde::{Deserialize, Serialize};
use tradescope_core::domain::Direction;
use tradescope_core::gate::rank_results;

use crate::scan::{ScanReport, SymbolResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: usize,
    pub symbol: String,
    pub accepted: bool,
    pub direction: Direction,
    pub score: f64,
    pub alignment_count: usize,
    pub risk_reward: Option<f64>,
    pub entry: Option<f64>,
    pub target: Option<f64>,
    pub stop_loss: Option<f64>,
    pub position_size: Option<u64>,
    pub source: Option<String>,
    pub skip_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub profile_id: String,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Rank every analyzed result in `results`.
    pub fn from_reports(profile_id: &str, results: &[SymbolResult]) -> Self {
        let mut gates: Vec<_> = results
            .iter()
            .filter_map(|r| r.report().map(|report| report.gate.clone()))
            .collect();
        rank_results(&mut gates);

        let entries = gates
            .into_iter()
            .enumerate()
            .map(|(i, gate)| {
                let source = results
                    .iter()
                    .find(|r| r.symbol == gate.signal.symbol)
                    .and_then(|r| r.source.clone());
                let setup = gate.trade_setup.as_ref();
                LeaderboardEntry {
                    rank: i + 1,
                    symbol: gate.signal.symbol.clone(),
                    accepted: gate.accepted,
                    direction: gate.signal.direction,
                    score: gate.signal.score,
                    alignment_count: gate.signal.alignment_count,
                    risk_reward: setup.map(|s| s.risk_reward_ratio),
                    entry: setup.map(|s| s.entry),
                    target: setup.map(|s| s.target),
                    stop_loss: setup.map(|s| s.stop_loss),
                    position_size: setup.map(|s| s.position_size),
                    source,
                    skip_reason: gate.skip_reason.clone(),
                }
            })
            .collect();

        Self {
            profile_id: profile_id.to_string(),
            entries,
        }
    }

    pub fn from_scan(report: &ScanReport) -> Self {
        Self::from_reports(&report.profile_id, &report.results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn accepted(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.iter().filter(|e| e.accepted)
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

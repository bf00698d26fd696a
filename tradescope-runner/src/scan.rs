//! Universe scanner: bounded-concurrency batches over a symbol list.
//!
//! Symbols are processed in batches of `batch_size` on a dedicated rayon
//! pool with the same number of threads. Between batches the scanner
//! sleeps `batch_delay_ms` so callers can respect provider rate limits.
//! Per-symbol failures never abort the scan; they are recorded as
//! [`SymbolOutcome::Failed`].

use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use tradescope_core::engine::{analyze, Analysis, AnalysisReport};
use tradescope_core::gate::compare_results;
use tradescope_core::profile::StrategyProfile;
use tradescope_core::setup::RiskBudget;

use crate::config::{ConfigError, ScanConfig};
use crate::data_loader::{FetchOutcome, SourceChain};

/// Current scan report schema version. Newer versions are rejected on import.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no symbols to scan")]
    NoSymbols,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build scan thread pool: {0}")]
    ThreadPool(String),
}

/// What happened to one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolOutcome {
    Analyzed(Box<AnalysisReport>),
    InsufficientData { available: usize, required: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolResult {
    pub symbol: String,
    /// Source that served the bars, `None` when every source failed.
    pub source: Option<String>,
    pub outcome: SymbolOutcome,
}

impl SymbolResult {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match &self.outcome {
            SymbolOutcome::Analyzed(report) => Some(report),
            _ => None,
        }
    }

    pub fn accepted(&self) -> bool {
        self.report().is_some_and(|r| r.accepted())
    }

    pub fn is_synthetic(&self) -> bool {
        self.source.as_deref() == Some("synthetic")
    }
}

/// Output of [`scan_universe`]. Results are in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub schema_version: u32,
    pub profile_id: String,
    pub config_hash: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<SymbolResult>,
}

impl ScanReport {
    pub fn accepted(&self) -> impl Iterator<Item = &SymbolResult> {
        self.results.iter().filter(|r| r.accepted())
    }

    pub fn analyzed_count(&self) -> usize {
        self.results.iter().filter(|r| r.report().is_some()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SymbolOutcome::Failed { .. }))
            .count()
    }

    pub fn has_synthetic(&self) -> bool {
        self.results.iter().any(|r| r.is_synthetic())
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolResult> {
        self.results.iter().find(|r| r.symbol == symbol)
    }
}

/// Analyzed results first in gate ranking order, then insufficient data,
/// then failures; symbol breaks the remaining ties.
pub fn compare_symbol_results(a: &SymbolResult, b: &SymbolResult) -> Ordering {
    fn tier(r: &SymbolResult) -> u8 {
        match r.outcome {
            SymbolOutcome::Analyzed(_) => 0,
            SymbolOutcome::InsufficientData { .. } => 1,
            SymbolOutcome::Failed { .. } => 2,
        }
    }

    match (&a.outcome, &b.outcome) {
        (SymbolOutcome::Analyzed(x), SymbolOutcome::Analyzed(y)) => compare_results(&x.gate, &y.gate),
        _ => tier(a)
            .cmp(&tier(b))
            .then_with(|| a.symbol.cmp(&b.symbol)),
    }
}

/// Fetch and analyze one symbol.
pub fn scan_symbol(
    symbol: &str,
    chain: &SourceChain,
    profile: &StrategyProfile,
    budget: &RiskBudget,
) -> SymbolResult {
    let (source, bars) = match chain.fetch(symbol) {
        FetchOutcome::Loaded { source, bars, .. } => (source, bars),
        FetchOutcome::Failed { failures } => {
            let error = if failures.is_empty() {
                "no bar sources configured".to_string()
            } else {
                failures
                    .iter()
                    .map(|f| format!("{}: {}", f.source, f.error))
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            warn!(symbol, %error, "no source could serve bars");
            return SymbolResult {
                symbol: symbol.to_string(),
                source: None,
                outcome: SymbolOutcome::Failed { error },
            };
        }
    };

    let outcome = match bars.last().map(|b| b.close) {
        None => SymbolOutcome::InsufficientData {
            available: 0,
            required: tradescope_core::engine::MIN_BARS,
        },
        Some(price) => match analyze(symbol, &bars, price, profile, budget) {
            Ok(Analysis::Complete(report)) => SymbolOutcome::Analyzed(report),
            Ok(Analysis::InsufficientData {
                available,
                required,
                ..
            }) => SymbolOutcome::InsufficientData {
                available,
                required,
            },
            Err(e) => {
                warn!(symbol, source = %source, error = %e, "analysis failed");
                SymbolOutcome::Failed {
                    error: e.to_string(),
                }
            }
        },
    };

    SymbolResult {
        symbol: symbol.to_string(),
        source: Some(source),
        outcome,
    }
}

/// Scan `symbols` under one profile.
///
/// Duplicate symbols are scanned once. The returned results are ranked with
/// [`compare_symbol_results`] regardless of completion order.
pub fn scan_universe(
    symbols: &[String],
    chain: &SourceChain,
    profile: &StrategyProfile,
    config: &ScanConfig,
) -> Result<ScanReport, ScanError> {
    config.validate()?;

    let mut seen = HashSet::new();
    let symbols: Vec<&str> = symbols
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .collect();
    if symbols.is_empty() {
        return Err(ScanError::NoSymbols);
    }

    let budget = config.budget();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.batch_size)
        .build()
        .map_err(|e| ScanError::ThreadPool(e.to_string()))?;

    let batches = symbols.len().div_ceil(config.batch_size);
    let started = Instant::now();
    info!(
        symbols = symbols.len(),
        batches,
        profile = %profile.id,
        sources = ?chain.names(),
        "starting scan"
    );

    let mut results = Vec::with_capacity(symbols.len());
    for (i, batch) in symbols.chunks(config.batch_size).enumerate() {
        if i > 0 && config.batch_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(config.batch_delay_ms));
        }

        let batch_results: Vec<SymbolResult> = pool.install(|| {
            batch
                .par_iter()
                .map(|symbol| scan_symbol(symbol, chain, profile, &budget))
                .collect()
        });
        let accepted = batch_results.iter().filter(|r| r.accepted()).count();
        info!(
            batch = i + 1,
            batches,
            symbols = batch.len(),
            accepted,
            "batch complete"
        );
        results.extend(batch_results);
    }

    results.sort_by(compare_symbol_results);

    let report = ScanReport {
        schema_version: SCHEMA_VERSION,
        profile_id: profile.id.clone(),
        config_hash: Some(config.config_hash()),
        generated_at: Utc::now(),
        results,
    };
    info!(
        analyzed = report.analyzed_count(),
        accepted = report.accepted().count(),
        failed = report.failed_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan complete"
    );
    if report.has_synthetic() {
        warn!("scan includes synthetic data; results are not tradeable");
    }
    Ok(report)
}

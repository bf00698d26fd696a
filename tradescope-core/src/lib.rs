//! TradeScope Core: technical signal scoring and trade-setup engine.
//!
//! This crate turns a bar history into a trade decision:
//! - Domain types (bars, directions) and input validation
//! - Indicator library with documented degenerate-input fallbacks
//! - Chart and candlestick pattern detectors
//! - Linear-regression projection with volatility regime adjustment
//! - Strategy profiles loaded from validated TOML
//! - Composite weighted scorer, trade-setup calculator and quality gate
//!
//! Everything here is synchronous and deterministic; callers own any
//! concurrency, caching or I/O.

pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod gate;
pub mod indicators;
pub mod patterns;
pub mod profile;
pub mod regression;
pub mod scoring;
pub mod setup;

pub use domain::{Bar, Direction};
pub use engine::{
    analyze, build_trade_setup, gate as gate_signal, score, Analysis, AnalysisError,
    AnalysisReport,
};
pub use profile::{ProfileError, StrategyProfile, StrategyRegistry};
pub use setup::{RiskBudget, TradeSetup};

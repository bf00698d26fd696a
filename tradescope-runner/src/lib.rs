//! TradeScope Runner: universe scans, bar sources, leaderboards, export.
//!
//! This crate builds on `tradescope-core` to provide:
//! - Bar sources (CSV directory, deterministic synthetic) behind a fallback chain
//! - Batch scanner with bounded concurrency and inter-batch delay
//! - Ranked leaderboard of analyzed symbols
//! - JSON / CSV / Markdown export with schema versioning
//! - TOML scan configuration

pub mod config;
pub mod data_loader;
pub mod export;
pub mod leaderboard;
pub mod scan;

pub use config::{ConfigError, ScanConfig};
pub use data_loader::{
    generate_synthetic_bars, BarSource, CsvDirSource, DataError, FetchOutcome, SourceChain,
    SourceFailure, SyntheticSource,
};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use scan::{
    scan_symbol, scan_universe, ScanError, ScanReport, SymbolOutcome, SymbolResult,
    SCHEMA_VERSION,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn source_chain_is_send_sync() {
        assert_send::<SourceChain>();
        assert_sync::<SourceChain>();
    }

    #[test]
    fn scan_report_is_send_sync() {
        assert_send::<ScanReport>();
        assert_sync::<ScanReport>();
        assert_send::<Leaderboard>();
        assert_sync::<Leaderboard>();
    }

    #[test]
    fn sources_are_send_sync() {
        assert_send::<CsvDirSource>();
        assert_sync::<CsvDirSource>();
        assert_send::<SyntheticSource>();
        assert_sync::<SyntheticSource>();
    }
}

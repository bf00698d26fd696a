//! Bar sources for the runner.
//!
//! Every adapter implements [`BarSource`]. A [`SourceChain`] tries its
//! sources in order and returns the first success, tagged with the name of
//! the source that served it, or every failure when none could:
//! 1. CSV directory (`<dir>/<SYMBOL>.csv`)
//! 2. Synthetic random walk (opt-in, deterministic per symbol)
//!
//! Synthetic data is a developer-only mode. Results produced on it carry
//! the `synthetic` source tag all the way into reports.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use tradescope_core::domain::Bar;

/// Errors from a single bar source.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data for '{symbol}' in {source_name}")]
    NotFound { symbol: String, source_name: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no usable bars for '{symbol}' ({skipped} malformed rows skipped)")]
    Empty { symbol: String, skipped: usize },
}

/// A provider of bar history for one symbol at a time.
pub trait BarSource: Send + Sync {
    /// Tag recorded on results served by this source.
    fn name(&self) -> &str;

    /// Bars for `symbol`, ascending by timestamp.
    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, DataError>;
}

// ─── CSV directory ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Reads `<dir>/<SYMBOL>.csv` with header `timestamp,open,high,low,close,volume`.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl BarSource for CsvDirSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(DataError::NotFound {
                symbol: symbol.to_string(),
                source_name: self.dir.display().to_string(),
            });
        }
        read_bars_file(&path, symbol)
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

pub fn read_bars_file(path: &Path, symbol: &str) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_bars(file, symbol)
}

/// Read bars from CSV. Malformed or insane rows are skipped with a warning;
/// the result is sorted and deduplicated by timestamp (last row wins).
pub fn read_bars<R: Read>(reader: R, symbol: &str) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    let mut skipped = 0usize;

    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let line = i + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(symbol, line, error = %e, "skipping malformed row");
                skipped += 1;
                continue;
            }
        };
        let Some(timestamp) = parse_timestamp(&row.timestamp) else {
            warn!(symbol, line, timestamp = %row.timestamp, "skipping row with bad timestamp");
            skipped += 1;
            continue;
        };
        let bar = Bar::new(timestamp, row.open, row.high, row.low, row.close, row.volume);
        if !bar.is_sane() {
            warn!(symbol, line, "skipping inconsistent OHLCV row");
            skipped += 1;
            continue;
        }
        bars.push(bar);
    }

    bars.sort_by_key(|b| b.timestamp);
    // Keep the last row for a repeated timestamp.
    bars.reverse();
    bars.dedup_by_key(|b| b.timestamp);
    bars.reverse();

    if bars.is_empty() {
        return Err(DataError::Empty {
            symbol: symbol.to_string(),
            skipped,
        });
    }
    debug!(symbol, bars = bars.len(), skipped, "loaded csv bars");
    Ok(bars)
}

/// Write bars in the format [`read_bars`] accepts.
pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        wtr.write_record([
            bar.timestamp.to_rfc3339(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush().map_err(|e| DataError::Csv(e.into()))?;
    Ok(())
}

// ─── Synthetic ──────────────────────────────────────────────────────

/// Deterministic random walk seeded from the symbol name.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSource {
    bars: usize,
}

impl SyntheticSource {
    pub fn new(bars: usize) -> Self {
        Self { bars }
    }
}

impl BarSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        Ok(generate_synthetic_bars(symbol, self.bars))
    }
}

/// Weekday bars from 2023-01-02, starting at 100, with a per-symbol drift.
pub fn generate_synthetic_bars(symbol: &str, count: usize) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);
    let drift: f64 = rng.gen_range(-0.004..0.004);

    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    let mut day = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).single();

    while bars.len() < count {
        let Some(current) = day else { break };
        day = current.checked_add_signed(Duration::days(1));
        if matches!(current.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun) {
            continue;
        }

        let daily_return: f64 = drift + rng.gen_range(-0.02..0.02);
        let open = price;
        let close = (price * (1.0 + daily_return)).max(0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(Bar::new(current, open, high, low, close, volume));
        price = close;
    }
    bars
}

// ─── Source chain ───────────────────────────────────────────────────

/// One source's failure inside a chain fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Result of a chain fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded {
        /// Name of the source that served the bars.
        source: String,
        bars: Vec<Bar>,
        /// Sources tried (and failed) before it.
        fallbacks: Vec<SourceFailure>,
    },
    Failed {
        failures: Vec<SourceFailure>,
    },
}

impl FetchOutcome {
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Loaded { source, .. } => Some(source),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.source() == Some("synthetic")
    }
}

/// Ordered list of sources; first success wins.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn BarSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl BarSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn BarSource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn fetch(&self, symbol: &str) -> FetchOutcome {
        let mut failures = Vec::new();
        for source in &self.sources {
            match source.fetch(symbol) {
                Ok(bars) => {
                    if !failures.is_empty() {
                        warn!(
                            symbol,
                            source = source.name(),
                            skipped = failures.len(),
                            "served by fallback source"
                        );
                    }
                    return FetchOutcome::Loaded {
                        source: source.name().to_string(),
                        bars,
                        fallbacks: failures,
                    };
                }
                Err(e) => {
                    debug!(symbol, source = source.name(), error = %e, "source failed");
                    failures.push(SourceFailure {
                        source: source.name().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
        FetchOutcome::Failed { failures }
    }
}

impl std::fmt::Debug for SourceChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceChain")
            .field("sources", &self.names())
            .finish()
    }
}

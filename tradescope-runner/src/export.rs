//! Reporting and export: JSON, CSV and Markdown scan artifacts.
//!
//! - **JSON**: full scan report with schema versioning (round-trips)
//! - **CSV**: ranked leaderboard for spreadsheets
//! - **Markdown**: human-readable leaderboard summary
//!
//! Unknown (newer) schema versions are rejected on load.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::leaderboard::Leaderboard;
use crate::scan::{ScanReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ScanReport` to pretty JSON.
pub fn export_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScanReport to JSON")
}

/// Deserialize a `ScanReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScanReport> {
    let report: ScanReport =
        serde_json::from_str(json).context("failed to deserialize ScanReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.precision$}"))
}

/// Export a leaderboard as CSV.
///
/// Columns: rank, symbol, accepted, direction, score, alignment, risk_reward,
/// entry, target, stop_loss, position_size, source, skip_reason
pub fn export_leaderboard_csv(board: &Leaderboard) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "rank",
        "symbol",
        "accepted",
        "direction",
        "score",
        "alignment",
        "risk_reward",
        "entry",
        "target",
        "stop_loss",
        "position_size",
        "source",
        "skip_reason",
    ])?;

    for e in &board.entries {
        wtr.write_record([
            e.rank.to_string(),
            e.symbol.clone(),
            e.accepted.to_string(),
            e.direction.to_string(),
            format!("{:.2}", e.score),
            e.alignment_count.to_string(),
            opt(e.risk_reward, 2),
            opt(e.entry, 4),
            opt(e.target, 4),
            opt(e.stop_loss, 4),
            e.position_size.map(|n| n.to_string()).unwrap_or_default(),
            e.source.clone().unwrap_or_default(),
            e.skip_reason.clone().unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

/// Render a leaderboard as a Markdown table.
pub fn leaderboard_markdown(board: &Leaderboard) -> String {
    let mut md = String::new();
    let accepted = board.accepted().count();
    let _ = writeln!(md, "# Scan leaderboard: {}", board.profile_id);
    let _ = writeln!(md);
    let _ = writeln!(md, "{accepted} of {} analyzed symbols accepted.", board.len());
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "| # | Symbol | Signal | Score | Align | R:R | Entry | Target | Stop | Size | Note |"
    );
    let _ = writeln!(md, "|---|---|---|---|---|---|---|---|---|---|---|");
    for e in &board.entries {
        let note = match (&e.skip_reason, e.source.as_deref()) {
            (Some(reason), _) => reason.clone(),
            (None, Some("synthetic")) => "synthetic data".to_string(),
            (None, _) => String::new(),
        };
        let _ = writeln!(
            md,
            "| {} | {} | {} | {:.1} | {} | {} | {} | {} | {} | {} | {} |",
            e.rank,
            e.symbol,
            e.direction,
            e.score,
            e.alignment_count,
            opt(e.risk_reward, 2),
            opt(e.entry, 2),
            opt(e.target, 2),
            opt(e.stop_loss, 2),
            e.position_size.map(|n| n.to_string()).unwrap_or_default(),
            note,
        );
    }
    md
}

// ─── File output ────────────────────────────────────────────────────

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Write the full scan report as JSON.
pub fn write_json(report: &ScanReport, path: &Path) -> Result<()> {
    write_file(path, &export_json(report)?)
}

/// Write the ranked leaderboard as CSV.
pub fn write_csv(board: &Leaderboard, path: &Path) -> Result<()> {
    write_file(path, &export_leaderboard_csv(board)?)
}

/// Load a scan report previously written with [`write_json`].
pub fn load_json(path: &Path) -> Result<ScanReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

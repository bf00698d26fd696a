//! TradeScope CLI: analyze, scan, profile and synthetic-data commands.
//!
//! Commands:
//! - `analyze`: score one symbol's CSV history and print the trade decision
//! - `scan`: analyze a universe of symbols in batches and rank the results
//! - `profiles`: list the strategy profiles (built-in or from a TOML file)
//! - `synth`: write a deterministic synthetic bar history as CSV
//!
//! Logging goes to stderr through `tracing`; set `RUST_LOG` to change the
//! default `info` level.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tradescope_core::engine::{analyze, Analysis, AnalysisReport};
use tradescope_core::profile::StrategyRegistry;
use tradescope_core::setup::RiskBudget;
use tradescope_runner::data_loader::{read_bars_file, write_bars};
use tradescope_runner::export::{leaderboard_markdown, write_csv, write_json};
use tradescope_runner::{
    generate_synthetic_bars, scan_universe, CsvDirSource, Leaderboard, ScanConfig, SourceChain,
    SyntheticSource,
};

#[derive(Parser)]
#[command(
    name = "tradescope",
    about = "TradeScope CLI: technical signal scoring and trade setups"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one symbol from a CSV bar file.
    Analyze {
        /// CSV file with header timestamp,open,high,low,close,volume.
        #[arg(long)]
        csv: PathBuf,

        /// Symbol label. Defaults to the file stem.
        #[arg(long)]
        symbol: Option<String>,

        /// Strategy profile id.
        #[arg(long, default_value = "swing")]
        profile: String,

        /// Current price. Defaults to the last close.
        #[arg(long)]
        price: Option<f64>,

        /// Account capital for position sizing.
        #[arg(long, default_value_t = 100_000.0)]
        capital: f64,

        /// Max percent of capital risked per trade.
        #[arg(long = "risk-pct", default_value_t = 2.0)]
        risk_pct: f64,

        /// TOML file of strategy profiles (replaces the built-ins).
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Print the full report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Scan a universe of symbols and print a ranked leaderboard.
    Scan {
        /// Path to a TOML scan config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of <SYMBOL>.csv files (overrides the config).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Symbols to scan (overrides the config).
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Strategy profile id (overrides the config).
        #[arg(long)]
        profile: Option<String>,

        /// Fall back to synthetic bars for symbols without data.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// TOML file of strategy profiles (replaces the built-ins).
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Write the scan report JSON here (leaderboard CSV goes alongside).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List strategy profiles.
    Profiles {
        /// TOML file of strategy profiles. Defaults to the built-ins.
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
    /// Generate a deterministic synthetic bar history.
    Synth {
        /// Symbol used to seed the generator.
        #[arg(long)]
        symbol: String,

        /// Number of bars.
        #[arg(long, default_value_t = 250)]
        bars: usize,

        /// Output CSV file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            csv,
            symbol,
            profile,
            price,
            capital,
            risk_pct,
            profiles,
            json,
        } => run_analyze(
            &csv,
            symbol,
            &profile,
            price,
            RiskBudget {
                capital,
                max_risk_percent: risk_pct,
            },
            profiles.as_deref(),
            json,
        ),
        Commands::Scan {
            config,
            data_dir,
            symbols,
            profile,
            synthetic,
            profiles,
            output,
        } => run_scan(
            config.as_deref(),
            data_dir,
            symbols,
            profile,
            synthetic,
            profiles.as_deref(),
            output.as_deref(),
        ),
        Commands::Profiles { profiles } => run_profiles(profiles.as_deref()),
        Commands::Synth {
            symbol,
            bars,
            output,
        } => run_synth(&symbol, bars, output.as_deref()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_registry(path: Option<&Path>) -> Result<StrategyRegistry> {
    let registry = match path {
        Some(path) => StrategyRegistry::from_file(path)?,
        None => StrategyRegistry::builtin()?,
    };
    Ok(registry)
}

fn run_analyze(
    csv: &Path,
    symbol: Option<String>,
    profile_id: &str,
    price: Option<f64>,
    budget: RiskBudget,
    profiles: Option<&Path>,
    json: bool,
) -> Result<()> {
    if !budget.is_valid() {
        bail!("--capital and --risk-pct must be positive (risk at most 100%)");
    }
    let registry = load_registry(profiles)?;
    let profile = registry.get(profile_id)?;

    let symbol = symbol.unwrap_or_else(|| {
        csv.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    });
    let bars = read_bars_file(csv, &symbol)
        .with_context(|| format!("failed to load bars from {}", csv.display()))?;
    let price = match price.or_else(|| bars.last().map(|b| b.close)) {
        Some(p) => p,
        None => bail!("no bars in {}", csv.display()),
    };

    let analysis = analyze(&symbol, &bars, price, profile, &budget)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    match analysis {
        Analysis::Complete(report) => print_report(&report),
        Analysis::InsufficientData {
            symbol,
            available,
            required,
        } => {
            println!("{symbol}: cannot analyze, {available} bars available, {required} required");
        }
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    let signal = report.signal();
    println!("=== {} ({}) ===", report.symbol, report.profile_id);
    println!("Price:          {:.2}", report.current_price);
    println!("Bars:           {}", report.bar_count);
    println!("Input hash:     {}", report.input_hash.short());
    println!(
        "Signal:         {} score {:.1} (bull {:.1} / bear {:.1})",
        signal.direction, signal.score, signal.bullish_score, signal.bearish_score
    );
    println!("Alignment:      {} sources", signal.alignment_count);
    println!(
        "RSI {:.1}  ADX {:.1}  ATR {:.2}  volume x{:.2}",
        report.indicators.rsi,
        report.indicators.adx.value,
        report.indicators.atr.value,
        report.indicators.volume_ratio,
    );
    println!(
        "Projection:     {:.2} ({:+.2}%, R² {:.2})",
        report.projection.volatility_adjusted_price,
        report.projection.expected_move_percent(report.current_price),
        report.projection.r_squared,
    );

    if !report.patterns.is_empty() {
        println!();
        println!("Patterns:");
        for p in &report.patterns {
            println!("  {:<24} {:<8} {:.0}", p.name, p.class, p.confidence_weight);
        }
    }

    println!();
    println!("Signals:");
    for s in &signal.contributing_signals {
        println!(
            "  {:<12} {:<8} {:>5.1}  {}",
            s.source.as_str(),
            s.direction,
            s.weight,
            s.label
        );
    }

    println!();
    if let Some(setup) = report.trade_setup() {
        println!(
            "Setup:          entry {:.2}  target {:.2}  stop {:.2}",
            setup.entry, setup.target, setup.stop_loss
        );
        println!(
            "                R:R {:.2}  size {}  risk {:.2}% of capital{}",
            setup.risk_reward_ratio,
            setup.position_size,
            setup.capital_at_risk_percent,
            if setup.target_extended {
                "  (target extended)"
            } else {
                ""
            }
        );
    }
    match &report.gate.skip_reason {
        None => println!("Decision:       ACCEPTED"),
        Some(reason) => println!("Decision:       REJECTED ({reason})"),
    }
}

fn run_scan(
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
    symbols: Vec<String>,
    profile: Option<String>,
    synthetic: bool,
    profiles: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    if data_dir.is_some() {
        config.data_dir = data_dir;
    }
    if !symbols.is_empty() {
        config.symbols = symbols;
    }
    if let Some(profile) = profile {
        config.profile = profile;
    }
    if synthetic {
        config.synthetic_fallback = true;
    }
    config.validate()?;

    let registry = load_registry(profiles)?;
    let profile = registry.get(&config.profile)?;

    let mut chain = SourceChain::new();
    if let Some(dir) = &config.data_dir {
        chain = chain.with_source(CsvDirSource::new(dir));
    }
    if config.synthetic_fallback {
        chain = chain.with_source(SyntheticSource::new(config.synthetic_bars));
    }
    if chain.is_empty() {
        bail!("no bar source: pass --data-dir or --synthetic");
    }

    let report = scan_universe(&config.symbols, &chain, profile, &config)?;
    let board = Leaderboard::from_scan(&report);
    print!("{}", leaderboard_markdown(&board));

    let skipped: Vec<String> = report
        .results
        .iter()
        .filter(|r| r.report().is_none())
        .map(|r| r.symbol.clone())
        .collect();
    if !skipped.is_empty() {
        println!();
        println!("Not ranked: {}", skipped.join(", "));
    }
    if report.has_synthetic() {
        println!();
        println!("WARNING: synthetic data used; results are not tradeable.");
    }

    if let Some(path) = output {
        write_json(&report, path)?;
        let csv_path = path.with_extension("csv");
        write_csv(&board, &csv_path)?;
        println!();
        println!("Report saved to: {}", path.display());
        println!("Leaderboard saved to: {}", csv_path.display());
    }
    Ok(())
}

fn run_profiles(path: Option<&Path>) -> Result<()> {
    let registry = load_registry(path)?;
    println!(
        "{:<12} {:<6} {:<14} {:>5} {:>6} {:>7} {:>6} {:>6}",
        "id", "tf", "holding", "R:R", "conf", "align", "stop%", "vol%"
    );
    for p in registry.iter() {
        println!(
            "{:<12} {:<6} {:<14} {:>5.1} {:>6.0} {:>7} {:>6.1} {:>6.1}",
            p.id,
            p.timeframe,
            p.holding_period,
            p.min_risk_reward,
            p.min_confidence,
            p.min_indicator_align,
            p.stop_loss_percent,
            p.max_volatility_percent,
        );
    }
    Ok(())
}

fn run_synth(symbol: &str, count: usize, output: Option<&Path>) -> Result<()> {
    if count == 0 {
        bail!("--bars must be at least 1");
    }
    let bars = generate_synthetic_bars(symbol, count);
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_bars(file, &bars)?;
            tracing::info!(symbol, bars = bars.len(), path = %path.display(), "wrote synthetic bars");
        }
        None => write_bars(std::io::stdout().lock(), &bars)?,
    }
    Ok(())
}

//! Criterion benchmarks for the analysis hot paths.
//!
//! Benchmarks:
//! 1. Indicator snapshot over growing histories
//! 2. Full pattern detector sweep
//! 3. End-to-end `analyze` per built-in profile

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradescope_core::domain::Bar;
use tradescope_core::engine::analyze;
use tradescope_core::indicators::IndicatorSnapshot;
use tradescope_core::patterns::detect_all;
use tradescope_core::profile::StrategyRegistry;
use tradescope_core::setup::RiskBudget;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.05;
            let open = close - 0.3;
            Bar::new(
                base + Duration::days(i as i64),
                open,
                close + 1.5,
                open - 1.5,
                close,
                1_000_000.0 + (i % 500) as f64 * 1_000.0,
            )
        })
        .collect()
}

// ── 1. Indicator snapshot ────────────────────────────────────────────

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_snapshot");
    for n in [60usize, 250, 1000] {
        let bars = make_bars(n);
        let price = bars[n - 1].close;
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| IndicatorSnapshot::compute(black_box(bars), price))
        });
    }
    group.finish();
}

// ── 2. Pattern sweep ─────────────────────────────────────────────────

fn bench_patterns(c: &mut Criterion) {
    let bars = make_bars(250);
    c.bench_function("detect_all_250", |b| b.iter(|| detect_all(black_box(&bars))));
}

// ── 3. End-to-end analyze ────────────────────────────────────────────

fn bench_analyze(c: &mut Criterion) {
    let registry = StrategyRegistry::builtin().expect("built-in profiles");
    let bars = make_bars(250);
    let price = bars[249].close;
    let budget = RiskBudget::default();

    let mut group = c.benchmark_group("analyze");
    for profile in registry.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(&profile.id), profile, |b, p| {
            b.iter(|| analyze("BENCH", black_box(&bars), price, p, &budget))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_snapshot, bench_patterns, bench_analyze);
criterion_main!(benches);

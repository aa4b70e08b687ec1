//! Criterion benchmarks for the selection pipeline.
//!
//! Benchmarks:
//! 1. Full scan over synthetic snapshots of increasing size
//! 2. Single-threaded vs pooled analysis on the same batch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use swingscan_runner::{
    generate_synthetic_snapshot, select_universe, DataSource, ScanConfig, SelectionPipeline,
    UniverseConfig,
};

fn end() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn run_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_717_200_000, 0).unwrap()
}

fn bench_scan_sizes(c: &mut Criterion) {
    let pipeline = SelectionPipeline::new(&ScanConfig::default()).unwrap();
    let universe = UniverseConfig {
        max_assets: usize::MAX,
        ..UniverseConfig::default()
    };

    let mut group = c.benchmark_group("scan");
    for n in [25usize, 100, 400] {
        let loaded = select_universe(
            generate_synthetic_snapshot(n, end()),
            Vec::new(),
            &universe,
            DataSource::Synthetic,
        );
        group.bench_with_input(BenchmarkId::from_parameter(n), &loaded, |b, loaded| {
            b.iter(|| black_box(pipeline.run_snapshot(black_box(loaded), run_time())))
        });
    }
    group.finish();
}

fn bench_thread_counts(c: &mut Criterion) {
    let loaded = select_universe(
        generate_synthetic_snapshot(200, end()),
        Vec::new(),
        &UniverseConfig {
            max_assets: 200,
            ..UniverseConfig::default()
        },
        DataSource::Synthetic,
    );

    let mut group = c.benchmark_group("threads");
    for threads in [1usize, 4] {
        let mut config = ScanConfig::default();
        config.runtime.worker_threads = threads;
        let pipeline = SelectionPipeline::new(&config).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| black_box(pipeline.run_snapshot(&loaded, run_time())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan_sizes, bench_thread_counts);
criterion_main!(benches);

//! Comparison Engine Benchmarks
//!
//! **Purpose:** Measure move detection and per-metric comparison between two snapshots
//!
//! **Regression Threshold:** >20% slower than a saved baseline
//!
//! **How to Run:**
//! ```bash
//! cargo bench --bench comparison
//! cargo bench --bench comparison -- --save-baseline main
//! cargo bench --bench comparison -- --baseline main
//! ```
//!
//! **What's Being Measured:**
//! 1. `compare one metric` - full reconcile and diff at 100, 1000 and 5000 files
//! 2. `detect moves` - move detection when a tenth of the files changed directory
//! 3. `compare all metrics` - every metric column, diffed in parallel
//! 4. `reclassify threshold` - re-projecting a finished comparison
//!
//! **Performance Notes:**
//! - Move detection dominates when many files are added and removed at once
//! - Threshold changes never re-run detection

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use size_analyzer::engine::{MetricComparator, MoveDetector, SizeMap};
use size_analyzer::snapshot::CsvTable;
use std::fmt::Write as _;
use std::hint::black_box;

/// Two snapshots where every tenth file moved to another directory
fn snapshot_pair(files: usize) -> (String, String) {
    let mut before = String::from("compileunits,vmsize,filesize\n");
    let mut after = before.clone();
    for i in 0..files {
        let size = 1000 + i * 13;
        writeln!(before, "src/mod_{}/file_{}.cpp,{},{}", i % 50, i, size, size / 2).unwrap();
        let dir = if i % 10 == 0 { "moved" } else { "src" };
        writeln!(
            after,
            "{}/mod_{}/file_{}.cpp,{},{}",
            dir,
            i % 50,
            i,
            size + i % 17,
            size / 2
        )
        .unwrap();
    }
    (before, after)
}

fn size_maps(files: usize) -> (SizeMap, SizeMap) {
    let before = (0..files).map(|i| (format!("old/lib_{}.o", i), 4096 + i as u64));
    let after = (0..files).map(|i| {
        let dir = if i % 10 == 0 { "new" } else { "old" };
        (format!("{}/lib_{}.o", dir, i), 4100 + i as u64)
    });
    (SizeMap::from_sizes(before), SizeMap::from_sizes(after))
}

fn bench_compare_one_metric(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare one metric");
    for files in [100, 1_000, 5_000] {
        let (before, after) = snapshot_pair(files);
        let before = CsvTable::parse(&before);
        let after = CsvTable::parse(&after);
        group.bench_with_input(
            BenchmarkId::from_parameter(files),
            &(before, after),
            |b, (before, after)| {
                b.iter(|| {
                    MetricComparator::default().compare(
                        black_box(before),
                        black_box(after),
                        "vmsize",
                        64,
                        None,
                    )
                });
            },
        );
    }
    group.finish();
}

fn bench_detect_moves(c: &mut Criterion) {
    let (before, after) = size_maps(2_000);
    c.bench_function("detect moves (2000 files)", |b| {
        b.iter_batched(
            || (before.clone(), after.clone()),
            |(before, after)| MoveDetector::default().detect(before, after),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_compare_all_metrics(c: &mut Criterion) {
    let (before, after) = snapshot_pair(2_000);
    let before = CsvTable::parse(&before);
    let after = CsvTable::parse(&after);
    c.bench_function("compare all metrics (2000 files)", |b| {
        b.iter(|| {
            MetricComparator::default().compare_all_metrics(
                black_box(&before),
                black_box(&after),
                None,
            )
        });
    });
}

fn bench_reclassify(c: &mut Criterion) {
    let (before, after) = size_maps(5_000);
    let comparison = MetricComparator::default().compare_maps(before, after, "size");
    c.bench_function("reclassify threshold (5000 files)", |b| {
        b.iter(|| {
            let entries = comparison.entries(black_box(32));
            black_box(comparison.summary(32));
            entries
        });
    });
}

criterion_group!(
    benches,
    bench_compare_one_metric,
    bench_detect_moves,
    bench_compare_all_metrics,
    bench_reclassify
);
criterion_main!(benches);

/// Aggregation Benchmarks
///
/// Measures ledger updates, ranking and distribution binning over synthetic
/// keystroke delays of increasing size.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use keylag::binning::bin;
use keylag::ledger::DelayLedger;
use keylag::rank::rank;
use keylag::summary::DelaySummary;
use std::time::Duration;

/// Deterministic pseudo-random delays in 0..2000 ms
fn synthetic_delays(n: usize) -> Vec<u64> {
    let mut state = 0x2545_f491_4f6c_dd1du64;
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % 2_000
        })
        .collect()
}

fn synthetic_ledger(n: usize) -> DelayLedger {
    let mut ledger = DelayLedger::new();
    for (i, delay) in synthetic_delays(n).into_iter().enumerate() {
        let symbol = char::from(b'a' + (i % 26) as u8);
        ledger.update(symbol, delay);
    }
    ledger
}

/// Benchmark: Ledger updates
fn bench_ledger_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_update");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(10_000));

    let delays = synthetic_delays(10_000);
    group.bench_function("update_10000_keystrokes", |b| {
        b.iter(|| {
            let mut ledger = DelayLedger::new();
            for (i, &delay) in delays.iter().enumerate() {
                ledger.update(char::from(b'a' + (i % 26) as u8), delay);
            }
            black_box(ledger);
        });
    });

    group.finish();
}

/// Benchmark: Ranking a full ledger
fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    group.measurement_time(Duration::from_secs(5));

    let ledger = synthetic_ledger(10_000);
    group.bench_function("rank_26_keys", |b| {
        b.iter(|| black_box(rank(black_box(&ledger))));
    });

    group.finish();
}

/// Benchmark: Binning with different sample counts
fn bench_bin_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("bin_sizes");
    group.measurement_time(Duration::from_secs(5));

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let delays = synthetic_delays(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &delays, |b, delays| {
            b.iter(|| black_box(bin(black_box(delays), 15)));
        });
    }

    group.finish();
}

/// Benchmark: Extended summary
fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary");
    group.measurement_time(Duration::from_secs(5));

    let delays = synthetic_delays(10_000);
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("summary_10000_delays", |b| {
        b.iter(|| black_box(DelaySummary::from_delays(black_box(&delays))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ledger_update,
    bench_rank,
    bench_bin_sizes,
    bench_summary
);
criterion_main!(benches);

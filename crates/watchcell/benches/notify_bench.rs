//! Benchmarks for observable notification dispatch.
//!
//! Run with: cargo bench -p watchcell --bench notify_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use watchcell::{Effect, Observable, Subscription};

// =============================================================================
// set: dispatch cost per subscriber count
// =============================================================================

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("observable/set");

    for subs in [0usize, 8, 64] {
        group.bench_with_input(BenchmarkId::new("subscribers", subs), &subs, |b, &subs| {
            let obs = Observable::new(0u64);
            let _guards: Vec<Subscription> = (0..subs).map(|_| obs.subscribe(|| {})).collect();
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                obs.set(black_box(i));
            });
        });
    }

    group.finish();
}

// =============================================================================
// set: the no-op path (equal write)
// =============================================================================

fn bench_set_noop(c: &mut Criterion) {
    let mut group = c.benchmark_group("observable/set_noop");

    group.bench_function("equal_write", |b| {
        let obs = Observable::new(42u64);
        let _guards: Vec<Subscription> = (0..8).map(|_| obs.subscribe(|| {})).collect();
        b.iter(|| obs.set(black_box(42)));
    });

    group.finish();
}

// =============================================================================
// effect: fan-in trigger dispatch
// =============================================================================

fn bench_effect_fan_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("effect/fan_in");

    group.bench_function("three_sources", |b| {
        let counter = Observable::new(0u64);
        let label = Observable::new(String::new());
        let ratio = Observable::new(0.0f64);
        let _effect = Effect::bind_silent(&[&counter, &label, &ratio], || {});
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            counter.set(black_box(i));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_set_noop, bench_effect_fan_in);
criterion_main!(benches);

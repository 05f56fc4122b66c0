//! Query latency over the bundled sample dataset.
//!
//! Run with: `cargo bench`

use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pokefinder::data::load_dataset;
use pokefinder::{QueryEngine, SpeciesFilter, StatQuery};

fn sample_engine() -> QueryEngine {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/fixtures/sample");
    let indexes = load_dataset(dir).expect("sample dataset loads");
    QueryEngine::new(indexes).expect("sample dataset is complete")
}

fn bench_queries(c: &mut Criterion) {
    let engine = sample_engine();

    let mut group = c.benchmark_group("queries");
    group.sample_size(200);

    group.bench_function("lookup_by_name", |b| {
        b.iter(|| engine.lookup_by_name(black_box("gengar")).map(|r| r.number))
    });

    group.bench_function("find_by_move", |b| {
        b.iter(|| {
            engine
                .find_by_move(black_box("thunderbolt"), SpeciesFilter::default())
                .map(|found| found.len())
        })
    });

    group.bench_function("find_by_type_dual", |b| {
        b.iter(|| {
            engine
                .find_by_type(black_box(&["ghost", "poison"][..]), SpeciesFilter::default())
                .map(|found| found.len())
        })
    });

    let query = StatQuery::new("attack", "speed")
        .min_primary(80)
        .filter(SpeciesFilter::include_all());
    group.bench_function("find_by_stats", |b| {
        b.iter(|| engine.find_by_stats(black_box(&query)).map(|ranked| ranked.len()))
    });

    group.bench_function("type_effectiveness_dual", |b| {
        b.iter(|| {
            engine
                .type_effectiveness(black_box(&["fire", "flying"][..]))
                .map(|chart| chart.buckets.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);

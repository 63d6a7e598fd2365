//! Range index benchmarks
//!
//! Measures:
//! - Build time (sort + max span fold)
//! - Overlap and point query latency against a linear scan
//! - Effect of a long-tailed span distribution on pruning

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rangex::{
    generate, naive_point, naive_range, random_queries, GeneratorConfig, RangeIndex,
    SpanDistribution,
};

fn dataset_config(count: usize) -> GeneratorConfig {
    GeneratorConfig::with_count(count)
        .with_domain(0.0, 1_000_000.0)
        .with_spans(0.0, 1_000.0)
        .with_seed(42)
}

fn long_tail_config(count: usize) -> GeneratorConfig {
    dataset_config(count).with_distribution(SpanDistribution::LongTail {
        long_fraction: 0.001,
        long_max_span: 100_000.0,
    })
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for count in [1_000, 100_000, 1_000_000] {
        let entries = generate::<f64>(&dataset_config(count)).unwrap();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("f64", count), &entries, |b, entries| {
            b.iter(|| black_box(RangeIndex::build(entries.clone()).max_span()));
        });
    }

    group.finish();
}

fn bench_query_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_range");

    for count in [10_000, 1_000_000] {
        let config = dataset_config(count);
        let index = RangeIndex::build(generate::<f64>(&config).unwrap());
        let windows = random_queries::<f64>(&config, 256, 5_000.0);

        group.throughput(Throughput::Elements(windows.len() as u64));
        group.bench_with_input(BenchmarkId::new("indexed", count), &windows, |b, windows| {
            b.iter(|| {
                windows
                    .iter()
                    .map(|&(from, to)| index.query_range(from, to).len())
                    .sum::<usize>()
            });
        });

        if count <= 10_000 {
            group.bench_with_input(BenchmarkId::new("naive", count), &windows, |b, windows| {
                b.iter(|| {
                    windows
                        .iter()
                        .map(|&(from, to)| naive_range(index.as_slice(), from, to).len())
                        .sum::<usize>()
                });
            });
        }
    }

    group.finish();
}

fn bench_query_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_point");

    for (name, config) in [
        ("uniform", dataset_config(1_000_000)),
        ("long_tail", long_tail_config(1_000_000)),
    ] {
        let index = RangeIndex::build(generate::<f64>(&config).unwrap());
        let points: Vec<f64> = random_queries::<f64>(&config, 256, 0.0)
            .into_iter()
            .map(|(point, _)| point)
            .collect();

        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::new("indexed", name), &points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .map(|&point| index.count_point(point))
                    .sum::<usize>()
            });
        });
    }

    let config = dataset_config(10_000);
    let index = RangeIndex::build(generate::<f64>(&config).unwrap());
    let points: Vec<f64> = random_queries::<f64>(&config, 256, 0.0)
        .into_iter()
        .map(|(point, _)| point)
        .collect();
    group.bench_function("naive/10000", |b| {
        b.iter(|| {
            points
                .iter()
                .map(|&point| naive_point(index.as_slice(), point).len())
                .sum::<usize>()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_query_range, bench_query_point);
criterion_main!(benches);

//! Benchmarks for list extraction and the calculators.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stream_assist::calculators::{ad_earnings, subscription_earnings};
use stream_assist::generation::parse_lines;

fn bench_parse_lines(c: &mut Criterion) {
    // A typical completion: numbered-looking lines with blank separators.
    let raw: String = (0..200)
        .map(|i| format!("  Stream title number {i} with some extra words  \r\n\n"))
        .collect();

    c.bench_function("parse_lines_200_take_10", |b| {
        b.iter(|| black_box(parse_lines(black_box(&raw), 10)))
    });

    c.bench_function("parse_lines_200_take_all", |b| {
        b.iter(|| black_box(parse_lines(black_box(&raw), usize::MAX)))
    });
}

fn bench_calculators(c: &mut Criterion) {
    c.bench_function("subscription_earnings", |b| {
        b.iter(|| black_box(subscription_earnings(black_box(1234.0), black_box(3.0))))
    });

    c.bench_function("ad_earnings", |b| {
        b.iter(|| black_box(ad_earnings(black_box(10.0), black_box(5000.0), black_box(3.0))))
    });
}

criterion_group!(benches, bench_parse_lines, bench_calculators);
criterion_main!(benches);

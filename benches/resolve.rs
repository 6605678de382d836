//! Address Resolution Benchmarks
//!
//! The resolver sits on the hot path of client construction; these
//! benchmarks track the cost of classifying each address form.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use duckgate::resolve;

fn bench_resolve_local_path(c: &mut Criterion) {
    c.bench_function("resolve_local_path", |b| {
        b.iter(|| resolve(black_box("/var/data/analytics.db"), None, false));
    });
}

fn bench_resolve_object_store(c: &mut Criterion) {
    c.bench_function("resolve_object_store", |b| {
        b.iter(|| resolve(black_box("s3://bucket/analytics.db"), None, false));
    });
}

fn bench_resolve_motherduck(c: &mut Criterion) {
    c.bench_function("resolve_motherduck", |b| {
        b.iter(|| resolve(black_box("md:mydb"), black_box(Some("tok123")), true));
    });
}

criterion_group!(
    benches,
    bench_resolve_local_path,
    bench_resolve_object_store,
    bench_resolve_motherduck
);
criterion_main!(benches);

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keva::{SharedStore, StoreBase};

pub fn benchmark_set_get(c: &mut Criterion) {
    let store = SharedStore::new();

    let mut cmd_group = c.benchmark_group("store");

    cmd_group.significance_level(0.05).sample_size(500);

    cmd_group.bench_function("set", |b| {
        b.iter(|| {
            store.set(
                black_box(Bytes::from_static(b"bench-key")),
                black_box(Bytes::from_static(b"bench-value")),
            )
        })
    });

    cmd_group.bench_function("get", |b| {
        b.iter(|| store.get(black_box(Bytes::from_static(b"bench-key"))))
    });

    cmd_group.finish()
}

criterion_group!(benches, benchmark_set_get);
criterion_main!(benches);

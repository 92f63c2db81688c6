use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use canopy::StateStore;

fn bench_set_shallow(c: &mut Criterion) {
    let store = StateStore::new();

    c.bench_function("set_shallow", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store
                .set(black_box(&format!("key{}", i % 1000)), black_box(i))
                .unwrap();
            i += 1;
        });
    });
}

fn bench_set_deep(c: &mut Criterion) {
    let store = StateStore::new();

    c.bench_function("set_deep", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store
                .set(
                    black_box(&format!("app.pages.p{}.sections.main.value", i % 100)),
                    black_box(i),
                )
                .unwrap();
            i += 1;
        });
    });
}

fn bench_get(c: &mut Criterion) {
    let store = StateStore::new();

    // Pre-populate.
    for i in 0..1000 {
        store
            .set(&format!("items.i{:04}.value", i), json!(i))
            .unwrap();
    }

    c.bench_function("get_deep", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let path = format!("items.i{:04}.value", i % 1000);
            let _ = store.get(black_box(&path));
            i += 1;
        });
    });
}

fn bench_notify_fanout(c: &mut Criterion) {
    let store = StateStore::new();

    // 100 subscribers across the ancestor chain of the written path.
    for _ in 0..50 {
        store.subscribe("app.reader.section", |_| {});
        store.subscribe("app.reader", |_| {});
    }

    c.bench_function("set_with_100_subscribers", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store
                .set(black_box("app.reader.section"), black_box(i))
                .unwrap();
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    bench_set_shallow,
    bench_set_deep,
    bench_get,
    bench_notify_fanout
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use photocache::{ContentCache, ContentHandle, ResourceKey};

fn keys(count: usize) -> Vec<ResourceKey> {
    (0..count)
        .map(|n| ResourceKey::from(format!("/photos/IMG_{n:05}.jpg")))
        .collect()
}

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit", |b| {
        let cache = ContentCache::new();
        let keys = keys(50);
        let data = ContentHandle::new(vec![b'x'; 64 * 1024]);
        for key in &keys {
            cache.put(key.clone(), data.clone());
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(cache.get(&keys[counter % 50]));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_cache_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_miss");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_miss", |b| {
        let cache = ContentCache::new();
        let keys = keys(200);
        let data = ContentHandle::new(vec![b'x'; 1024]);
        // Only the last 50 stay resident
        for key in &keys {
            cache.put(key.clone(), data.clone());
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(cache.get(&keys[counter % 150]));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_evicting_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("evicting_put");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_full_cache", |b| {
        let cache = ContentCache::new();
        let keys = keys(1000);
        let data = ContentHandle::new(vec![b'x'; 1024]);

        let mut counter = 0;
        b.iter(|| {
            black_box(cache.put(keys[counter % 1000].clone(), data.clone()));
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_get, bench_cache_miss, bench_evicting_put);
criterion_main!(benches);

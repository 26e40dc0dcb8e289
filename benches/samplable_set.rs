use criterion::{criterion_group, criterion_main, Criterion};
use maze_tiles::samplable_set::SamplableSet;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_build_set_10k(c: &mut Criterion) {
    c.bench_function("build_set_10k", |b| {
        b.iter(|| (0..10_000).collect::<SamplableSet>())
    });
}

fn bench_sample(c: &mut Criterion) {
    let set: SamplableSet = (0..10_000).collect();
    let mut rng = XorShiftRng::seed_from_u64(1);
    c.bench_function("sample_10k", move |b| {
        b.iter(|| set.sample(&mut rng))
    });
}

fn bench_drain_by_sampling(c: &mut Criterion) {
    c.bench_function("drain_by_sampling_10k", |b| {
        let mut rng = XorShiftRng::seed_from_u64(2);
        b.iter(|| {
            let mut set: SamplableSet = (0..10_000).collect();
            while let Ok(v) = set.sample(&mut rng) {
                let _ = set.remove(v);
            }
        })
    });
}

criterion_group!(benches, bench_build_set_10k, bench_sample, bench_drain_by_sampling);
criterion_main!(benches);

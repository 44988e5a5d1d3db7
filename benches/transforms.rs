//! Benchmarks for field generation and per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use arix::ornaments::compute_transforms;
use arix::prelude::*;

fn bench_compute_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_transforms");
    let dims = SceneConfig::new().dimensions;

    for count in [50u32, 200, 1_000] {
        let mut rng = SmallRng::seed_from_u64(7);
        let field = OrnamentField::generate(
            OrnamentConfig::gold_baubles().with_count(count),
            &dims,
            2.5,
            &mut rng,
        );
        group.bench_with_input(BenchmarkId::new("instances", count), &field, |b, field| {
            b.iter(|| black_box(compute_transforms(field.instances(), black_box(0.4), 1.25)))
        });
    }

    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let dims = SceneConfig::new().dimensions;

    for count in [1_000u32, 15_000] {
        group.bench_with_input(BenchmarkId::new("foliage", count), &count, |b, &count| {
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(11);
                black_box(FoliageField::generate(count, &dims, 2.5, &mut rng))
            })
        });
    }

    group.bench_function("default_scene", |b| {
        let config = SceneConfig::new().with_seed(3);
        b.iter(|| black_box(TreeScene::new(&config)))
    });

    group.finish();
}

fn bench_scene_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_tick");
    let mut scene = TreeScene::new(&SceneConfig::new().with_seed(5));
    let mut frame = 0u32;

    group.bench_function("default_scene", |b| {
        b.iter(|| {
            frame = frame.wrapping_add(1);
            let state = if (frame / 240) % 2 == 0 {
                TreeState::TreeShape
            } else {
                TreeState::Scattered
            };
            black_box(scene.tick(state, FrameTime::new(frame as f32 / 60.0, 1.0 / 60.0)))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_transforms,
    bench_generation,
    bench_scene_tick,
);
criterion_main!(benches);

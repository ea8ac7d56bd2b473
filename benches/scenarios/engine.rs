//! Benchmarks for the complete engine: generation, scheduling and rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodizer::{config::STEPS, Engine, Settings, CHANNELS};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * CHANNELS];

        // Default settings: typical density
        let mut engine = Engine::builder(48_000.0).seed(1).build().unwrap();
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| engine.render(black_box(&mut buffer)))
        });

        // Every step fires in both parts at a fast tempo
        let mut settings = Settings::default();
        settings.melody.probabilities = [1.0; STEPS];
        settings.bass.probabilities = [1.0; STEPS];
        settings.tempo = 240.0;
        let mut busy = Engine::builder(48_000.0)
            .settings(settings)
            .seed(1)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("every_step", size), &size, |b, _| {
            b.iter(|| busy.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}

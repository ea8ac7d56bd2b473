//! Benchmarks for the state-variable filter on drum noise.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodizer::dsp::{Noise, NoiseTint, SVFilter};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let mut noise = Noise::new(NoiseTint::White, 1);
        let input: Vec<f32> = (0..size).map(|_| noise.next_sample()).collect();
        let mut buffer = vec![0.0f32; size];

        // hat-style: bright high-pass
        let mut hat = SVFilter::highpass(10_000.0, 0.1, 48_000.0);
        group.bench_with_input(BenchmarkId::new("highpass_10k", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = hat.process(black_box(x));
                }
            })
        });

        // snare-style: low cutoff, more resonance
        let mut snare = SVFilter::highpass(200.0, 0.5, 48_000.0);
        group.bench_with_input(BenchmarkId::new("highpass_200", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = snare.process(black_box(x));
                }
            })
        });
    }

    group.finish();
}

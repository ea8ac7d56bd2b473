//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodizer::dsp::{AdsrShape, Envelope};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Envelope::new(SAMPLE_RATE);
        env.set_parameters(0.7, AdsrShape::new(10.0, 0.1, 0.7, 0.3));
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = env.next_sample();
                }
                black_box(&buffer);
            })
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::new(SAMPLE_RATE);
        env.set_parameters(0.7, AdsrShape::default());
        env.note_on();
        // Advance past attack/decay
        for _ in 0..2_000 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = env.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}

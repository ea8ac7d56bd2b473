//! Benchmarks for wavetable oscillators and noise.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodizer::dsp::{Noise, NoiseTint, Oscillator, Waveform, Wavetable};
use rand::{rngs::StdRng, SeedableRng};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let mut rng = StdRng::seed_from_u64(0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for waveform in [Waveform::Sine, Waveform::Harmonics32] {
            let table = Wavetable::new(waveform, &mut rng);
            let mut osc = Oscillator::new(table, 440.0, 48_000.0);
            group.bench_with_input(BenchmarkId::new(waveform.label(), size), &size, |b, _| {
                b.iter(|| {
                    for out in buffer.iter_mut() {
                        *out = osc.next_sample();
                    }
                    black_box(&buffer);
                })
            });
        }

        let mut pink = Noise::new(NoiseTint::Pink, 7);
        group.bench_with_input(BenchmarkId::new("pink_noise", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = pink.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}

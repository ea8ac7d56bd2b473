//! Benchmarks for pooled voices rendering into the mixer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodizer::{
    dsp::{AdsrShape, Waveform},
    synth::{orchestra, BusId, Mixer, PoolSizes},
    voices::{Drum, DrumHit, ToneParams},
};
use rand::{rngs::StdRng, SeedableRng};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let (mut pools, mut ensemble) =
            orchestra(48_000.0, PoolSizes::default(), &mut StdRng::seed_from_u64(1)).unwrap();
        let mut mixer = Mixer::new();

        // === DRUM KIT ===
        // one kick, snare and hat ringing at once
        for drum in Drum::ALL {
            let handle = pools.drum(drum).acquire();
            handle.init(DrumHit { amplitude: 0.75 });
            let id = handle.id();
            ensemble.voice_mut(id).unwrap().activate(true);
        }
        group.bench_with_input(BenchmarkId::new("drum_kit", size), &size, |b, _| {
            b.iter(|| {
                mixer.clear(size);
                ensemble.render(black_box(&mut mixer), 0..size);
            })
        });

        // === DENSE MELODY ===
        // a full pool of harmonic tones sounding together (worst case)
        for n in 0..32 {
            let handle = pools.tone(Waveform::Harmonics32).acquire();
            handle.init(ToneParams {
                bus: BusId::Melody,
                frequency: 220.0 + 20.0 * n as f32,
                amplitude: 0.7,
                pan: (n as f32 / 16.0) - 1.0,
                envelope: AdsrShape::default(),
            });
            let id = handle.id();
            ensemble.voice_mut(id).unwrap().activate(true);
        }
        group.bench_with_input(BenchmarkId::new("dense_tones", size), &size, |b, _| {
            b.iter(|| {
                mixer.clear(size);
                ensemble.render(black_box(&mut mixer), 0..size);
            })
        });
    }

    group.finish();
}

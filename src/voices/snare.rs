//! Snare drum body.
//!
//! Pink noise through a resonant high-pass at 200Hz, shaped by a 50ms
//! amplitude sweep. The high-pass strips the rumble so the hit sits above
//! the kick; the resonance adds a little "crack" near the cutoff.

use super::percussion::DrumBody;
use crate::dsp::{Noise, NoiseTint, SVFilter, Sweep};

const CUTOFF_HZ: f32 = 200.0;
const RESONANCE: f32 = 0.5;
const SWEEP_TIME: f32 = 0.05;

pub struct SnareBody {
    noise: Noise,
    filter: SVFilter,
    amplitude: Sweep,
}

impl SnareBody {
    pub fn new(sample_rate: f32, seed: u32) -> Self {
        Self {
            noise: Noise::new(NoiseTint::Pink, seed),
            filter: SVFilter::highpass(CUTOFF_HZ, RESONANCE, sample_rate),
            amplitude: Sweep::new(0.0, sample_rate),
        }
    }
}

impl DrumBody for SnareBody {
    fn strike(&mut self, amplitude: f32) {
        self.amplitude.activate(SWEEP_TIME, amplitude, 0.0);
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        let noise = self.noise.next_sample() * self.amplitude.next_value();
        self.filter.process(noise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_short() {
        let sample_rate = 48_000.0;
        let mut snare = SnareBody::new(sample_rate, 17);
        snare.strike(1.0);

        let samples: Vec<f32> = (0..(sample_rate * 0.1) as usize)
            .map(|_| snare.next_sample())
            .collect();
        let split = (sample_rate * SWEEP_TIME) as usize;

        let energy = |s: &[f32]| s.iter().map(|x| x * x).sum::<f32>();
        assert!(energy(&samples[..split]) > 0.1);
        // Only the filter's ring-out remains after the sweep.
        assert!(energy(&samples[split + 480..]) < 1e-4);
    }
}

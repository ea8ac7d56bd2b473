//! Closed hi-hat body.
//!
//! White noise through a high-pass at 10kHz with a 50ms amplitude sweep.
//! Hits are struck at 80% of the requested amplitude; the bright noise
//! reads much louder than the kick or snare at the same level.

use super::percussion::DrumBody;
use crate::dsp::{Noise, NoiseTint, SVFilter, Sweep};

const CUTOFF_HZ: f32 = 10_000.0;
const RESONANCE: f32 = 0.1;
const SWEEP_TIME: f32 = 0.05;
const LEVEL: f32 = 0.8;

pub struct HatBody {
    noise: Noise,
    filter: SVFilter,
    amplitude: Sweep,
}

impl HatBody {
    pub fn new(sample_rate: f32, seed: u32) -> Self {
        Self {
            noise: Noise::new(NoiseTint::White, seed),
            filter: SVFilter::highpass(CUTOFF_HZ, RESONANCE, sample_rate),
            amplitude: Sweep::new(0.0, sample_rate),
        }
    }
}

impl DrumBody for HatBody {
    fn strike(&mut self, amplitude: f32) {
        self.amplitude.activate(SWEEP_TIME, amplitude * LEVEL, 0.0);
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
    fn struck_at_reduced_level() {
        let sample_rate = 48_000.0;
        let mut hat = HatBody::new(sample_rate, 3);
        hat.strike(1.0);

        let mut noise = Noise::new(NoiseTint::White, 3);
        let mut filter = SVFilter::highpass(CUTOFF_HZ, RESONANCE, sample_rate);
        let mut ramp = Sweep::new(0.0, sample_rate);
        ramp.activate(SWEEP_TIME, LEVEL, 0.0);

        for _ in 0..256 {
            let expected = filter.process(noise.next_sample() * ramp.next_value());
            assert!((hat.next_sample() - expected).abs() < 1e-6);
        }
    }
}

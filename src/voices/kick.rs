//! Kick drum body.
//!
//! A sine oscillator with two linear sweeps armed on every strike:
//!
//! - pitch falls from 120Hz to 20Hz over 100ms, giving the "thump";
//! - amplitude falls from the hit's level to silence over the same 100ms.
//!
//! At rest the oscillator sits at 80Hz with zero amplitude, so a voice left
//! patched after its sweep simply renders silence until released.

use rand::Rng;

use super::percussion::DrumBody;
use crate::dsp::{Oscillator, Sweep, Waveform, Wavetable};

const REST_HZ: f32 = 80.0;
const SWEEP_TIME: f32 = 0.1;
const START_HZ: f32 = 120.0;
const END_HZ: f32 = 20.0;

pub struct KickBody {
    osc: Oscillator,
    pitch: Sweep,
    amplitude: Sweep,
}

impl KickBody {
    pub fn new<R: Rng + ?Sized>(sample_rate: f32, rng: &mut R) -> Self {
        let table = Wavetable::new(Waveform::Sine, rng);
        Self {
            osc: Oscillator::new(table, REST_HZ, sample_rate),
            pitch: Sweep::new(REST_HZ, sample_rate),
            amplitude: Sweep::new(0.0, sample_rate),
        }
    }
}

impl DrumBody for KickBody {
    fn strike(&mut self, amplitude: f32) {
        self.amplitude.activate(SWEEP_TIME, amplitude, 0.0);
        self.pitch.activate(SWEEP_TIME, START_HZ, END_HZ);
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        self.osc.set_frequency(self.pitch.next_value());
        self.osc.next_sample() * self.amplitude.next_value()
    }
}

use std::f32::consts::TAU;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Wavetable Oscillators
=====================

Every tone voice owns one single-cycle table, rendered once when the voice is
built and read with linear interpolation afterwards. Building at startup keeps
the audio thread free of trigonometry and allocation.

Waveform families and their character:

  Sine          fundamental only; soft and round
  Triangle      odd harmonics falling off as 1/n²; mellow
  Saw           every harmonic at 1/n; bright and buzzy
  Square        odd harmonics at 1/n; hollow
  QuarterPulse  25% duty cycle pulse; nasal, reedy
  HarmonicsN    N partials with random amplitudes. Each voice rolls its own
                table, so a pool of these voices is slightly detuned in timbre
                from note to note.

Noise sources feed the snare (pink) and hat (white). They use a xorshift
generator inline so they can run per sample without locking a shared RNG.
*/

/// Table length in samples. Power of two so the phase wrap stays cheap.
pub const WAVETABLE_SIZE: usize = 2048;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
    QuarterPulse,
    Harmonics4,
    Harmonics8,
    Harmonics16,
    Harmonics32,
}

impl Waveform {
    pub const COUNT: usize = 9;

    pub const ALL: [Waveform; Self::COUNT] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::Square,
        Waveform::QuarterPulse,
        Waveform::Harmonics4,
        Waveform::Harmonics8,
        Waveform::Harmonics16,
        Waveform::Harmonics32,
    ];

    /// Position in [`Waveform::ALL`], used to index per-waveform pools.
    pub fn index(self) -> usize {
        match self {
            Waveform::Sine => 0,
            Waveform::Triangle => 1,
            Waveform::Saw => 2,
            Waveform::Square => 3,
            Waveform::QuarterPulse => 4,
            Waveform::Harmonics4 => 5,
            Waveform::Harmonics8 => 6,
            Waveform::Harmonics16 => 7,
            Waveform::Harmonics32 => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Saw => "saw",
            Waveform::Square => "square",
            Waveform::QuarterPulse => "pulse25",
            Waveform::Harmonics4 => "harm4",
            Waveform::Harmonics8 => "harm8",
            Waveform::Harmonics16 => "harm16",
            Waveform::Harmonics32 => "harm32",
        }
    }

    /// Cycle forward through the families (wraps).
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// Cycle backward through the families (wraps).
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }

    fn partials(self) -> Option<usize> {
        match self {
            Waveform::Harmonics4 => Some(4),
            Waveform::Harmonics8 => Some(8),
            Waveform::Harmonics16 => Some(16),
            Waveform::Harmonics32 => Some(32),
            _ => None,
        }
    }
}

/// One cycle of a waveform, normalized to a peak of 1.0.
pub struct Wavetable {
    samples: Vec<f32>,
}

impl Wavetable {
    /// Render a table for `waveform`. The RNG is only used by the
    /// random-harmonic families.
    pub fn new<R: Rng + ?Sized>(waveform: Waveform, rng: &mut R) -> Self {
        let samples = match waveform.partials() {
            Some(count) => {
                let amplitudes: Vec<f32> = (0..count).map(|_| rng.gen_range(-1.0..=1.0)).collect();
                Self::additive(&amplitudes)
            }
            None => (0..WAVETABLE_SIZE)
                .map(|i| Self::basic_shape(waveform, i as f32 / WAVETABLE_SIZE as f32))
                .collect(),
        };

        Self { samples }
    }

    fn basic_shape(waveform: Waveform, phase: f32) -> f32 {
        match waveform {
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::QuarterPulse => {
                if phase < 0.25 {
                    1.0
                } else {
                    -1.0
                }
            }
            _ => (TAU * phase).sin(),
        }
    }

    /// Sum of sine partials 1..=n with the given amplitudes, normalized.
    fn additive(amplitudes: &[f32]) -> Vec<f32> {
        let mut samples: Vec<f32> = (0..WAVETABLE_SIZE)
            .map(|i| {
                let phase = i as f32 / WAVETABLE_SIZE as f32;
                amplitudes
                    .iter()
                    .enumerate()
                    .map(|(n, amp)| amp * (TAU * (n + 1) as f32 * phase).sin())
                    .sum()
            })
            .collect();

        let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        if peak > f32::EPSILON {
            for s in &mut samples {
                *s /= peak;
            }
        } else {
            // Every amplitude rolled to ~0; fall back to a plain sine.
            for (i, s) in samples.iter_mut().enumerate() {
                *s = (TAU * i as f32 / WAVETABLE_SIZE as f32).sin();
            }
        }
        samples
    }

    /// Read the table at `phase` in [0, 1) with linear interpolation.
    #[inline]
    pub fn lookup(&self, phase: f32) -> f32 {
        let position = phase * WAVETABLE_SIZE as f32;
        let index = position as usize % WAVETABLE_SIZE;
        let next = (index + 1) % WAVETABLE_SIZE;
        let frac = position - position.floor();
        self.samples[index] + (self.samples[next] - self.samples[index]) * frac
    }
}

pub struct Oscillator {
    table: Wavetable,
    phase: f32,
    frequency: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(table: Wavetable, frequency: f32, sample_rate: f32) -> Self {
        Self {
            table,
            phase: 0.0,
            frequency,
            sample_rate,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.clamp(0.0, self.sample_rate * 0.5);
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = self.table.lookup(self.phase);
        self.phase += self.frequency / self.sample_rate;
        self.phase -= self.phase.floor();
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseTint {
    White,
    Pink,
}

pub struct Noise {
    tint: NoiseTint,
    state: u32,
    // Paul Kellet's economy pinking filter
    b0: f32,
    b1: f32,
    b2: f32,
}

impl Noise {
    pub fn new(tint: NoiseTint, seed: u32) -> Self {
        Self {
            tint,
            // xorshift must never be seeded with zero
            state: seed.max(1),
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
        }
    }

    #[inline]
    fn white(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let white = self.white();
        match self.tint {
            NoiseTint::White => white,
            NoiseTint::Pink => {
                self.b0 = 0.99765 * self.b0 + white * 0.099_046;
                self.b1 = 0.96300 * self.b1 + white * 0.296_516_4;
                self.b2 = 0.57000 * self.b2 + white * 1.052_691_3;
                (self.b0 + self.b1 + self.b2 + white * 0.1848) * 0.15
            }
        }
    }
}

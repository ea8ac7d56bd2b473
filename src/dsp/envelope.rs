#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_TIME;

/*
ADSR Envelope
=============

Linear attack/decay/sustain/release generator driving the tone voices.

  Level
   peak ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Differences from a textbook ADSR
--------------------------------

  peak        The attack ramps to the note's amplitude instead of 1.0, so a
              quiet note never overshoots its own loudness.

  retrigger   note_on does NOT reset the level. A voice that is borrowed again
              while still ringing ramps from wherever it currently is toward
              the new peak. Jumping back to zero would click.

  release     note_off snapshots the current level and interpolates to 0 over
              the release time, from ANY stage.

The voice owning the envelope watches `is_active()` to know when the release
segment has finished and it may leave its bus.

Slopes
------

The attack uses a fixed slope of `peak / (attack_time * sample_rate)` per
sample. Starting from a non-zero level therefore reaches the peak sooner,
which is what a retrigger should do.
*/

/// Envelope timing and level, as configured per sequencer step.
///
/// `sustain` is a ratio of the note's peak amplitude.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrShape {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl AdsrShape {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Clamp every field into a range the envelope can render.
    pub fn sanitized(self) -> Self {
        let time = |t: f32| if t.is_finite() { t.clamp(0.0, 10.0) } else { 0.0 };
        Self {
            attack: time(self.attack),
            decay: time(self.decay),
            sustain: if self.sustain.is_finite() {
                self.sustain.clamp(0.0, 1.0)
            } else {
                0.0
            },
            release: time(self.release),
        }
    }
}

impl Default for AdsrShape {
    /// Short pluck: 10ms attack, 10ms decay, 70% sustain, 200ms release.
    fn default() -> Self {
        Self::new(0.01, 0.01, 0.7, 0.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // inactive, level = 0
    Attack,  // ramping toward peak
    Decay,   // ramping from peak to sustain
    Sustain, // holding while the gate is high
    Release, // ramping to 0
}

pub struct Envelope {
    sample_rate: f32,

    peak: f32,
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    stage: EnvelopeState,
    level: f32,

    decay_start_level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            sample_rate,
            peak: 1.0,
            attack_time: MIN_TIME,
            decay_time: MIN_TIME,
            sustain_level: 0.7,
            release_time: MIN_TIME,

            stage: EnvelopeState::Idle,
            level: 0.0,
            decay_start_level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        };
        env.set_parameters(1.0, AdsrShape::default());
        env
    }

    /// Set the peak amplitude and shape used by the next `note_on`.
    ///
    /// Safe to call while the envelope is running; the current level is kept.
    pub fn set_parameters(&mut self, peak: f32, shape: AdsrShape) {
        let shape = shape.sanitized();
        self.peak = peak.clamp(0.0, 1.0);
        self.attack_time = shape.attack.max(MIN_TIME);
        self.decay_time = shape.decay.max(MIN_TIME);
        self.sustain_level = self.peak * shape.sustain;
        self.release_time = shape.release.max(MIN_TIME);
    }

    /// Gate high: ramp from the current level toward the peak.
    pub fn note_on(&mut self) {
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    /// Gate low: start the release phase from the current level.
    pub fn note_off(&mut self) {
        if matches!(self.stage, EnvelopeState::Idle) {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * self.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    /// Advance by one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                let increment = self.peak / (self.attack_time * self.sample_rate);
                self.level += increment;

                if self.level >= self.peak {
                    self.level = self.peak;
                    self.decay_start_level = self.peak;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let target = self.sustain_level;
                let total_drop = self.decay_start_level - target;
                let decrement = total_drop / (self.decay_time * self.sample_rate);
                self.level -= decrement;

                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Returns true until the release segment has run out.
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn render_samples(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    #[test]
    fn attack_reaches_note_peak() {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.set_parameters(0.6, AdsrShape::new(0.01, 0.1, 0.7, 0.2));

        env.note_on();
        render_samples(&mut env, (0.01 * SAMPLE_RATE) as usize + 1);

        assert!((env.level() - 0.6).abs() < 0.01, "expected attack to stop at the peak");
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn sustain_is_relative_to_peak() {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.set_parameters(0.8, AdsrShape::new(0.01, 0.05, 0.5, 0.2));

        env.note_on();
        render_samples(&mut env, ((0.01 + 0.05) * SAMPLE_RATE) as usize + 5);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - 0.4).abs() < 0.01);
    }

    #[test]
    fn retrigger_continues_from_current_level() {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.set_parameters(0.8, AdsrShape::new(0.01, 0.01, 0.5, 0.5));

        env.note_on();
        render_samples(&mut env, 40);
        env.note_off();
        render_samples(&mut env, 50);
        let before = env.level();
        assert!(before > 0.0, "release should still be ringing");

        env.note_on();
        let after = env.next_sample();

        assert!(after >= before, "retrigger must not drop back to zero");
        assert!(after - before < 0.1, "retrigger must ramp, not jump");
    }

    #[test]
    fn release_falls_back_to_idle() {
        let release = 0.03;
        let mut env = Envelope::new(SAMPLE_RATE);
        env.set_parameters(0.7, AdsrShape::new(0.01, 0.05, 0.5, release));

        env.note_on();
        render_samples(&mut env, 20);

        env.note_off();
        render_samples(&mut env, (release * SAMPLE_RATE) as usize + 2);

        assert!(env.level() <= 0.001, "release should fall back to zero");
        assert!(!env.is_active());
    }

    #[test]
    fn note_off_while_idle_stays_idle() {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn shape_sanitizing_clamps_garbage() {
        let shape = AdsrShape::new(-1.0, f32::NAN, 3.0, 0.5).sanitized();
        assert_eq!(shape.attack, 0.0);
        assert_eq!(shape.decay, 0.0);
        assert_eq!(shape.sustain, 1.0);
        assert_eq!(shape.release, 0.5);
    }
}

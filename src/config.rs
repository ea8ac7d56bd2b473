//! Configuration surface read by the pattern generator.
//!
//! Everything here is plain data. [`Settings::sanitized`] is the single
//! place out-of-range values are clamped; the engine calls it whenever new
//! settings are applied, so the generator never sees an invalid value.
//! Edits take effect from the next measure.

use log::warn;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{AdsrShape, Waveform},
    sequencing::ScaleId,
    voices::{Category, Drum},
};

/// Steps in one measure's grid (sixteenth notes of a 4-beat measure).
pub const STEPS: usize = 16;

pub const TEMPO_MIN: f32 = 1.0;
pub const TEMPO_MAX: f32 = 960.0;
pub const SHUFFLE_MAX: f32 = 0.2;
pub const KEY_RANGE: i32 = 12;
pub const OCTAVE_MAX: i32 = 9;

/// Octaves a part draws from: `low` inclusive, `high` exclusive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctaveRange {
    pub low: i32,
    pub high: i32,
}

impl OctaveRange {
    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    fn sanitized(self) -> Self {
        let (low, high) = if self.low <= self.high {
            (self.low, self.high)
        } else {
            (self.high, self.low)
        };
        Self {
            low: low.clamp(0, OCTAVE_MAX),
            high: high.clamp(0, OCTAVE_MAX),
        }
    }
}

/// One tonal part (melody or bass).
///
/// A part table that omits fields in a config file is completed from the
/// melody defaults.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct PartSettings {
    /// Chance in [0, 1] that each step fires.
    pub probabilities: [f32; STEPS],
    pub waveform: Waveform,
    pub octaves: OctaveRange,
    /// Maximum random pan spread; 0 keeps the part centred.
    pub pan_range: f32,
    /// Envelope applied to the note fired by each step.
    pub envelopes: [AdsrShape; STEPS],
}

impl PartSettings {
    pub fn melody() -> Self {
        Self {
            probabilities: [
                0.6, 0.1, 0.3, 0.2, 0.5, 0.1, 0.3, 0.2, 0.6, 0.1, 0.3, 0.2, 0.5, 0.1, 0.4, 0.3,
            ],
            waveform: Waveform::Harmonics4,
            octaves: OctaveRange::new(5, 7),
            pan_range: 0.8,
            envelopes: [AdsrShape::default(); STEPS],
        }
    }

    pub fn bass() -> Self {
        Self {
            probabilities: [
                0.8, 0.0, 0.1, 0.0, 0.3, 0.0, 0.2, 0.1, 0.6, 0.0, 0.1, 0.0, 0.3, 0.0, 0.2, 0.1,
            ],
            waveform: Waveform::Triangle,
            octaves: OctaveRange::new(2, 5),
            pan_range: 0.0,
            envelopes: [AdsrShape::default(); STEPS],
        }
    }

    fn sanitized(&self) -> Self {
        let mut probabilities = self.probabilities;
        for p in &mut probabilities {
            *p = unit(*p);
        }
        let mut envelopes = self.envelopes;
        for shape in &mut envelopes {
            *shape = shape.sanitized();
        }
        Self {
            probabilities,
            waveform: self.waveform,
            octaves: self.octaves.sanitized(),
            pan_range: if self.pan_range.is_finite() {
                self.pan_range.clamp(0.0, 1.0)
            } else {
                0.0
            },
            envelopes,
        }
    }

    /// Nudge one step's probability, keeping it in [0, 1].
    pub fn adjust_probability(&mut self, step: usize, delta: f32) {
        if let Some(p) = self.probabilities.get_mut(step) {
            *p = unit(*p + delta);
        }
    }
}

impl Default for PartSettings {
    fn default() -> Self {
        Self::melody()
    }
}

/// Per-drum mute switches. Tones are always enabled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    pub kick: bool,
    pub snare: bool,
    pub hat: bool,
}

impl Toggles {
    pub fn allows(&self, category: Category) -> bool {
        match category {
            Category::Drum(drum) => self.drum(drum),
            Category::Tone(_) => true,
        }
    }

    pub fn drum(&self, drum: Drum) -> bool {
        match drum {
            Drum::Kick => self.kick,
            Drum::Snare => self.snare,
            Drum::Hat => self.hat,
        }
    }

    pub fn toggle(&mut self, drum: Drum) {
        let flag = match drum {
            Drum::Kick => &mut self.kick,
            Drum::Snare => &mut self.snare,
            Drum::Hat => &mut self.hat,
        };
        *flag = !*flag;
    }
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            kick: true,
            snare: true,
            hat: true,
        }
    }
}

/// Chances of the two optional kicks in the drum template.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickFills {
    /// Off-beat kick at beat 0.5.
    pub pickup: f32,
    /// Quiet kick on the last sixteenth, leading into the next measure.
    pub ghost: f32,
}

impl Default for KickFills {
    fn default() -> Self {
        Self {
            pickup: 0.3,
            ghost: 0.2,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub melody: PartSettings,
    pub bass: PartSettings,
    pub scale: ScaleId,
    /// Transposition in semitones.
    pub key: i32,
    /// Beats per minute, applied at the next measure boundary.
    pub tempo: f32,
    /// Delay in beats added to even-indexed steps.
    pub shuffle: f32,
    pub toggles: Toggles,
    pub kick_fills: KickFills,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            melody: PartSettings::melody(),
            bass: PartSettings::bass(),
            scale: ScaleId::Major,
            key: 0,
            tempo: 110.0,
            shuffle: 0.05,
            toggles: Toggles::default(),
            kick_fills: KickFills::default(),
        }
    }
}

impl Settings {
    /// Clamp every field into its valid range, logging if anything moved.
    pub fn sanitized(&self) -> Self {
        let clean = Self {
            melody: self.melody.sanitized(),
            bass: self.bass.sanitized(),
            scale: self.scale,
            key: self.key.clamp(-KEY_RANGE, KEY_RANGE),
            tempo: if self.tempo.is_finite() {
                self.tempo.clamp(TEMPO_MIN, TEMPO_MAX)
            } else {
                TEMPO_MIN
            },
            shuffle: if self.shuffle.is_finite() {
                self.shuffle.clamp(0.0, SHUFFLE_MAX)
            } else {
                0.0
            },
            toggles: self.toggles,
            kick_fills: KickFills {
                pickup: unit(self.kick_fills.pickup),
                ghost: unit(self.kick_fills.ghost),
            },
        };

        if clean != *self {
            warn!("settings out of range were clamped");
        }
        clean
    }
}

/// Clamp to [0, 1]; NaN becomes 0.
fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_already_clean() {
        let settings = Settings::default();
        assert_eq!(settings.sanitized(), settings);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let mut settings = Settings::default();
        settings.tempo = 5_000.0;
        settings.shuffle = -1.0;
        settings.key = 40;
        settings.melody.probabilities[0] = 1.5;
        settings.melody.probabilities[1] = f32::NAN;
        settings.bass.octaves = OctaveRange::new(12, 3);
        settings.kick_fills.ghost = -0.5;

        let clean = settings.sanitized();
        assert_eq!(clean.tempo, TEMPO_MAX);
        assert_eq!(clean.shuffle, 0.0);
        assert_eq!(clean.key, KEY_RANGE);
        assert_eq!(clean.melody.probabilities[0], 1.0);
        assert_eq!(clean.melody.probabilities[1], 0.0);
        assert_eq!(clean.bass.octaves, OctaveRange::new(3, OCTAVE_MAX));
        assert_eq!(clean.kick_fills.ghost, 0.0);
    }

    #[test]
    fn nan_tempo_falls_back_to_minimum() {
        let settings = Settings {
            tempo: f32::NAN,
            ..Settings::default()
        };
        assert_eq!(settings.sanitized().tempo, TEMPO_MIN);
    }

    #[test]
    fn toggles_only_gate_drums() {
        let mut toggles = Toggles::default();
        toggles.toggle(Drum::Snare);
        assert!(!toggles.allows(Category::Drum(Drum::Snare)));
        assert!(toggles.allows(Category::Drum(Drum::Kick)));
        assert!(toggles.allows(Category::Tone(Waveform::Saw)));
    }

    #[test]
    fn probability_edits_stay_in_range() {
        let mut part = PartSettings::bass();
        part.adjust_probability(0, 0.5);
        part.adjust_probability(1, -0.5);
        part.adjust_probability(STEPS, 0.5);
        assert_eq!(part.probabilities[0], 1.0);
        assert_eq!(part.probabilities[1], 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_toml_fills_in_defaults() {
        let text = "tempo = 90.0\nkey = -3\n[toggles]\nhat = false\n";
        let settings: Settings = toml::from_str(text).unwrap();
        assert_eq!(settings.tempo, 90.0);
        assert_eq!(settings.key, -3);
        assert!(!settings.toggles.hat);
        assert!(settings.toggles.kick);
        assert_eq!(settings.bass, PartSettings::bass());
    }
}

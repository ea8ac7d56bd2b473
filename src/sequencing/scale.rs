use rand::{Rng, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pitch source consulted by the pattern generator.
///
/// Indices address degrees of the scale; [`ScaleSource::semitone`] maps a
/// degree to semitones above the key.
pub trait ScaleSource {
    fn len(&self) -> usize;

    fn semitone(&self, index: usize) -> i32;

    /// Choose the degree following `previous`.
    fn next_note_index(&self, previous: usize, rng: &mut dyn RngCore) -> usize;
}

/// A named set of semitone offsets, lowest first.
#[derive(Debug)]
pub struct Scale {
    pub name: &'static str,
    pub semitones: &'static [i32],
}

/// Largest jump, in scale degrees, between consecutive notes.
const MAX_STEP: i64 = 2;

impl ScaleSource for Scale {
    fn len(&self) -> usize {
        self.semitones.len()
    }

    fn semitone(&self, index: usize) -> i32 {
        self.semitones
            .get(index.min(self.semitones.len().saturating_sub(1)))
            .copied()
            .unwrap_or(0)
    }

    /// Random walk of up to two degrees either way, reflected at the ends of
    /// the scale so the melody turns around instead of sticking to an edge.
    fn next_note_index(&self, previous: usize, rng: &mut dyn RngCore) -> usize {
        let last = self.semitones.len().saturating_sub(1) as i64;
        if last == 0 {
            return 0;
        }

        let previous = (previous as i64).min(last);
        let mut next = previous + rng.gen_range(-MAX_STEP..=MAX_STEP);
        if next < 0 {
            next = -next;
        }
        if next > last {
            next = 2 * last - next;
        }
        next.clamp(0, last) as usize
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleId {
    Major,
    NaturalMinor,
    HarmonicMinor,
    Dorian,
    Phrygian,
    Mixolydian,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
}

impl ScaleId {
    pub const COUNT: usize = 9;

    pub const ALL: [ScaleId; Self::COUNT] = [
        ScaleId::Major,
        ScaleId::NaturalMinor,
        ScaleId::HarmonicMinor,
        ScaleId::Dorian,
        ScaleId::Phrygian,
        ScaleId::Mixolydian,
        ScaleId::MajorPentatonic,
        ScaleId::MinorPentatonic,
        ScaleId::Blues,
    ];

    pub fn index(self) -> usize {
        match self {
            ScaleId::Major => 0,
            ScaleId::NaturalMinor => 1,
            ScaleId::HarmonicMinor => 2,
            ScaleId::Dorian => 3,
            ScaleId::Phrygian => 4,
            ScaleId::Mixolydian => 5,
            ScaleId::MajorPentatonic => 6,
            ScaleId::MinorPentatonic => 7,
            ScaleId::Blues => 8,
        }
    }

    pub fn scale(self) -> &'static Scale {
        &SCALE_BOOK[self.index()]
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }
}

/// Built-in scales, indexed by [`ScaleId::index`].
pub static SCALE_BOOK: [Scale; ScaleId::COUNT] = [
    Scale { name: "major", semitones: &[0, 2, 4, 5, 7, 9, 11, 12] },
    Scale { name: "minor", semitones: &[0, 2, 3, 5, 7, 8, 10, 12] },
    Scale { name: "harmonic minor", semitones: &[0, 2, 3, 5, 7, 8, 11, 12] },
    Scale { name: "dorian", semitones: &[0, 2, 3, 5, 7, 9, 10, 12] },
    Scale { name: "phrygian", semitones: &[0, 1, 3, 5, 7, 8, 10, 12] },
    Scale { name: "mixolydian", semitones: &[0, 2, 4, 5, 7, 9, 10, 12] },
    Scale { name: "major pentatonic", semitones: &[0, 2, 4, 7, 9, 12] },
    Scale { name: "minor pentatonic", semitones: &[0, 3, 5, 7, 10, 12] },
    Scale { name: "blues", semitones: &[0, 3, 5, 6, 7, 10, 12] },
];

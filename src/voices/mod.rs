//! Pooled voices: the three drums and the wavetable tone.
//!
//! Every voice has the same two-phase lifecycle. Note parameters are pushed
//! onto the voice's private queue by [`crate::synth::VoiceHandle::init`] when
//! the measure is generated, and popped in order by [`Voice::activate`] when
//! the scheduler reaches the note. [`Voice::release`] ends the note.
//!
//! ```text
//!            init(params)          activate()             release()
//!   pool ───────────────▶ queue ───────────────▶ Sounding ───────────▶ Idle
//!                          FIFO      pops front
//! ```
//!
//! A voice is handed back to the pool tail the moment its parameters are
//! queued, so it may be borrowed again long before it has sounded. The queue
//! is what keeps every parameter set matched to the activation it was meant
//! for.

mod hat;
mod kick;
mod percussion;
mod queue;
mod snare;
mod tone;

pub use hat::HatBody;
pub use kick::KickBody;
pub use percussion::{DrumBody, PercussionVoice};
pub use queue::{param_queue, queue_capacity, ParamReceiver, ParamSender, QUEUE_CAPACITY};
pub use snare::SnareBody;
pub use tone::{Connection, ToneVoice};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{AdsrShape, Waveform},
    synth::BusId,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drum {
    Kick,
    Snare,
    Hat,
}

impl Drum {
    pub const COUNT: usize = 3;
    pub const ALL: [Drum; Self::COUNT] = [Drum::Kick, Drum::Snare, Drum::Hat];

    pub fn index(self) -> usize {
        match self {
            Drum::Kick => 0,
            Drum::Snare => 1,
            Drum::Hat => 2,
        }
    }

    /// How long the scheduler holds a hit before releasing it, in beats.
    pub fn hold_beats(self) -> f32 {
        match self {
            Drum::Kick | Drum::Snare => 0.3,
            Drum::Hat => 0.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Drum::Kick => "kick",
            Drum::Snare => "snare",
            Drum::Hat => "hat",
        }
    }
}

/// Which pool a voice belongs to: one per drum, one per waveform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Drum(Drum),
    Tone(Waveform),
}

impl Category {
    pub const COUNT: usize = Drum::COUNT + Waveform::COUNT;

    /// Dense index: drums first, then waveform families.
    pub fn index(self) -> usize {
        match self {
            Category::Drum(drum) => drum.index(),
            Category::Tone(waveform) => Drum::COUNT + waveform.index(),
        }
    }
}

/// Stable identity of a pooled voice, reused across notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId {
    pub category: Category,
    pub slot: usize,
}

impl VoiceId {
    pub fn new(category: Category, slot: usize) -> Self {
        Self { category, slot }
    }
}

/// Parameters of one drum hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumHit {
    pub amplitude: f32,
}

/// Parameters of one tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    pub bus: BusId,
    pub frequency: f32,
    pub amplitude: f32,
    pub pan: f32,
    pub envelope: AdsrShape,
}

/// A pooled sound source driven by the scheduler.
///
/// Implementations render additively into the stereo buffers of the bus
/// they are currently patched into; a voice reporting `output() == None`
/// must not be rendered.
pub trait Voice: Send {
    fn id(&self) -> VoiceId;

    /// Pop the oldest queued parameter set and start sounding it.
    ///
    /// With `enabled == false` the parameters are still consumed but nothing
    /// connects, so a muted category keeps its queues in step.
    fn activate(&mut self, enabled: bool);

    /// End the current note. No-op when the voice is idle.
    fn release(&mut self);

    /// The bus this voice is rendering into, if any.
    fn output(&self) -> Option<BusId>;

    /// Add the next `left.len()` frames into the given bus buffers.
    fn render(&mut self, left: &mut [f32], right: &mut [f32]);

    fn is_sounding(&self) -> bool;

    /// Parameter sets queued but not yet activated.
    fn pending(&self) -> usize;
}

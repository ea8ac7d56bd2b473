//! Generative rhythm and melody engine.
//!
//! Every measure the pattern generator decides which drums and tones fire,
//! borrows voices from fixed round-robin pools, queues the note parameters on
//! them and hands activate/release events to the note scheduler. Voices are
//! allocated once at startup; nothing on the render path allocates.

pub mod config; // Configuration surface and clamping
pub mod dsp; // Signal primitives used inside voices
pub mod engine; // Scheduler, measure loop, block rendering
pub mod error;
pub mod sequencing; // Pitch, scales, drum template, pattern generation
pub mod synth; // Voice pools, ensemble, mixer
pub mod voices; // Kick, snare, hat and tone voices

pub use config::Settings;
pub use engine::{Engine, EngineBuilder, EngineStatus};
pub use error::EngineError;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Output is always interleaved stereo.
pub const CHANNELS: usize = 2;

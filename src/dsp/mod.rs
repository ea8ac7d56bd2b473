//! Low-level signal primitives used inside the voices.
//!
//! Everything here is allocation-free once constructed, so these structs can
//! live directly inside pooled voices and run on the audio thread. They only
//! cover what the drum and tone voices need: the scheduling core treats them
//! as opaque sound sources.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable high-pass used to shape the noise drums.
pub mod filter;
/// Wavetable oscillators and noise sources.
pub mod oscillator;
/// Equal-power stereo panning.
pub mod pan;
/// Linear parameter ramps for drum sweeps.
pub mod sweep;

pub use envelope::{AdsrShape, Envelope, EnvelopeState};
pub use filter::SVFilter;
pub use oscillator::{Noise, NoiseTint, Oscillator, Waveform, Wavetable};
pub use sweep::Sweep;

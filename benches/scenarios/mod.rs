//! Real-world scenario benchmarks.
//!
//! Pooled voices rendered through the ensemble, and the complete engine
//! generating and playing measures.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;

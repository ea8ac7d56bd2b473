pub mod drums;
pub mod generator;
pub mod pitch;
pub mod scale;

pub use drums::{max_hits, play_drum_template};
pub use generator::{random_between, MeasureSummary, MelodicContour, PatternGenerator};
pub use pitch::midi_to_hz;
pub use scale::{Scale, ScaleId, ScaleSource, SCALE_BOOK};

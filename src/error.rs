use std::fmt;

use crate::voices::Category;

/// Errors raised while assembling an [`crate::Engine`].
///
/// Nothing on the render path returns an error; invariant breaks there are
/// logged and the offending event dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Sample rate must be finite and positive.
    InvalidSampleRate(f32),
    /// Every category needs at least one voice to borrow.
    EmptyPool(Category),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidSampleRate(rate) => {
                write!(f, "Invalid sample rate {rate}: must be finite and positive")
            }
            EngineError::EmptyPool(category) => {
                write!(f, "Voice pool for {category:?} is empty")
            }
        }
    }
}

impl std::error::Error for EngineError {}

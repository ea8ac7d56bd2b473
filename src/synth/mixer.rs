use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CHANNELS, MAX_BLOCK_SIZE};

/// Destination bus a voice renders into.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusId {
    Melody,
    Bass,
    Drums,
}

impl BusId {
    pub const COUNT: usize = 3;
    pub const ALL: [BusId; Self::COUNT] = [BusId::Melody, BusId::Bass, BusId::Drums];

    pub fn index(self) -> usize {
        match self {
            BusId::Melody => 0,
            BusId::Bass => 1,
            BusId::Drums => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BusId::Melody => "mel",
            BusId::Bass => "bass",
            BusId::Drums => "drums",
        }
    }
}

struct Bus {
    left: Vec<f32>,
    right: Vec<f32>,
    gain: f32,
}

/// Three stereo summing buses folded into one interleaved output.
pub struct Mixer {
    buses: [Bus; BusId::COUNT],
}

impl Mixer {
    pub fn new() -> Self {
        let bus = || Bus {
            left: vec![0.0; MAX_BLOCK_SIZE],
            right: vec![0.0; MAX_BLOCK_SIZE],
            gain: 1.0,
        };
        Self {
            buses: [bus(), bus(), bus()],
        }
    }

    pub fn set_gain(&mut self, bus: BusId, gain: f32) {
        self.buses[bus.index()].gain = gain.max(0.0);
    }

    pub fn gain(&self, bus: BusId) -> f32 {
        self.buses[bus.index()].gain
    }

    /// Zero the first `frames` frames of every bus.
    pub fn clear(&mut self, frames: usize) {
        for bus in &mut self.buses {
            bus.left[..frames].fill(0.0);
            bus.right[..frames].fill(0.0);
        }
    }

    /// Left and right slices of one bus over `range` (in frames).
    pub fn bus_mut(&mut self, bus: BusId, range: Range<usize>) -> (&mut [f32], &mut [f32]) {
        let bus = &mut self.buses[bus.index()];
        (&mut bus.left[range.clone()], &mut bus.right[range])
    }

    /// Sum the buses into interleaved stereo, hard-clipped to [-1, 1].
    pub fn mix_into(&self, out: &mut [f32]) {
        let frames = out.len() / CHANNELS;
        debug_assert!(frames <= MAX_BLOCK_SIZE);

        for (frame, pair) in out.chunks_exact_mut(CHANNELS).enumerate().take(frames) {
            let (mut left, mut right) = (0.0, 0.0);
            for bus in &self.buses {
                left += bus.left[frame] * bus.gain;
                right += bus.right[frame] * bus.gain;
            }
            pair[0] = left.clamp(-1.0, 1.0);
            pair[1] = right.clamp(-1.0, 1.0);
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

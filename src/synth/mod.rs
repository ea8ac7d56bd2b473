// Purpose: voice pools, the rendering ensemble and the bus mixer.
// Pools are the generator's side of every voice, the ensemble is the
// scheduler's side; they share one parameter queue per voice.

pub mod ensemble;
pub mod mixer;
pub mod pool;

pub use ensemble::{orchestra, Ensemble, Section};
pub use mixer::{BusId, Mixer};
pub use pool::{VoiceHandle, VoicePool};

use crate::{
    dsp::Waveform,
    voices::{Drum, DrumHit, ToneParams},
};

/// Voices allocated per pool at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizes {
    pub kick: usize,
    pub snare: usize,
    pub hat: usize,
    /// Per waveform family.
    pub tone: usize,
}

impl PoolSizes {
    pub fn drum(&self, drum: Drum) -> usize {
        match drum {
            Drum::Kick => self.kick,
            Drum::Snare => self.snare,
            Drum::Hat => self.hat,
        }
    }
}

impl Default for PoolSizes {
    fn default() -> Self {
        Self {
            kick: 3,
            snare: 3,
            hat: 3,
            tone: 32,
        }
    }
}

/// Every pool the pattern generator borrows from.
pub struct Pools {
    drums: Vec<VoicePool<DrumHit>>,
    tones: Vec<VoicePool<ToneParams>>,
}

impl Pools {
    /// Pools wired to caller-held receivers, for inspecting queued params.
    #[cfg(test)]
    pub(crate) fn from_parts(
        drums: Vec<VoicePool<DrumHit>>,
        tones: Vec<VoicePool<ToneParams>>,
    ) -> Self {
        Self { drums, tones }
    }

    pub fn drum(&mut self, drum: Drum) -> &mut VoicePool<DrumHit> {
        &mut self.drums[drum.index()]
    }

    pub fn tone(&mut self, waveform: Waveform) -> &mut VoicePool<ToneParams> {
        &mut self.tones[waveform.index()]
    }
}

//! Block renderer tying the scheduling core to audio output.
//!
//! The engine owns both sides of every voice: the pools the generator
//! borrows from and the ensemble the scheduler activates. Each call to
//! [`Engine::render`] walks the block in segments split at the sample times
//! of pending actions, so activations and releases land sample-accurately
//! while voices still render in runs.

pub mod looper;
pub mod scheduler;

pub use looper::{Looper, MeasureState, BEATS_PER_MEASURE};
pub use scheduler::{Action, NoteScheduler, Sequencer};

use log::{error, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::Settings,
    error::EngineError,
    sequencing::{MeasureSummary, PatternGenerator},
    synth::{orchestra, BusId, Ensemble, Mixer, PoolSizes, Pools},
    voices::{Voice, VoiceId},
    CHANNELS, MAX_BLOCK_SIZE,
};

pub struct EngineBuilder {
    sample_rate: f32,
    settings: Settings,
    pool_sizes: PoolSizes,
    seed: Option<u64>,
}

impl EngineBuilder {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            settings: Settings::default(),
            pool_sizes: PoolSizes::default(),
            seed: None,
        }
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn pool_sizes(mut self, sizes: PoolSizes) -> Self {
        self.pool_sizes = sizes;
        self
    }

    /// Pin every random choice (wavetables, noise, patterns) to `seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Engine, EngineError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }

        let (mut voice_rng, pattern_rng) = match self.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed.wrapping_add(1)),
                StdRng::seed_from_u64(seed),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        let (pools, ensemble) = orchestra(self.sample_rate, self.pool_sizes, &mut voice_rng)?;
        let settings = self.settings.sanitized();
        let mut sequencer = Sequencer::new(self.sample_rate, settings.tempo);
        let mut looper = Looper::new();
        looper.arm(&mut sequencer);

        info!("engine ready at {} Hz, {} bpm", self.sample_rate, settings.tempo);

        Ok(Engine {
            sample_rate: self.sample_rate,
            settings,
            generator: PatternGenerator::new(pattern_rng),
            pools,
            ensemble,
            sequencer,
            looper,
            mixer: Mixer::new(),
            paused: false,
            last_measure: MeasureSummary::default(),
        })
    }
}

/// Snapshot of the engine for displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStatus {
    pub measures: u64,
    pub state: MeasureState,
    /// Beats into the current measure.
    pub beat: f32,
    pub tempo: f32,
    pub sounding: usize,
    /// Activations, releases and measure marks still queued.
    pub pending_events: usize,
    /// Indexed by [`BusId::index`].
    pub bus_gains: [f32; BusId::COUNT],
    pub last_measure: MeasureSummary,
    pub paused: bool,
}

pub struct Engine {
    sample_rate: f32,
    settings: Settings,
    generator: PatternGenerator,
    pools: Pools,
    ensemble: Ensemble,
    sequencer: Sequencer,
    looper: Looper,
    mixer: Mixer,
    paused: bool,
    last_measure: MeasureSummary,
}

impl Engine {
    pub fn builder(sample_rate: f32) -> EngineBuilder {
        EngineBuilder::new(sample_rate)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. They take effect at the next measure; drum
    /// toggles apply from the next activation.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
    }

    /// Edit the settings in place.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut Settings)) {
        let mut settings = self.settings.clone();
        edit(&mut settings);
        self.set_settings(settings);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Scale one bus before the final mix. Negative gains are treated as 0.
    pub fn set_bus_gain(&mut self, bus: BusId, gain: f32) {
        self.mixer.set_gain(bus, gain);
    }

    pub fn bus_gain(&self, bus: BusId) -> f32 {
        self.mixer.gain(bus)
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            measures: self.looper.measures(),
            state: self.looper.state(),
            beat: self.sequencer.beat_position(),
            tempo: self.sequencer.tempo(),
            sounding: self.ensemble.sounding(),
            pending_events: self.sequencer.pending(),
            bus_gains: BusId::ALL.map(|bus| self.mixer.gain(bus)),
            last_measure: self.last_measure,
            paused: self.paused,
        }
    }

    /// Fill `out` with interleaved stereo. A paused engine outputs silence
    /// and holds its clock.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.paused {
            out.fill(0.0);
            return;
        }

        for block in out.chunks_mut(MAX_BLOCK_SIZE * CHANNELS) {
            let frames = block.len() / CHANNELS;
            self.render_block(frames);
            self.mixer.mix_into(block);
            // Odd trailing sample of a malformed buffer
            block[frames * CHANNELS..].fill(0.0);
        }
    }

    fn render_block(&mut self, frames: usize) {
        self.mixer.clear(frames);

        let mut position = 0;
        while position < frames {
            self.dispatch_due();

            let remaining = (frames - position) as u64;
            let until_next = self
                .sequencer
                .next_due()
                .map(|at| at.saturating_sub(self.sequencer.now()))
                .unwrap_or(remaining);
            let run = until_next.clamp(1, remaining) as usize;

            self.ensemble.render(&mut self.mixer, position..position + run);
            self.sequencer.advance(run as u64);
            position += run;
        }
    }

    fn dispatch_due(&mut self) {
        while let Some(action) = self.sequencer.pop_due() {
            match action {
                Action::EndMeasure => {
                    self.looper.end_measure(&mut self.sequencer, self.settings.tempo);
                }
                Action::StartMeasure => {
                    let Self {
                        generator,
                        settings,
                        pools,
                        looper,
                        sequencer,
                        last_measure,
                        ..
                    } = self;
                    let scale = settings.scale.scale();
                    *last_measure = looper.start_measure(sequencer, |sequencer| {
                        generator.generate_measure(settings, scale, pools, sequencer)
                    });
                }
                Action::Activate(id) => {
                    let enabled = self.settings.toggles.allows(id.category);
                    self.with_voice(id, |voice| voice.activate(enabled));
                }
                Action::Release(id) => {
                    self.with_voice(id, |voice| voice.release());
                }
            }
        }
    }

    fn with_voice(&mut self, id: VoiceId, f: impl FnOnce(&mut dyn Voice)) {
        match self.ensemble.voice_mut(id) {
            Some(voice) => f(voice),
            None => {
                debug_assert!(false, "scheduled unknown voice {id:?}");
                error!("scheduled unknown voice {id:?}; dropping the event");
            }
        }
    }
}

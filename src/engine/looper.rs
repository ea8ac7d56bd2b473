use log::{debug, warn};

use super::scheduler::{Action, NoteScheduler, Sequencer};

/// Beats in one generated measure.
pub const BEATS_PER_MEASURE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureState {
    /// Waiting for the scheduler to reach the next measure boundary.
    AwaitingMeasure,
    /// Inside the measure callback; triggers are being queued.
    Generating,
    /// This measure's triggers are all handed to the scheduler.
    Scheduled,
}

/// Drives the once-per-measure generation cycle.
///
/// The cycle re-arms itself: handling an [`Action::EndMeasure`] queues the
/// next [`Action::StartMeasure`] on the same sample and the following
/// `EndMeasure` one measure later, at the tempo current at the boundary.
pub struct Looper {
    state: MeasureState,
    measures: u64,
}

impl Looper {
    pub fn new() -> Self {
        Self {
            state: MeasureState::AwaitingMeasure,
            measures: 0,
        }
    }

    /// Queue the first boundary at the sequencer's current time.
    pub fn arm(&mut self, sequencer: &mut Sequencer) {
        sequencer.post(sequencer.now(), Action::EndMeasure);
    }

    pub fn state(&self) -> MeasureState {
        self.state
    }

    /// Measures generated so far.
    pub fn measures(&self) -> u64 {
        self.measures
    }

    /// Measure boundary: apply `tempo` and schedule the next cycle.
    pub fn end_measure(&mut self, sequencer: &mut Sequencer, tempo: f32) {
        if (sequencer.tempo() - tempo).abs() > f32::EPSILON {
            debug!("tempo {} -> {} bpm", sequencer.tempo(), tempo);
        }
        sequencer.set_tempo(tempo);
        sequencer.post(sequencer.now(), Action::StartMeasure);
        sequencer.post_in_beats(BEATS_PER_MEASURE, Action::EndMeasure);
        self.state = MeasureState::AwaitingMeasure;
    }

    /// Anchor the new measure at now and run `generate` for it.
    pub fn start_measure<T>(
        &mut self,
        sequencer: &mut Sequencer,
        generate: impl FnOnce(&mut Sequencer) -> T,
    ) -> T {
        if self.state != MeasureState::AwaitingMeasure {
            warn!("measure started from {:?}", self.state);
        }

        self.state = MeasureState::Generating;
        sequencer.begin_measure();
        let result = generate(sequencer);

        self.measures += 1;
        self.state = MeasureState::Scheduled;
        result
    }
}

impl Default for Looper {
    fn default() -> Self {
        Self::new()
    }
}

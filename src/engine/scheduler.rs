use log::warn;

use crate::voices::VoiceId;

/// Where the pattern generator sends its triggers.
///
/// Offsets and durations are in beats, relative to the start of the measure
/// currently being generated.
pub trait NoteScheduler {
    /// Activate `voice` at `offset`, and release it `duration` beats later
    /// when a duration is given.
    fn schedule_event(&mut self, offset: f32, duration: Option<f32>, voice: VoiceId);

    fn set_tempo(&mut self, bpm: f32);
}

/// Something the sequencer does when its sample clock reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Release(VoiceId),
    EndMeasure,
    StartMeasure,
    Activate(VoiceId),
}

impl Action {
    /// Order among actions due on the same sample. Releases go first so a
    /// voice ending and restarting on one sample is released before it is
    /// reactivated; the measure boundary runs before the new measure's notes.
    fn rank(&self) -> u8 {
        match self {
            Action::Release(_) => 0,
            Action::EndMeasure => 1,
            Action::StartMeasure => 2,
            Action::Activate(_) => 3,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    at: u64,
    rank: u8,
    seq: u64,
    action: Action,
}

impl Pending {
    fn key(&self) -> (u64, u8, u64) {
        (self.at, self.rank, self.seq)
    }
}

/// Events a sequencer can hold before its list has to grow.
pub const EVENT_CAPACITY: usize = 1024;

/// Sample-clock implementation of [`NoteScheduler`].
///
/// Pending actions are kept sorted latest-first so the next due action is
/// always popped off the end.
pub struct Sequencer {
    sample_rate: f32,
    tempo: f32,
    now: u64,
    measure_start: u64,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Sequencer {
    pub fn new(sample_rate: f32, tempo: f32) -> Self {
        Self {
            sample_rate,
            tempo,
            now: 0,
            measure_start: 0,
            next_seq: 0,
            pending: Vec::with_capacity(EVENT_CAPACITY),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn advance(&mut self, frames: u64) {
        self.now += frames;
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    pub fn samples_per_beat(&self) -> f32 {
        self.sample_rate * 60.0 / self.tempo
    }

    pub fn beats_to_samples(&self, beats: f32) -> u64 {
        (beats.max(0.0) * self.samples_per_beat()).round() as u64
    }

    /// Anchor subsequent [`NoteScheduler::schedule_event`] offsets at now.
    pub fn begin_measure(&mut self) {
        self.measure_start = self.now;
    }

    pub fn measure_start(&self) -> u64 {
        self.measure_start
    }

    /// Beats elapsed since the current measure started.
    pub fn beat_position(&self) -> f32 {
        (self.now.saturating_sub(self.measure_start)) as f32 / self.samples_per_beat()
    }

    /// Queue `action` at absolute sample `at`. Past times fire on the next pop.
    pub fn post(&mut self, at: u64, action: Action) {
        if self.pending.len() == self.pending.capacity() {
            warn!("sequencer holds {} events; growing", self.pending.len());
        }

        let event = Pending {
            at,
            rank: action.rank(),
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;

        let key = event.key();
        let index = self.pending.partition_point(|p| p.key() > key);
        self.pending.insert(index, event);
    }

    /// Queue `action` `beats` from now at the current tempo.
    pub fn post_in_beats(&mut self, beats: f32, action: Action) {
        let at = self.now + self.beats_to_samples(beats);
        self.post(at, action);
    }

    /// Remove and return the earliest action due at or before now.
    pub fn pop_due(&mut self) -> Option<Action> {
        match self.pending.last() {
            Some(next) if next.at <= self.now => self.pending.pop().map(|p| p.action),
            _ => None,
        }
    }

    /// Sample time of the earliest pending action.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.last().map(|p| p.at)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl NoteScheduler for Sequencer {
    fn schedule_event(&mut self, offset: f32, duration: Option<f32>, voice: VoiceId) {
        let start = self.measure_start + self.beats_to_samples(offset);
        self.post(start, Action::Activate(voice));
        if let Some(duration) = duration {
            self.post(start + self.beats_to_samples(duration), Action::Release(voice));
        }
    }

    fn set_tempo(&mut self, bpm: f32) {
        self.tempo = bpm;
    }
}

/*
Pattern Generation
==================

Once per measure the generator walks the 16-step grid for the melody and
then the bass, and finally lays down the drum template. A firing step turns
into one tone:

  p = probabilities[i]      fire when u < p, u uniform in [0, 1)
  next  = scale.next_note_index(previous)
  note  = semitone(next) + key + 12 * octave      octave uniform in [low, high)
  amp   ∈ [0.6, 0.8)        dur ∈ [0.15, 0.25) beats
  time  = 0.25 * i  (+ shuffle on even steps)
  pan   = U(-e, e) where e = ±(U(0, range) + 0.2), or 0 when range is 0

`previous` is a single contour shared by melody and bass: the bass picks up
the walk where the melody left it. Random draws happen in a fixed order per
step, so a seeded generator replays exactly the same measures.

Each trigger borrows the next voice of its pool, queues the parameters on
it, and only then schedules the activation. A full queue drops the note.
*/

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{drums::play_drum_template, pitch::midi_to_hz, scale::ScaleSource};
use crate::{
    config::{PartSettings, Settings, STEPS},
    engine::NoteScheduler,
    synth::{BusId, Pools},
    voices::{Drum, DrumHit, ToneParams},
};

const STEP_BEATS: f32 = 0.25;
const AMP_RANGE: (f32, f32) = (0.6, 0.8);
const DURATION_RANGE: (f32, f32) = (0.15, 0.25);
const PAN_FLOOR: f32 = 0.2;

/// Uniform draw in `[low, high)`. Degenerate or inverted ranges are fine.
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    low + (high - low) * rng.gen::<f32>()
}

/// Scale degree of the most recent tone, shared across parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MelodicContour {
    previous: usize,
}

impl MelodicContour {
    pub fn previous(&self) -> usize {
        self.previous
    }
}

/// What one generated measure contained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasureSummary {
    pub melody: usize,
    pub bass: usize,
    pub drums: usize,
    /// Notes lost to a full voice queue.
    pub dropped: usize,
}

pub struct PatternGenerator {
    rng: StdRng,
    contour: MelodicContour,
}

impl PatternGenerator {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            contour: MelodicContour::default(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn contour(&self) -> MelodicContour {
        self.contour
    }

    /// Generate melody, bass and drums for the measure the scheduler is
    /// currently anchored at.
    pub fn generate_measure(
        &mut self,
        settings: &Settings,
        scale: &dyn ScaleSource,
        pools: &mut Pools,
        scheduler: &mut dyn NoteScheduler,
    ) -> MeasureSummary {
        let mut summary = MeasureSummary::default();

        let (fired, dropped) = self.generate_part(
            &settings.melody,
            BusId::Melody,
            settings,
            scale,
            pools,
            scheduler,
        );
        summary.melody = fired;
        summary.dropped += dropped;

        let (fired, dropped) =
            self.generate_part(&settings.bass, BusId::Bass, settings, scale, pools, scheduler);
        summary.bass = fired;
        summary.dropped += dropped;

        let mut drum_hits = 0;
        let mut drum_drops = 0;
        play_drum_template(
            &mut self.rng,
            settings.shuffle,
            settings.kick_fills,
            |drum, offset, amplitude| {
                if play_drum(pools, scheduler, drum, offset, amplitude) {
                    drum_hits += 1;
                } else {
                    drum_drops += 1;
                }
            },
        );
        summary.drums = drum_hits;
        summary.dropped += drum_drops;

        debug!(
            "measure: {} melody, {} bass, {} drum hits, contour at {}",
            summary.melody, summary.bass, summary.drums, self.contour.previous
        );
        summary
    }

    /// Returns (notes scheduled, notes dropped).
    fn generate_part(
        &mut self,
        part: &PartSettings,
        bus: BusId,
        settings: &Settings,
        scale: &dyn ScaleSource,
        pools: &mut Pools,
        scheduler: &mut dyn NoteScheduler,
    ) -> (usize, usize) {
        let mut fired = 0;
        let mut dropped = 0;

        for step in 0..STEPS {
            if self.rng.gen::<f32>() >= part.probabilities[step] {
                continue;
            }

            let (params, duration, next) = self.compose_tone(part, step, bus, settings.key, scale);
            let mut time = step as f32 * STEP_BEATS;
            if step % 2 == 0 {
                time += settings.shuffle;
            }

            let handle = pools.tone(part.waveform).acquire();
            if handle.init(params) {
                scheduler.schedule_event(time, Some(duration), handle.id());
                fired += 1;
            } else {
                dropped += 1;
            }

            self.contour.previous = next;
        }

        (fired, dropped)
    }

    /// Pick pitch, level, length and pan for one step. Returns the
    /// parameters, the duration in beats and the scale degree chosen.
    fn compose_tone(
        &mut self,
        part: &PartSettings,
        step: usize,
        bus: BusId,
        key: i32,
        scale: &dyn ScaleSource,
    ) -> (ToneParams, f32, usize) {
        let next = scale.next_note_index(self.contour.previous, &mut self.rng);
        let base = scale.semitone(next) + key;
        let (low, high) = (part.octaves.low as f32, part.octaves.high as f32);
        let octave = random_between(&mut self.rng, low, high) as i32;
        let amplitude = random_between(&mut self.rng, AMP_RANGE.0, AMP_RANGE.1);
        let duration = random_between(&mut self.rng, DURATION_RANGE.0, DURATION_RANGE.1);
        let pan = self.draw_pan(part.pan_range);

        let params = ToneParams {
            bus,
            frequency: midi_to_hz(base + 12 * octave),
            amplitude,
            pan,
            envelope: part.envelopes[step],
        };
        (params, duration, next)
    }

    fn draw_pan(&mut self, range: f32) -> f32 {
        let mut extent = 0.0;
        if range != 0.0 {
            extent = random_between(&mut self.rng, 0.0, range) + PAN_FLOOR;
            if self.rng.gen::<f32>() < 0.5 {
                extent = -extent;
            }
        }
        random_between(&mut self.rng, -extent, extent).clamp(-1.0, 1.0)
    }
}

fn play_drum(
    pools: &mut Pools,
    scheduler: &mut dyn NoteScheduler,
    drum: Drum,
    offset: f32,
    amplitude: f32,
) -> bool {
    let handle = pools.drum(drum).acquire();
    if !handle.init(DrumHit { amplitude }) {
        return false;
    }
    scheduler.schedule_event(offset, Some(drum.hold_beats()), handle.id());
    true
}

/*
Drum Template
=============

The percussion plays the same one-measure groove every time, with two
optional kicks rolled fresh each measure. Offsets are in beats from the
start of the measure; `+s` marks hits pushed late by the shuffle amount.

  beat     0     .5    1     1.5   1.75  2     2.5   2.75  3     3.25  3.5   3.75
  kick     .75  (.5)   .75               .75               .75              (.3)
  snare                1.0                           1.5s              1.0
  hat            .5          .5    .25s        .5                .25s        .5s

  (x)  optional: pickup kick at 0.5, ghost kick at 3.75

Hits are emitted kick, snare, hat, each in time order. The two fill rolls
happen in that order too, so a seeded generator reproduces the same groove.
*/

use rand::Rng;

use crate::{config::KickFills, voices::Drum};

/// Most hits `drum` can get in one measure, fills included.
pub fn max_hits(drum: Drum) -> usize {
    match drum {
        Drum::Kick => 6,
        Drum::Snare => 3,
        Drum::Hat => 6,
    }
}

/// Roll the optional kicks and emit every hit of one measure as
/// `(drum, offset_beats, amplitude)`.
pub fn play_drum_template<R, F>(rng: &mut R, shuffle: f32, fills: KickFills, mut hit: F)
where
    R: Rng + ?Sized,
    F: FnMut(Drum, f32, f32),
{
    hit(Drum::Kick, 0.0, 0.75);
    if rng.gen::<f32>() < fills.pickup {
        hit(Drum::Kick, 0.5, 0.5);
    }
    hit(Drum::Kick, 1.0, 0.75);
    hit(Drum::Kick, 2.0, 0.75);
    hit(Drum::Kick, 3.0, 0.75);
    if rng.gen::<f32>() < fills.ghost {
        hit(Drum::Kick, 3.75, 0.3);
    }

    hit(Drum::Snare, 1.0, 1.0);
    hit(Drum::Snare, 2.75 + shuffle, 1.5);
    hit(Drum::Snare, 3.5, 1.0);

    hit(Drum::Hat, 0.5, 0.5);
    hit(Drum::Hat, 1.5, 0.5);
    hit(Drum::Hat, 1.75 + shuffle, 0.25);
    hit(Drum::Hat, 2.5, 0.5);
    hit(Drum::Hat, 3.25 + shuffle, 0.25);
    hit(Drum::Hat, 3.75 + shuffle, 0.5);
}

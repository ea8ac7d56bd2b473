use log::error;

use super::{queue::ParamReceiver, DrumHit, Voice, VoiceId};
use crate::synth::BusId;

/// The sound-producing half of a drum: struck with an amplitude, then
/// rendered sample by sample until its sweeps run out.
pub trait DrumBody: Send {
    /// Rearm the body's sweeps for a hit at `amplitude`.
    fn strike(&mut self, amplitude: f32);

    fn next_sample(&mut self) -> f32;
}

/// Generic drum voice: queue handling and bus patching around a [`DrumBody`].
///
/// Drums are mono and centred, so the same sample goes to both channels of
/// the drum bus.
pub struct PercussionVoice<B: DrumBody> {
    id: VoiceId,
    body: B,
    params: ParamReceiver<DrumHit>,
    patched: bool,
}

impl<B: DrumBody> PercussionVoice<B> {
    pub fn new(id: VoiceId, body: B, params: ParamReceiver<DrumHit>) -> Self {
        Self {
            id,
            body,
            params,
            patched: false,
        }
    }
}

impl<B: DrumBody> Voice for PercussionVoice<B> {
    fn id(&self) -> VoiceId {
        self.id
    }

    fn activate(&mut self, enabled: bool) {
        let Some(hit) = self.params.pop() else {
            debug_assert!(false, "{:?} activated with an empty queue", self.id);
            error!("{:?} activated with an empty queue; dropping the hit", self.id);
            return;
        };

        // Only the Idle -> Sounding edge strikes. A hit landing while the
        // previous one is still patched just consumes its amplitude.
        if enabled && !self.patched {
            self.body.strike(hit.amplitude);
            self.patched = true;
        }
    }

    fn release(&mut self) {
        self.patched = false;
    }

    fn output(&self) -> Option<BusId> {
        self.patched.then_some(BusId::Drums)
    }

    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let sample = self.body.next_sample();
            *l += sample;
            *r += sample;
        }
    }

    fn is_sounding(&self) -> bool {
        self.patched
    }

    fn pending(&self) -> usize {
        self.params.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::{param_queue, Category, Drum, QUEUE_CAPACITY};

    /// Records strikes and outputs a constant 1.0.
    #[derive(Default)]
    struct Probe {
        strikes: Vec<f32>,
    }

    impl DrumBody for Probe {
        fn strike(&mut self, amplitude: f32) {
            self.strikes.push(amplitude);
        }

        fn next_sample(&mut self) -> f32 {
            1.0
        }
    }

    fn voice() -> (crate::voices::ParamSender<DrumHit>, PercussionVoice<Probe>) {
        let (tx, rx) = param_queue(QUEUE_CAPACITY);
        let id = VoiceId::new(Category::Drum(Drum::Kick), 0);
        (tx, PercussionVoice::new(id, Probe::default(), rx))
    }

    #[test]
    fn activations_consume_params_in_order() {
        let (mut tx, mut voice) = voice();
        for amplitude in [0.1, 0.2, 0.3] {
            tx.push(DrumHit { amplitude }).unwrap();
        }

        voice.activate(true);
        voice.release();
        voice.activate(true);
        voice.release();
        voice.activate(true);

        assert_eq!(voice.body.strikes, vec![0.1, 0.2, 0.3]);
        assert_eq!(voice.pending(), 0);
    }

    #[test]
    fn retrigger_while_sounding_skips_the_strike() {
        let (mut tx, mut voice) = voice();
        tx.push(DrumHit { amplitude: 0.75 }).unwrap();
        tx.push(DrumHit { amplitude: 0.5 }).unwrap();

        voice.activate(true);
        voice.activate(true);

        assert_eq!(voice.body.strikes, vec![0.75]);
        assert_eq!(voice.pending(), 0);
        assert!(voice.is_sounding());
    }

    #[test]
    fn muted_voice_consumes_silently() {
        let (mut tx, mut voice) = voice();
        tx.push(DrumHit { amplitude: 0.75 }).unwrap();

        voice.activate(false);

        assert_eq!(voice.pending(), 0);
        assert!(voice.body.strikes.is_empty());
        assert_eq!(voice.output(), None);
    }

    #[test]
    fn release_on_idle_is_a_no_op() {
        let (_tx, mut voice) = voice();
        voice.release();
        assert!(!voice.is_sounding());
        assert_eq!(voice.pending(), 0);
    }

    #[test]
    fn renders_into_both_channels_while_patched() {
        let (mut tx, mut voice) = voice();
        tx.push(DrumHit { amplitude: 1.0 }).unwrap();
        voice.activate(true);
        assert_eq!(voice.output(), Some(BusId::Drums));

        let mut left = [0.5; 4];
        let mut right = [0.0; 4];
        voice.render(&mut left, &mut right);
        assert_eq!(left, [1.5; 4]);
        assert_eq!(right, [1.0; 4]);
    }
}

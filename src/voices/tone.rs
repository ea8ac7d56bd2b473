//! Wavetable tone voice.
//!
//! Signal chain: oscillator → equal-power panner → ADSR, rendered into
//! whichever bus the note's parameters name (melody or bass).
//!
//! Unlike the drums, a tone is never cut off. Release starts the envelope's
//! release segment and the voice keeps rendering into its bus until the
//! envelope is idle, then detaches itself. The connection is tracked
//! explicitly so a voice is never patched into two buses at once:
//!
//! ```text
//!                activate(bus)              release()
//!   Detached ─────────────────▶ Patched ─────────────────▶ Draining
//!       ▲                        ▲  │ activate(bus')           │
//!       │                        └──┘ retrigger, same level    │
//!       │                        ▲                             │
//!       │                        └──── activate(bus') ─────────┤
//!       └──────────────── envelope idle (during render) ───────┘
//! ```

use log::error;

use super::{queue::ParamReceiver, ToneParams, Voice, VoiceId};
use crate::{
    dsp::{pan, Envelope, Oscillator, Wavetable},
    synth::BusId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Detached,
    Patched(BusId),
    /// Released; still rendering the envelope tail into the bus.
    Draining(BusId),
}

pub struct ToneVoice {
    id: VoiceId,
    osc: Oscillator,
    envelope: Envelope,
    gains: (f32, f32),
    connection: Connection,
    params: ParamReceiver<ToneParams>,
    last: Option<ToneParams>,
}

impl ToneVoice {
    pub fn new(
        id: VoiceId,
        table: Wavetable,
        sample_rate: f32,
        params: ParamReceiver<ToneParams>,
    ) -> Self {
        Self {
            id,
            osc: Oscillator::new(table, 0.0, sample_rate),
            envelope: Envelope::new(sample_rate),
            gains: pan::equal_power(0.0),
            connection: Connection::Detached,
            params,
            last: None,
        }
    }

    pub fn connection(&self) -> Connection {
        self.connection
    }

    /// Parameters of the most recently activated note.
    pub fn last_params(&self) -> Option<ToneParams> {
        self.last
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }
}

impl Voice for ToneVoice {
    fn id(&self) -> VoiceId {
        self.id
    }

    fn activate(&mut self, enabled: bool) {
        let Some(params) = self.params.pop() else {
            debug_assert!(false, "{:?} activated with an empty queue", self.id);
            error!("{:?} activated with an empty queue; dropping the note", self.id);
            return;
        };

        if !enabled {
            return;
        }

        self.osc.set_frequency(params.frequency);
        self.gains = pan::equal_power(params.pan);
        self.envelope.set_parameters(params.amplitude, params.envelope);
        // Retrigger from the current level; a voice still ringing must not click.
        self.envelope.note_on();
        self.connection = Connection::Patched(params.bus);
        self.last = Some(params);
    }

    fn release(&mut self) {
        if let Connection::Patched(bus) = self.connection {
            self.envelope.note_off();
            self.connection = Connection::Draining(bus);
        }
    }

    fn output(&self) -> Option<BusId> {
        match self.connection {
            Connection::Detached => None,
            Connection::Patched(bus) | Connection::Draining(bus) => Some(bus),
        }
    }

    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let (gain_l, gain_r) = self.gains;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let sample = self.osc.next_sample() * self.envelope.next_sample();
            *l += sample * gain_l;
            *r += sample * gain_r;
        }

        if matches!(self.connection, Connection::Draining(_)) && !self.envelope.is_active() {
            self.connection = Connection::Detached;
        }
    }

    fn is_sounding(&self) -> bool {
        matches!(self.connection, Connection::Patched(_))
    }

    fn pending(&self) -> usize {
        self.params.len()
    }
}

use rand::Rng;

use super::{mixer::Mixer, PoolSizes, Pools, VoiceHandle, VoicePool};
use crate::{
    config::STEPS,
    dsp::{Waveform, Wavetable},
    error::EngineError,
    sequencing::max_hits,
    voices::{
        param_queue, queue_capacity, Category, Drum, DrumBody, DrumHit, HatBody, KickBody,
        ParamReceiver, PercussionVoice, SnareBody, ToneVoice, Voice, VoiceId,
    },
};

/// Tone triggers one waveform pool can see in a measure: melody and bass
/// may both play the same family on every step.
const TONE_TRIGGERS: usize = 2 * STEPS;

/// All voices of one category, indexed by slot.
pub struct Section {
    category: Category,
    voices: Vec<Box<dyn Voice>>,
}

impl Section {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn voices(&self) -> &[Box<dyn Voice>] {
        &self.voices
    }
}

/// The rendering side of every pooled voice.
pub struct Ensemble {
    sections: Vec<Section>,
}

impl Ensemble {
    pub fn voice_mut(&mut self, id: VoiceId) -> Option<&mut dyn Voice> {
        let section = self.sections.get_mut(id.category.index())?;
        let voice = section.voices.get_mut(id.slot)?;
        Some(voice.as_mut())
    }

    pub fn voice(&self, id: VoiceId) -> Option<&dyn Voice> {
        let voice = self.sections.get(id.category.index())?.voices.get(id.slot)?;
        Some(voice.as_ref())
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Render every connected voice over `range` (in frames) into its bus.
    pub fn render(&mut self, mixer: &mut Mixer, range: std::ops::Range<usize>) {
        if range.is_empty() {
            return;
        }
        for voice in self.sections.iter_mut().flat_map(|s| s.voices.iter_mut()) {
            if let Some(bus) = voice.output() {
                let (left, right) = mixer.bus_mut(bus, range.clone());
                voice.render(left, right);
            }
        }
    }

    /// Voices currently between activate and release.
    pub fn sounding(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.voices.iter())
            .filter(|v| v.is_sounding())
            .count()
    }

    pub fn sounding_in(&self, category: Category) -> usize {
        self.sections
            .get(category.index())
            .map(|s| s.voices.iter().filter(|v| v.is_sounding()).count())
            .unwrap_or(0)
    }
}

/// Build every pool and its matching ensemble section.
///
/// Each voice gets its own parameter queue: the sender goes into the pool
/// handle, the receiver into the voice. Queues are deep enough for the
/// busiest measure the pool can be asked to play.
pub fn orchestra<R: Rng + ?Sized>(
    sample_rate: f32,
    sizes: PoolSizes,
    rng: &mut R,
) -> Result<(Pools, Ensemble), EngineError> {
    let mut sections = Vec::with_capacity(Category::COUNT);

    let mut drums = Vec::with_capacity(Drum::COUNT);
    for drum in Drum::ALL {
        let category = Category::Drum(drum);
        let mut handles = Vec::with_capacity(sizes.drum(drum));
        let mut voices: Vec<Box<dyn Voice>> = Vec::with_capacity(sizes.drum(drum));
        let capacity = queue_capacity(max_hits(drum), sizes.drum(drum));

        for slot in 0..sizes.drum(drum) {
            let id = VoiceId::new(category, slot);
            let (tx, rx) = param_queue(capacity);
            handles.push(VoiceHandle::new(id, tx));
            voices.push(match drum {
                Drum::Kick => drum_voice(id, KickBody::new(sample_rate, rng), rx),
                Drum::Snare => drum_voice(id, SnareBody::new(sample_rate, rng.gen()), rx),
                Drum::Hat => drum_voice(id, HatBody::new(sample_rate, rng.gen()), rx),
            });
        }

        drums.push(VoicePool::new(category, handles)?);
        sections.push(Section { category, voices });
    }

    let mut tones = Vec::with_capacity(Waveform::COUNT);
    for waveform in Waveform::ALL {
        let category = Category::Tone(waveform);
        let mut handles = Vec::with_capacity(sizes.tone);
        let mut voices: Vec<Box<dyn Voice>> = Vec::with_capacity(sizes.tone);
        let capacity = queue_capacity(TONE_TRIGGERS, sizes.tone);

        for slot in 0..sizes.tone {
            let id = VoiceId::new(category, slot);
            let (tx, rx) = param_queue(capacity);
            handles.push(VoiceHandle::new(id, tx));
            let table = Wavetable::new(waveform, rng);
            voices.push(Box::new(ToneVoice::new(id, table, sample_rate, rx)));
        }

        tones.push(VoicePool::new(category, handles)?);
        sections.push(Section { category, voices });
    }

    Ok((Pools { drums, tones }, Ensemble { sections }))
}

fn drum_voice<B: DrumBody + 'static>(
    id: VoiceId,
    body: B,
    rx: ParamReceiver<DrumHit>,
) -> Box<dyn Voice> {
    Box::new(PercussionVoice::new(id, body, rx))
}

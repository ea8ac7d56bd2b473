use melodizer::{
    config::{KickFills, STEPS},
    dsp::Waveform,
    engine::MeasureState,
    synth::{BusId, PoolSizes},
    voices::Voice,
    Engine, EngineError, Settings, CHANNELS,
};

const SAMPLE_RATE: f32 = 48_000.0;

/// Frames in one 4-beat measure at `bpm`.
fn measure_frames(bpm: f32) -> usize {
    (4.0 * 60.0 / bpm * SAMPLE_RATE).round() as usize
}

fn render(engine: &mut Engine, frames: usize) -> Vec<f32> {
    let mut out = vec![0.0; frames * CHANNELS];
    // Odd-sized callbacks, like a real device might deliver
    for chunk in out.chunks_mut(300 * CHANNELS) {
        engine.render(chunk);
    }
    out
}

fn engine(settings: Settings) -> Engine {
    Engine::builder(SAMPLE_RATE)
        .settings(settings)
        .seed(42)
        .build()
        .unwrap()
}

#[test]
fn default_settings_make_bounded_sound() {
    let mut engine = engine(Settings::default());
    let out = render(&mut engine, measure_frames(110.0) * 2);

    assert!(out.iter().any(|s| s.abs() > 0.01));
    assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
}

#[test]
fn measure_loop_reschedules_itself() {
    let mut engine = engine(Settings {
        tempo: 120.0,
        ..Settings::default()
    });
    assert_eq!(engine.status().state, MeasureState::AwaitingMeasure);

    render(&mut engine, measure_frames(120.0) * 2 + 10);

    let status = engine.status();
    assert_eq!(status.measures, 3);
    assert_eq!(status.state, MeasureState::Scheduled);
    assert!(status.beat < 0.01);
}

#[test]
fn new_tempo_applies_at_the_next_boundary() {
    let mut engine = engine(Settings {
        tempo: 120.0,
        ..Settings::default()
    });
    render(&mut engine, 100);
    engine.update_settings(|s| s.tempo = 240.0);

    // The running measure keeps its length.
    render(&mut engine, measure_frames(120.0) - 200);
    assert_eq!(engine.status().measures, 1);
    assert_eq!(engine.status().tempo, 120.0);

    // Past the boundary the next measure is half as long.
    render(&mut engine, 200 + measure_frames(240.0));
    let status = engine.status();
    assert_eq!(status.tempo, 240.0);
    assert_eq!(status.measures, 3);
}

#[test]
fn muted_drums_and_silent_parts_render_silence() {
    let mut settings = Settings::default();
    settings.melody.probabilities = [0.0; STEPS];
    settings.bass.probabilities = [0.0; STEPS];
    settings.toggles.kick = false;
    settings.toggles.snare = false;
    settings.toggles.hat = false;
    settings.kick_fills = KickFills {
        pickup: 1.0,
        ghost: 1.0,
    };

    let mut engine = engine(settings);
    let out = render(&mut engine, measure_frames(110.0) * 3 + 1_000);

    assert!(out.iter().all(|s| *s == 0.0));
    assert_eq!(engine.status().sounding, 0);

    // Muted hits still consumed their parameters: only the newest
    // measure's unplayed hits can be pending.
    let pending: usize = engine
        .ensemble()
        .sections()
        .iter()
        .flat_map(|s| s.voices().iter())
        .map(|v| v.pending())
        .sum();
    assert!(pending <= 15, "{pending} hits left queued");
}

#[test]
fn muting_a_drum_silences_later_hits() {
    let mut settings = Settings::default();
    settings.melody.probabilities = [0.0; STEPS];
    settings.bass.probabilities = [0.0; STEPS];
    settings.toggles.snare = false;
    settings.toggles.hat = false;

    let mut engine = engine(settings);
    let kicks_only = render(&mut engine, 2_000);
    assert!(kicks_only.iter().any(|s| s.abs() > 0.0));

    engine.update_settings(|s| s.toggles.kick = false);
    render(&mut engine, measure_frames(110.0));
    let muted = render(&mut engine, 2_000);
    assert!(muted.iter().all(|s| *s == 0.0));
}

#[test]
fn drum_bus_gain_scales_the_groove() {
    let mut settings = Settings::default();
    settings.melody.probabilities = [0.0; STEPS];
    settings.bass.probabilities = [0.0; STEPS];

    let mut engine = engine(settings);
    engine.set_bus_gain(BusId::Drums, 0.0);
    let silent = render(&mut engine, measure_frames(110.0));
    assert!(silent.iter().all(|s| *s == 0.0));

    let status = engine.status();
    assert_eq!(status.bus_gains[BusId::Drums.index()], 0.0);
    assert_eq!(status.bus_gains[BusId::Melody.index()], 1.0);
    // The next measure's boundary is always queued.
    assert!(status.pending_events > 0);

    engine.set_bus_gain(BusId::Drums, -1.0);
    assert_eq!(engine.bus_gain(BusId::Drums), 0.0);

    engine.set_bus_gain(BusId::Drums, 1.0);
    let audible = render(&mut engine, measure_frames(110.0));
    assert!(audible.iter().any(|s| s.abs() > 0.01));
}

#[test]
fn seeded_engines_are_deterministic() {
    let mut a = engine(Settings::default());
    let mut b = engine(Settings::default());
    let frames = measure_frames(110.0) + 500;
    assert_eq!(render(&mut a, frames), render(&mut b, frames));
}

#[test]
fn pause_holds_the_clock() {
    let mut engine = engine(Settings::default());
    render(&mut engine, 1_000);
    let before = engine.status();

    engine.set_paused(true);
    let out = render(&mut engine, 10_000);
    assert!(out.iter().all(|s| *s == 0.0));
    assert_eq!(engine.status().beat, before.beat);

    engine.set_paused(false);
    render(&mut engine, 1_000);
    assert!(engine.status().beat > before.beat);
}

#[test]
fn settings_are_clamped_on_entry() {
    let mut engine = engine(Settings::default());
    engine.update_settings(|s| {
        s.tempo = 0.0;
        s.shuffle = 3.0;
    });
    assert_eq!(engine.settings().tempo, 1.0);
    assert_eq!(engine.settings().shuffle, 0.2);
}

#[test]
fn single_voice_pools_play_both_parts_on_one_waveform() {
    let mut settings = Settings::default();
    settings.melody.probabilities = [1.0; STEPS];
    settings.bass.probabilities = [1.0; STEPS];
    settings.melody.waveform = Waveform::Sine;
    settings.bass.waveform = Waveform::Sine;
    settings.kick_fills = KickFills {
        pickup: 1.0,
        ghost: 1.0,
    };

    let mut engine = Engine::builder(SAMPLE_RATE)
        .settings(settings)
        .pool_sizes(PoolSizes {
            kick: 1,
            snare: 1,
            hat: 1,
            tone: 1,
        })
        .seed(7)
        .build()
        .unwrap();

    for _ in 0..3 {
        render(&mut engine, measure_frames(110.0));
        let summary = engine.status().last_measure;
        assert_eq!(summary.melody, STEPS);
        assert_eq!(summary.bass, STEPS);
        assert_eq!(summary.drums, 15);
        assert_eq!(summary.dropped, 0);
    }
}

#[test]
fn rejects_bad_sample_rate() {
    let result = Engine::builder(0.0).build();
    assert!(matches!(result, Err(EngineError::InvalidSampleRate(_))));
}

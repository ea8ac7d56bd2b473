//! Live playback: cpal output stream driving the engine, TUI on the main thread.

use std::sync::{Arc, Mutex};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use melodizer::{Engine, Settings, CHANNELS, MAX_BLOCK_SIZE};
use rtrb::RingBuffer;

use crate::ui::UiApp;

/// Scope samples buffered between the audio and UI threads.
const SCOPE_CAPACITY: usize = 8192;

pub fn run(settings: Settings, seed: Option<u64>) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let mut builder = Engine::builder(sample_rate).settings(settings);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let engine = Arc::new(Mutex::new(builder.build().wrap_err("failed to build engine")?));
    info!("output: {} Hz, {} channels", sample_rate, channels);

    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);

    let audio_engine = Arc::clone(&engine);
    let mut stereo = vec![0.0f32; MAX_BLOCK_SIZE * CHANNELS];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let Ok(mut engine) = audio_engine.lock() else {
                    data.fill(0.0);
                    return;
                };

                for out in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let frames = out.len() / channels;
                    let block = &mut stereo[..frames * CHANNELS];
                    engine.render(block);

                    let frames_out = out.chunks_exact_mut(channels);
                    for (frame, pair) in frames_out.zip(block.chunks_exact(CHANNELS)) {
                        match frame {
                            [mono] => *mono = 0.5 * (pair[0] + pair[1]),
                            [left, right, rest @ ..] => {
                                *left = pair[0];
                                *right = pair[1];
                                rest.fill(0.0);
                            }
                            [] => {}
                        }
                        // Scope drops samples while the UI is behind
                        let _ = scope_tx.push(0.5 * (pair[0] + pair[1]));
                    }
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(engine, scope_rx, sample_rate).run(&mut terminal);
    ratatui::restore();
    result
}

//! Offline rendering to a WAV file.

use std::path::Path;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;
use melodizer::{engine::BEATS_PER_MEASURE, Engine, Settings, CHANNELS, MAX_BLOCK_SIZE};

/// Render `measures` measures at the configured tempo into a 32-bit float WAV.
pub fn render_to_wav(
    path: &Path,
    settings: Settings,
    seed: Option<u64>,
    measures: u32,
    sample_rate: u32,
) -> EyreResult<()> {
    let mut builder = Engine::builder(sample_rate as f32).settings(settings);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let mut engine = builder.build().wrap_err("failed to build engine")?;

    let seconds = measures as f64 * BEATS_PER_MEASURE as f64 * 60.0 / engine.settings().tempo as f64;
    let total_frames = (seconds * sample_rate as f64).round() as usize;

    let spec = WavSpec {
        channels: CHANNELS as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;

    let mut buffer = vec![0.0f32; MAX_BLOCK_SIZE * CHANNELS];
    let mut peak = 0.0f32;
    let mut remaining = total_frames;
    while remaining > 0 {
        let frames = remaining.min(MAX_BLOCK_SIZE);
        let block = &mut buffer[..frames * CHANNELS];
        engine.render(block);

        for &sample in block.iter() {
            peak = peak.max(sample.abs());
            writer.write_sample(sample).wrap_err("failed to write sample")?;
        }
        remaining -= frames;
    }
    writer.finalize().wrap_err("failed to finalize WAV")?;

    let status = engine.status();
    info!("bounced {} measures, peak {:.3}", status.measures, peak);
    println!(
        "Wrote {} ({} measures, {:.2}s, peak {:.3})",
        path.display(),
        measures,
        seconds,
        peak
    );
    Ok(())
}

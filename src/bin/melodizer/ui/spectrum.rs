//! Spectrum widget
//!
//! FFT of the scope window summarized into log-spaced bands and drawn as
//! bars. Bands fall back slowly so short drum hits stay readable.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{BarChart, Block, Borders},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const BANDS: usize = 24;
const LOW_HZ: f32 = 40.0;
const HIGH_HZ: f32 = 16_000.0;
/// Displayed floor; anything quieter draws an empty bar
const FLOOR_DB: f32 = -80.0;
/// Per-frame fall of a band, in dB
const FALLOFF_DB: f32 = 1.5;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin range per band, half-open
    edges: Vec<(usize, usize)>,
    levels_db: [f32; BANDS],
    bars: Vec<(&'static str, u64)>,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::<f32>::new().plan_fft_forward(size);

        // Hann window - reduces spectral leakage
        let window = (0..size)
            .map(|i| {
                let phase = i as f32 / (size.max(2) - 1) as f32;
                0.5 * (1.0 - (std::f32::consts::TAU * phase).cos())
            })
            .collect();

        let half = (size / 2).max(1);
        let high = HIGH_HZ.min(sample_rate * 0.5);
        let bin_of = |hz: f32| ((hz * size as f32 / sample_rate).round() as usize).clamp(1, half);
        let edges = (0..BANDS)
            .map(|band| {
                let lo = LOW_HZ * (high / LOW_HZ).powf(band as f32 / BANDS as f32);
                let hi = LOW_HZ * (high / LOW_HZ).powf((band + 1) as f32 / BANDS as f32);
                let start = bin_of(lo);
                (start, bin_of(hi).max(start + 1).min(half))
            })
            .collect();

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); size],
            edges,
            levels_db: [FLOOR_DB; BANDS],
            bars: vec![("", 0); BANDS],
        }
    }

    /// Analyze a new scope window. Windows of the wrong length are ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 2.0 / self.window.len() as f32;
        for (band, &(start, end)) in self.edges.iter().enumerate() {
            let peak = self.scratch[start..end.max(start)]
                .iter()
                .map(|c| c.norm() * norm)
                .fold(0.0f32, f32::max);
            let db = (20.0 * peak.max(1e-6).log10()).max(FLOOR_DB);

            let level = &mut self.levels_db[band];
            *level = db.max(*level - FALLOFF_DB);
            self.bars[band].1 = ((*level - FLOOR_DB) / -FLOOR_DB * 100.0).round() as u64;
        }
    }

    /// Bar heights in [0, 100], lowest band first
    pub fn bands(&self) -> &[(&'static str, u64)] {
        &self.bars
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, bands: &[(&str, u64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let inner_width = area.width.saturating_sub(2) as usize;
    let bar_width = (inner_width / bands.len().max(1)).max(1) as u16;

    let chart = BarChart::default()
        .block(block)
        .data(bands)
        .bar_width(bar_width)
        .bar_gap(0)
        .max(100)
        .bar_style(Style::default().fg(Color::Green));

    frame.render_widget(chart, area);
}

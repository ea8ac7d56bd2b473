//! Transport bar widget - shows tempo, measure, musical settings and audio stats

use melodizer::{engine::EngineStatus, synth::BusId, voices::Drum, Settings};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn drum_span(settings: &Settings, drum: Drum) -> Span<'static> {
    let on = settings.toggles.drum(drum);
    Span::styled(
        format!("{} ", drum.label()),
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn gains_label(status: &EngineStatus) -> String {
    BusId::ALL
        .iter()
        .map(|&bus| format!("{} {:.1}", bus.label(), status.bus_gains[bus.index()]))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the transport bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    status: &EngineStatus,
    settings: &Settings,
    audio_stats: &AudioStats,
    sample_rate: f32,
) {
    let block = Block::default().title(" melodizer ").borders(Borders::ALL);

    let play_symbol = if status.paused { "⏸" } else { "▶" };
    let current_beat = status.beat.floor() as u32 + 1;

    let mut spans = vec![
        Span::styled(
            format!(" {:.0} bpm  ", settings.tempo),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} Bar {} | Beat {}  ", play_symbol, status.measures, current_beat),
            Style::default().fg(if status.paused { Color::Yellow } else { Color::Green }),
        ),
        Span::styled(
            format!(
                "{} {:+}  swing {:.2}  ",
                settings.scale.scale().name,
                settings.key,
                settings.shuffle
            ),
            Style::default().fg(Color::White),
        ),
    ];
    spans.extend(Drum::ALL.iter().map(|&drum| drum_span(settings, drum)));
    spans.push(Span::styled(
        format!(" {}  ", gains_label(status)),
        Style::default().fg(Color::White),
    ));
    spans.extend([
        Span::styled(
            format!("voices {:>3}  events {:>4}  ", status.sounding, status.pending_events),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

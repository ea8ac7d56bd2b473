//! Step grid widget - one row of probability bars per tonal part

use melodizer::{
    config::{PartSettings, Settings, STEPS},
    synth::BusId,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Melody,
    Bass,
}

impl Part {
    pub fn other(self) -> Self {
        match self {
            Part::Melody => Part::Bass,
            Part::Bass => Part::Melody,
        }
    }

    pub fn settings_mut(self, settings: &mut Settings) -> &mut PartSettings {
        match self {
            Part::Melody => &mut settings.melody,
            Part::Bass => &mut settings.bass,
        }
    }

    pub fn bus(self) -> BusId {
        match self {
            Part::Melody => BusId::Melody,
            Part::Bass => BusId::Bass,
        }
    }

    fn settings(self, settings: &Settings) -> &PartSettings {
        match self {
            Part::Melody => &settings.melody,
            Part::Bass => &settings.bass,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Part::Melody => "melody",
            Part::Bass => "bass",
        }
    }
}

/// Which step the arrow keys edit
#[derive(Debug, Clone, Copy)]
pub struct StepCursor {
    pub part: Part,
    pub step: usize,
}

impl Default for StepCursor {
    fn default() -> Self {
        Self {
            part: Part::Melody,
            step: 0,
        }
    }
}

fn bar(probability: f32) -> char {
    let level = (probability.clamp(0.0, 1.0) * (LEVELS.len() - 1) as f32).round() as usize;
    LEVELS[level.min(LEVELS.len() - 1)]
}

fn part_line(part: Part, settings: &Settings, cursor: &StepCursor, playhead: usize) -> Line<'static> {
    let config = part.settings(settings);
    let selected = cursor.part == part;

    let mut spans = vec![Span::styled(
        format!(" {:<7}", part.label()),
        Style::default().fg(if selected { Color::Cyan } else { Color::Gray }),
    )];

    for (step, &p) in config.probabilities.iter().enumerate() {
        let mut style = Style::default().fg(if step % 4 == 0 { Color::Yellow } else { Color::Green });
        if step == playhead {
            style = style.bg(Color::DarkGray);
        }
        if selected && step == cursor.step {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("{0}{0}", bar(p)), style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        format!(
            " {}  oct {}-{}",
            config.waveform.label(),
            config.octaves.low,
            config.octaves.high
        ),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

/// Render both step grids with the playhead and edit cursor
pub fn render_steps(frame: &mut Frame, area: Rect, settings: &Settings, cursor: &StepCursor, beat: f32) {
    let block = Block::default().title(" Steps ").borders(Borders::ALL);

    let playhead = ((beat * 4.0) as usize).min(STEPS - 1);
    let selected = cursor.part.settings(settings).probabilities[cursor.step];

    let lines = vec![
        part_line(Part::Melody, settings, cursor, playhead),
        part_line(Part::Bass, settings, cursor, playhead),
        Line::from(Span::styled(
            format!(" step {:>2}  p = {:.1}", cursor.step + 1, selected),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

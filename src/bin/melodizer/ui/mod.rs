//! Terminal UI for melodizer
//!
//! Shows the transport, the step probability grids and a live scope and
//! spectrum. Every edit goes through [`Engine::update_settings`], so it is
//! clamped there and heard from the next measure.

mod spectrum;
mod steps;
mod transport;
mod waveform;

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use color_eyre::eyre::{eyre, Result as EyreResult};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use melodizer::{
    config::STEPS,
    engine::EngineStatus,
    synth::BusId,
    voices::Drum,
    Engine, Settings,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use spectrum::{render_spectrum, SpectrumAnalyzer};
use steps::{render_steps, StepCursor};
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Scope window length; also the FFT size
const VIS_BUFFER_SIZE: usize = 1024;

const PROBABILITY_STEP: f32 = 0.1;
const TEMPO_STEP: f32 = 5.0;
const SHUFFLE_STEP: f32 = 0.01;
const GAIN_STEP: f32 = 0.1;
const GAIN_MAX: f32 = 2.0;

pub struct UiApp {
    engine: Arc<Mutex<Engine>>,
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: f32,
    cursor: StepCursor,
    should_quit: bool,
}

impl UiApp {
    pub fn new(engine: Arc<Mutex<Engine>>, scope_rx: Consumer<f32>, sample_rate: f32) -> Self {
        Self {
            engine,
            scope_rx,
            scope: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            sample_rate,
            cursor: StepCursor::default(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.spectrum.update(&self.scope);

            let (status, settings) = self.snapshot()?;
            terminal.draw(|frame| self.render(frame, &status, &settings))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Append new scope samples, keeping the last VIS_BUFFER_SIZE.
    fn poll_scope(&mut self) {
        let available = self.scope_rx.slots();
        if available == 0 {
            return;
        }
        self.scope.extend(std::iter::from_fn(|| self.scope_rx.pop().ok()).take(available));
        if self.scope.len() > VIS_BUFFER_SIZE {
            let excess = self.scope.len() - VIS_BUFFER_SIZE;
            self.scope.drain(0..excess);
        }
    }

    fn snapshot(&self) -> EyreResult<(EngineStatus, Settings)> {
        let engine = self.lock()?;
        Ok((engine.status(), engine.settings().clone()))
    }

    fn lock(&self) -> EyreResult<std::sync::MutexGuard<'_, Engine>> {
        self.engine
            .lock()
            .map_err(|_| eyre!("audio thread panicked while holding the engine"))
    }

    fn handle_key(&mut self, key: KeyCode) -> EyreResult<()> {
        let cursor = self.cursor;
        let mut engine = self.lock()?;

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                drop(engine);
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                let paused = engine.is_paused();
                engine.set_paused(!paused);
            }

            KeyCode::Char('1') => engine.update_settings(|s| s.toggles.toggle(Drum::Kick)),
            KeyCode::Char('2') => engine.update_settings(|s| s.toggles.toggle(Drum::Snare)),
            KeyCode::Char('3') => engine.update_settings(|s| s.toggles.toggle(Drum::Hat)),

            KeyCode::Char('+') | KeyCode::Char('=') => {
                engine.update_settings(|s| s.tempo += TEMPO_STEP)
            }
            KeyCode::Char('-') => engine.update_settings(|s| s.tempo -= TEMPO_STEP),
            KeyCode::Char('K') => engine.update_settings(|s| s.key += 1),
            KeyCode::Char('k') => engine.update_settings(|s| s.key -= 1),
            KeyCode::Char('S') => engine.update_settings(|s| s.shuffle += SHUFFLE_STEP),
            KeyCode::Char('s') => engine.update_settings(|s| s.shuffle -= SHUFFLE_STEP),
            KeyCode::Char('C') => engine.update_settings(|s| s.scale = s.scale.next()),
            KeyCode::Char('c') => engine.update_settings(|s| s.scale = s.scale.previous()),
            KeyCode::Char('W') => engine.update_settings(|s| {
                let part = cursor.part.settings_mut(s);
                part.waveform = part.waveform.next();
            }),
            KeyCode::Char('w') => engine.update_settings(|s| {
                let part = cursor.part.settings_mut(s);
                part.waveform = part.waveform.previous();
            }),

            KeyCode::Char(']') => nudge_gain(&mut engine, cursor.part.bus(), GAIN_STEP),
            KeyCode::Char('[') => nudge_gain(&mut engine, cursor.part.bus(), -GAIN_STEP),
            KeyCode::Char('}') => nudge_gain(&mut engine, BusId::Drums, GAIN_STEP),
            KeyCode::Char('{') => nudge_gain(&mut engine, BusId::Drums, -GAIN_STEP),

            KeyCode::Up => engine.update_settings(|s| {
                cursor.part.settings_mut(s).adjust_probability(cursor.step, PROBABILITY_STEP)
            }),
            KeyCode::Down => engine.update_settings(|s| {
                cursor.part.settings_mut(s).adjust_probability(cursor.step, -PROBABILITY_STEP)
            }),
            KeyCode::Left => {
                drop(engine);
                self.cursor.step = (cursor.step + STEPS - 1) % STEPS;
            }
            KeyCode::Right => {
                drop(engine);
                self.cursor.step = (cursor.step + 1) % STEPS;
            }
            KeyCode::Tab => {
                drop(engine);
                self.cursor.part = cursor.part.other();
            }
            _ => {}
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame, status: &EngineStatus, settings: &Settings) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(6), // Step grids
                Constraint::Min(8),    // Scope + spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.scope);
        render_transport(frame, chunks[0], status, settings, &stats, self.sample_rate);
        render_steps(frame, chunks[1], settings, &self.cursor, status.beat);

        let views = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, views[0], &self.scope);
        render_spectrum(frame, views[1], self.spectrum.bands());

        let help = Paragraph::new(
            " [Q] Quit [Space] Pause [1/2/3] Drums [+/-] Tempo [k/K] Key [s/S] Shuffle \
             [c/C] Scale [w/W] Wave [Tab] Part [←→] Step [↑↓] Prob [[/]] Part gain [{/}] Drum gain",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

fn nudge_gain(engine: &mut Engine, bus: BusId, delta: f32) {
    let gain = (engine.bus_gain(bus) + delta).clamp(0.0, GAIN_MAX);
    engine.set_bus_gain(bus, gain);
}

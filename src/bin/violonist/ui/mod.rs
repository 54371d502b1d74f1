//! TUI module for violonist
//!
//! Keyboard control of the ensemble plus live views of its output.

mod spectrum;
pub mod state;
mod strings;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

use sfdsp::dsp::CircularBuffer;
use sfdsp::instrument::EnsembleMessage;

pub use state::{StringLevels, UiSetup, STRING_COUNT};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::StringState;
use strings::render_strings;
use waveform::render_waveform;

/// Scope length, also the FFT size
const SCOPE_LEN: usize = 2048;
const STEP: f32 = 0.05;
/// Highest fingered note above the open string, in semitones
const MAX_SHIFT: i32 = 12;
const COUPLING_ON: f32 = 0.1;

pub struct UiApp {
    control_tx: Producer<EnsembleMessage>,
    scope_rx: Consumer<f32>,
    level_rx: Consumer<StringLevels>,
    scope: CircularBuffer<SCOPE_LEN>,
    spectrum: SpectrumAnalyzer,
    tuning: [f32; STRING_COUNT],
    shifts: [i32; STRING_COUNT],
    strings: [StringState; STRING_COUNT],
    levels: StringLevels,
    selected: usize,
    velocity: f32,
    force: f32,
    bow_position: f32,
    coupled: bool,
    /// Ratio the coupling key switches on
    coupling_on: f32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        control_tx: Producer<EnsembleMessage>,
        scope_rx: Consumer<f32>,
        level_rx: Consumer<StringLevels>,
        setup: UiSetup,
    ) -> Self {
        let mut strings = [StringState::default(); STRING_COUNT];
        for (string, &frequency) in strings.iter_mut().zip(setup.tuning.iter()) {
            string.frequency = frequency;
        }

        Self {
            control_tx,
            scope_rx,
            level_rx,
            scope: CircularBuffer::new(),
            spectrum: SpectrumAnalyzer::new(SCOPE_LEN, setup.sample_rate),
            tuning: setup.tuning,
            shifts: [0; STRING_COUNT],
            strings,
            levels: StringLevels::default(),
            selected: 0,
            velocity: setup.velocity,
            force: setup.force,
            bow_position: 0.15,
            coupled: setup.coupling > 0.0,
            coupling_on: if setup.coupling > 0.0 {
                setup.coupling
            } else {
                COUPLING_ON
            },
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        // Leave the strings quiet for the next run
        self.send(EnsembleMessage::AllStop);
        Ok(())
    }

    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.write(sample);
            received = true;
        }
        if received {
            let scope = &self.scope;
            self.spectrum.update((0..SCOPE_LEN).map(|i| scope[i]));
        }

        // Keep only the latest levels
        while let Ok(levels) = self.level_rx.pop() {
            self.levels = levels;
        }
    }

    fn send(&mut self, message: EnsembleMessage) {
        // A full queue means the audio thread stalled; drop the request
        let _ = self.control_tx.push(message);
    }

    fn set_bowing(&mut self, string: usize, bowing: bool) {
        self.strings[string].bowing = bowing;
        let force = if bowing { self.force } else { 0.0 };
        self.send(EnsembleMessage::SetForce { string, force });
    }

    fn shift_pitch(&mut self, semitones: i32) {
        let string = self.selected;
        let shift = (self.shifts[string] + semitones).clamp(0, MAX_SHIFT);
        self.shifts[string] = shift;

        let frequency = self.tuning[string] * 2.0_f32.powf(shift as f32 / 12.0);
        self.strings[string].frequency = frequency;
        self.send(EnsembleMessage::SetFrequency { string, frequency });
    }

    fn broadcast_velocity(&mut self) {
        for string in 0..STRING_COUNT {
            let velocity = self.velocity;
            self.send(EnsembleMessage::SetVelocity { string, velocity });
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(c @ '1'..='4') => {
                self.selected = (c as usize - '1' as usize).min(STRING_COUNT - 1);
            }
            KeyCode::Char(' ') => {
                let bowing = !self.strings[self.selected].bowing;
                self.set_bowing(self.selected, bowing);
            }
            KeyCode::Char('p') => {
                let string = self.selected;
                self.send(EnsembleMessage::Pluck { string });
            }
            KeyCode::Up => self.shift_pitch(1),
            KeyCode::Down => self.shift_pitch(-1),
            KeyCode::Left | KeyCode::Right => {
                let step = if key == KeyCode::Right { STEP } else { -STEP };
                self.bow_position = (self.bow_position + step).clamp(0.05, 0.95);
                for string in 0..STRING_COUNT {
                    let position = self.bow_position;
                    self.send(EnsembleMessage::SetBowPosition { string, position });
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.velocity = (self.velocity + STEP).min(1.0);
                self.broadcast_velocity();
            }
            KeyCode::Char('-') => {
                self.velocity = (self.velocity - STEP).max(0.0);
                self.broadcast_velocity();
            }
            KeyCode::Char(']') | KeyCode::Char('[') => {
                let step = if key == KeyCode::Char(']') { STEP } else { -STEP };
                // Never zero, which would lift the bow
                self.force = (self.force + step).clamp(STEP, 1.0);
                for string in 0..STRING_COUNT {
                    if self.strings[string].bowing {
                        self.set_bowing(string, true);
                    }
                }
            }
            KeyCode::Char('c') => {
                self.coupled = !self.coupled;
                let ratio = if self.coupled { self.coupling_on } else { 0.0 };
                self.send(EnsembleMessage::SetBridgeCoupling(ratio));
            }
            KeyCode::Char('s') => {
                for string in self.strings.iter_mut() {
                    string.bowing = false;
                }
                self.send(EnsembleMessage::AllStop);
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(STRING_COUNT as u16 + 2), // Strings
                Constraint::Length(1),                       // Bow settings
                Constraint::Min(8),                          // Waveform
                Constraint::Length(12),                      // Spectrum
                Constraint::Length(1),                       // Help bar
            ])
            .split(area);

        render_strings(
            frame,
            chunks[0],
            &self.strings,
            &self.levels,
            self.selected,
        );

        let settings = Paragraph::new(format!(
            " velocity {:.2}  force {:.2}  bow at {:.2}  coupling {}",
            self.velocity,
            self.force,
            self.bow_position,
            if self.coupled { "on" } else { "off" },
        ));
        frame.render_widget(settings, chunks[1]);

        render_waveform(frame, chunks[2], &self.scope);
        render_spectrum(frame, chunks[3], &self.spectrum);

        let help = Paragraph::new(
            " [1-4] String  [Space] Bow  [P] Pluck  [Up/Down] Pitch  [Left/Right] Bow pos  [+/-] Velocity  [ [/] ] Force  [C] Coupling  [S] Stop  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}

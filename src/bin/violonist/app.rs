//! Violonist - audio setup and the realtime render loop

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use sfdsp::{
    dsp::rms::Rms,
    instrument::{EnsembleMessage, StringEnsemble, VIOLIN_TUNING},
    MAX_BLOCK_SIZE,
};

use super::ui::{StringLevels, UiApp, UiSetup, STRING_COUNT};

/// Pending control messages the audio thread can fall behind by
const CONTROL_QUEUE: usize = 256;
/// Samples buffered for the scope and spectrum
const SCOPE_QUEUE: usize = 16_384;
const LEVEL_QUEUE: usize = 64;
/// RMS meter window in milliseconds
const METER_WINDOW_MS: f32 = 50.0;

/// Application builder
pub struct Violonist {
    tuning: [f32; STRING_COUNT],
    velocity: f32,
    force: f32,
    coupling: f32,
    master_gain: f32,
}

impl Violonist {
    pub fn new() -> Self {
        Self {
            tuning: VIOLIN_TUNING,
            velocity: 0.5,
            force: 0.5,
            coupling: 0.0,
            master_gain: 0.5,
        }
    }

    /// Open string frequencies, low to high
    pub fn tuning(mut self, tuning: [f32; STRING_COUNT]) -> Self {
        self.tuning = tuning;
        self
    }

    /// Bow speed for every string, 0..=1
    pub fn velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    /// Bow force used when a string is bowed, 0..=1
    pub fn force(mut self, force: f32) -> Self {
        self.force = force;
        self
    }

    /// Share of the bridge signal fed back into every string, 0..=1
    pub fn coupling(mut self, coupling: f32) -> Self {
        self.coupling = coupling;
        self
    }

    /// Output level applied to the ensemble mix before clipping
    pub fn master_gain(mut self, master_gain: f32) -> Self {
        self.master_gain = master_gain;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let mut ensemble = StringEnsemble::new(sample_rate, &self.tuning)
            .wrap_err("failed to build the string ensemble")?;
        ensemble.set_bridge_coupling(self.coupling)?;
        for string in 0..STRING_COUNT {
            ensemble.set_velocity(string, self.velocity)?;
        }

        let meter_window = (METER_WINDOW_MS * 0.001 * sample_rate) as usize;
        let mut meters = (0..STRING_COUNT)
            .map(|_| Rms::new(meter_window))
            .collect::<Result<Vec<_>, _>>()?;

        let (control_tx, mut control_rx) = RingBuffer::<EnsembleMessage>::new(CONTROL_QUEUE);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE);
        let (mut level_tx, level_rx) = RingBuffer::<StringLevels>::new(LEVEL_QUEUE);

        let master_gain = self.master_gain;
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut string_outs = [0.0f32; STRING_COUNT];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                // Invalid requests from the UI are dropped
                ensemble.drain(&mut control_rx);

                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];

                    for sample in block.iter_mut() {
                        let mix = ensemble.tick_each(&mut string_outs);
                        for (meter, &out) in meters.iter_mut().zip(string_outs.iter()) {
                            meter.tick(out);
                        }
                        *sample = (mix * master_gain).clamp(-1.0, 1.0);
                    }

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                        // The scope drops samples while the UI lags behind
                        let _ = scope_tx.push(s);
                    }

                    frames_written += frames_to_render;
                }

                let mut levels = StringLevels::default();
                for (level, meter) in levels.rms.iter_mut().zip(meters.iter()) {
                    *level = meter.rms();
                }
                let _ = level_tx.push(levels);
            },
            |err| eprintln!("Audio error: {}", err),
            None,
        )?;

        stream.play()?;

        let setup = UiSetup {
            sample_rate,
            tuning: self.tuning,
            velocity: self.velocity,
            force: self.force,
            coupling: self.coupling,
        };
        let mut app = UiApp::new(control_tx, scope_rx, level_rx, setup);

        let mut terminal = ratatui::init();
        let result = app.run(&mut terminal);
        ratatui::restore();
        result
    }
}

impl Default for Violonist {
    fn default() -> Self {
        Self::new()
    }
}

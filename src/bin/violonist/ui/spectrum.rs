//! Spectrum widget
//!
//! Windowed FFT of the scope buffer, shown on log-spaced bins over the
//! range a violin actually covers, plus the strongest peak as a pitch
//! readout.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use sfdsp::dsp::utils::hann;

const DISPLAY_BINS: usize = 64;
const MIN_FREQ: f64 = 100.0;
const MAX_FREQ: f64 = 8_000.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    sample_rate: f32,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin for each display point
    bin_indices: Vec<usize>,
    /// (log10 frequency, magnitude dB)
    spectrum: Vec<(f64, f64)>,
    peak_hz: f32,
}

impl SpectrumAnalyzer {
    pub fn new(fft_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_len);

        let window = (0..fft_len)
            .map(|i| hann(i as f32, fft_len as f32))
            .collect();

        let max_freq = MAX_FREQ.min(sample_rate as f64 / 2.0);
        let half = (fft_len / 2).max(1);
        let (bin_indices, spectrum) = (0..DISPLAY_BINS)
            .map(|i| {
                let t = i as f64 / (DISPLAY_BINS - 1) as f64;
                let freq = MIN_FREQ * (max_freq / MIN_FREQ).powf(t);
                let index = (freq * fft_len as f64 / sample_rate as f64).round() as usize;
                (index.min(half - 1), (freq.log10(), FLOOR_DB))
            })
            .unzip();

        Self {
            sample_rate,
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); fft_len],
            bin_indices,
            spectrum,
            peak_hz: 0.0,
        }
    }

    /// Recompute from the most recent FFT-length samples, oldest first.
    pub fn update(&mut self, samples: impl Iterator<Item = f32>) {
        for ((slot, sample), w) in self.scratch.iter_mut().zip(samples).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let power = |bin: Complex<f32>| ((bin.re * bin.re + bin.im * bin.im) as f64).max(1e-12);

        for ((_, magnitude_db), &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            *magnitude_db = (10.0 * power(self.scratch[index]).log10()).max(FLOOR_DB);
        }

        // Strongest bin above the display floor, refined by parabolic fit
        let half = self.scratch.len() / 2;
        let first = (MIN_FREQ * self.scratch.len() as f64 / self.sample_rate as f64) as usize;
        let peak = (first.max(1)..half.saturating_sub(1))
            .max_by(|&a, &b| power(self.scratch[a]).total_cmp(&power(self.scratch[b])));

        self.peak_hz = match peak {
            Some(k) if power(self.scratch[k]) > 1e-6 => {
                let (l, c, r) = (
                    power(self.scratch[k - 1]).ln(),
                    power(self.scratch[k]).ln(),
                    power(self.scratch[k + 1]).ln(),
                );
                let denom = l - 2.0 * c + r;
                let offset = if denom.abs() > f64::EPSILON {
                    0.5 * (l - r) / denom
                } else {
                    0.0
                };
                ((k as f64 + offset) * self.sample_rate as f64 / self.scratch.len() as f64) as f32
            }
            _ => 0.0,
        };
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }

    /// Frequency of the loudest partial, 0 when silent
    pub fn peak_hz(&self) -> f32 {
        self.peak_hz
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, analyzer: &SpectrumAnalyzer) {
    let title = if analyzer.peak_hz() > 0.0 {
        format!(
            " Spectrum - peak {:.1} Hz ({}) ",
            analyzer.peak_hz(),
            super::state::note_name(analyzer.peak_hz())
        )
    } else {
        String::from(" Spectrum ")
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(analyzer.data());

    let (lo, hi) = match (analyzer.data().first(), analyzer.data().last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => (MIN_FREQ.log10(), MAX_FREQ.log10()),
    };

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec!["100", "1k", "8k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 20.0])
                .labels(vec!["-100", "-40", "20"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

use crate::dsp::delay::DelayLine;
use crate::dsp::interpolation::InterpolationType;
use crate::{ConfigError, Sample};

/// Sliding-window RMS meter.
///
/// Keeps a running sum of `x^2 / N`. Each new square enters the sum and the
/// one from `N` samples ago, read back from a delay line, leaves it.
#[derive(Debug, Clone)]
pub struct Rms {
    window: usize,
    squares: DelayLine,
    running_sum: f32,
    value: f32,
}

impl Rms {
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::InvalidCapacity {
                requested: 0,
                min: 1,
            });
        }

        let mut squares = DelayLine::new(window + 1, InterpolationType::None)?;
        squares.set_delay(window as f32)?;

        Ok(Self {
            window,
            squares,
            running_sum: 0.0,
            value: 0.0,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    pub fn tick(&mut self, input: Sample) -> f32 {
        let square = input * input / self.window as f32;
        let leaving = self.squares.tick(square);

        // Rounding can leave the sum a hair below zero on silence
        self.running_sum = (self.running_sum + square - leaving).max(0.0);
        self.value = self.running_sum.sqrt();
        self.value
    }

    /// Feed a block and return the RMS after its last sample.
    pub fn process(&mut self, block: &[Sample]) -> f32 {
        for &sample in block {
            self.tick(sample);
        }
        self.value
    }

    /// Value after the most recent `tick`.
    pub fn rms(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.squares.reset();
        self.running_sum = 0.0;
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn sine_reads_amplitude_over_root_two() {
        let amplitude = 0.5;
        let mut rms = Rms::new(4096).unwrap();
        // 1500 Hz at 48 kHz fits exactly 128 periods in the window
        for n in 0..48_000 {
            rms.tick(amplitude * (TAU * 1500.0 * n as f32 / 48_000.0).sin());
        }

        let expected = amplitude / 2.0_f32.sqrt();
        assert!(
            (rms.rms() - expected).abs() < 1e-3,
            "{} vs {expected}",
            rms.rms()
        );
    }

    #[test]
    fn constant_signal_reads_its_level_once_window_fills() {
        let mut rms = Rms::new(64).unwrap();
        let ramping = rms.process(&[0.8; 32]);
        assert!(ramping < 0.8);

        let full = rms.process(&[0.8; 64]);
        assert!((full - 0.8).abs() < 1e-4);
    }

    #[test]
    fn silence_after_signal_returns_to_zero() {
        let mut rms = Rms::new(16).unwrap();
        rms.process(&[1.0; 16]);
        let out = rms.process(&[0.0; 16]);
        assert!(out < 1e-3, "{out}");
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(Rms::new(0).is_err());
    }

    #[test]
    fn reset_clears_reading() {
        let mut rms = Rms::new(8).unwrap();
        rms.process(&[0.5; 8]);
        rms.reset();
        assert_eq!(rms.rms(), 0.0);
        assert_eq!(rms.tick(0.0), 0.0);
    }
}

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::utils::fast_mod1;
use crate::{ConfigError, Sample};

/*
Phase-Accumulator Oscillators
=============================

Every oscillator here is a phase in [0, 1) that advances by

    increment = frequency / sample_rate

each sample, fed through a waveform function. Keeping phase normalised
(instead of radians) makes the waveform functions reusable: the
phaseshapers in `phaseshaper.rs` bend the phase first and then call the
same `sine` / `tri` below.

  phase   0 ........ 0.25 ........ 0.5 ........ 0.75 ........ 1
  sine    0           1            0           -1            0
  tri    -1           0            1            0           -1
  saw    -1         -0.5           0           0.5           1
  square  1 ........................|-1 ......................   (duty 0.5)

The waveforms are naive (not band-limited). They are meant as control
signals and test tones; anything audible at high pitch should go through
the phaseshaper, which corrects its discontinuities.
*/

#[inline]
pub fn sine(phase: f32) -> f32 {
    (TAU * phase).sin()
}

#[inline]
pub fn cosine(phase: f32) -> f32 {
    (TAU * phase).cos()
}

#[inline]
pub fn tri(phase: f32) -> f32 {
    let t = 2.0 * fast_mod1(phase) - 1.0;
    2.0 * t.abs() - 1.0
}

#[inline]
pub fn saw(phase: f32) -> f32 {
    2.0 * fast_mod1(phase) - 1.0
}

/// `+1` while `phase <= duty`, `-1` after.
#[inline]
pub fn square(phase: f32, duty: f32) -> f32 {
    if fast_mod1(phase) > duty {
        -1.0
    } else {
        1.0
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorType {
    #[default]
    Sine,
    Tri,
    Saw,
    Square,
}

#[derive(Debug, Clone)]
pub struct BasicOscillator {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    increment: f32,
    duty: f32,
    osc_type: OscillatorType,
}

impl BasicOscillator {
    pub fn new(
        sample_rate: f32,
        frequency: f32,
        osc_type: OscillatorType,
    ) -> Result<Self, ConfigError> {
        let sample_rate = ConfigError::check_sample_rate(sample_rate)?;
        Ok(Self {
            sample_rate,
            frequency,
            phase: 0.0,
            increment: frequency / sample_rate,
            duty: 0.5,
            osc_type,
        })
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.increment = frequency / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_phase(&mut self, phase: f32) {
        self.phase = fast_mod1(phase);
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Square wave duty cycle, clamped to `[0, 1]`.
    pub fn set_duty(&mut self, duty: f32) {
        self.duty = duty.clamp(0.0, 1.0);
    }

    pub fn set_type(&mut self, osc_type: OscillatorType) {
        self.osc_type = osc_type;
    }

    pub fn osc_type(&self) -> OscillatorType {
        self.osc_type
    }

    #[inline]
    pub fn next_sample(&mut self) -> Sample {
        let out = match self.osc_type {
            OscillatorType::Sine => sine(self.phase),
            OscillatorType::Tri => tri(self.phase),
            OscillatorType::Saw => saw(self.phase),
            OscillatorType::Square => square(self.phase, self.duty),
        };

        self.phase = fast_mod1(self.phase + self.increment);
        out
    }

    pub fn render(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// White noise in `[-1, 1]` from a xorshift generator.
///
/// The same seed always produces the same sequence.
#[derive(Debug, Clone)]
pub struct Noise {
    seed: u32,
    state: u32,
}

impl Noise {
    pub fn new(seed: u32) -> Self {
        // Zero is a fixed point of xorshift
        let seed = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { seed, state: seed }
    }

    #[inline]
    pub fn next_sample(&mut self) -> Sample {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;

        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    pub fn render(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Restart the sequence from the seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    #[test]
    fn waveforms_hit_expected_points() {
        assert!(sine(0.0).abs() < 1e-6);
        assert!((sine(0.25) - 1.0).abs() < 1e-6);
        assert!((cosine(0.0) - 1.0).abs() < 1e-6);
        assert!((tri(0.0) + 1.0).abs() < 1e-6);
        assert!((tri(0.5) - 1.0).abs() < 1e-6);
        assert!((saw(0.0) + 1.0).abs() < 1e-6);
        assert!(saw(0.5).abs() < 1e-6);
        assert_eq!(square(0.2, 0.5), 1.0);
        assert_eq!(square(0.7, 0.5), -1.0);
        assert_eq!(square(0.7, 0.75), 1.0);
    }

    #[test]
    fn phase_advances_by_frequency_over_sample_rate() {
        let mut osc = BasicOscillator::new(SR, 480.0, OscillatorType::Saw).unwrap();
        osc.next_sample();
        assert!((osc.phase() - 0.01).abs() < 1e-6);

        // 100 samples is one full period at 480 Hz
        for _ in 0..99 {
            osc.next_sample();
        }
        assert!(osc.phase() < 1e-3 || osc.phase() > 1.0 - 1e-3);
    }

    #[test]
    fn sine_oscillator_stays_bounded_and_zero_mean() {
        let mut osc = BasicOscillator::new(SR, 1000.0, OscillatorType::Sine).unwrap();
        let mut block = [0.0; 4800];
        osc.render(&mut block);

        assert!(block.iter().all(|s| s.abs() <= 1.0));
        let mean = block.iter().sum::<f32>() / block.len() as f32;
        assert!(mean.abs() < 1e-3, "mean {mean}");
    }

    #[test]
    fn square_duty_sets_high_fraction() {
        let mut osc = BasicOscillator::new(SR, 480.0, OscillatorType::Square).unwrap();
        osc.set_duty(0.25);
        let mut block = [0.0; 100];
        osc.render(&mut block);

        let high = block.iter().filter(|&&s| s > 0.0).count();
        assert!((25..=27).contains(&high), "high for {high} samples");
    }

    #[test]
    fn invalid_sample_rate_is_rejected() {
        assert!(BasicOscillator::new(0.0, 440.0, OscillatorType::Sine).is_err());
    }

    #[test]
    fn noise_is_bounded_and_repeatable() {
        let mut a = Noise::new(42);
        let mut b = Noise::new(42);
        let mut block_a = [0.0; 1024];
        let mut block_b = [0.0; 1024];
        a.render(&mut block_a);
        b.render(&mut block_b);

        assert_eq!(block_a, block_b);
        assert!(block_a.iter().all(|s| (-1.0..=1.0).contains(s)));

        a.reset();
        assert_eq!(a.next_sample(), block_a[0]);
    }

    #[test]
    fn zero_seed_still_produces_noise() {
        let mut noise = Noise::new(0);
        let first = noise.next_sample();
        let second = noise.next_sample();
        assert_ne!(first, second);
    }
}

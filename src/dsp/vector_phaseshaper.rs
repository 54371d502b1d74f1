use crate::dsp::oscillator::cosine;
use crate::dsp::utils::fast_mod1;
use crate::{ConfigError, Sample};

/// Two-segment phase distortion through an inverted cosine.
///
/// The inflection point `(d, v)` bends the phase: the first `d` of a cycle
/// covers phase `0..v`, the rest covers `v..1`. `(0.5, 0.5)` is a plain
/// (inverted) cosine. Raising `v` above `d` packs more than one half-cycle
/// into the first segment and adds formant-like harmonics.
#[derive(Debug, Clone)]
pub struct VectorPhaseshaper {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    increment: f32,
    d: f32,
    v: f32,
}

#[inline]
fn phase_distort(x: f32, d: f32, v: f32) -> f32 {
    if x < d {
        v * x / d
    } else {
        (1.0 - v) * ((x - d) / (1.0 - d)) + v
    }
}

impl VectorPhaseshaper {
    const D_RANGE: (f32, f32) = (0.01, 0.99);

    pub fn new(sample_rate: f32) -> Result<Self, ConfigError> {
        let sample_rate = ConfigError::check_sample_rate(sample_rate)?;
        Ok(Self {
            sample_rate,
            frequency: 0.0,
            phase: 0.0,
            increment: 0.0,
            d: 0.5,
            v: 0.5,
        })
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.increment = frequency / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set the inflection point. `d` must lie inside `[0.01, 0.99]` so both
    /// segments have a non-zero width.
    pub fn set_mod(&mut self, d: f32, v: f32) -> Result<(), ConfigError> {
        let (min, max) = Self::D_RANGE;
        let d = ConfigError::check_range("d", d, min, max)?;
        self.v = ConfigError::check_range("v", v, 0.0, 8.0)?;
        self.d = d;
        Ok(())
    }

    #[inline]
    pub fn next_sample(&mut self) -> Sample {
        self.phase = fast_mod1(self.phase + self.increment);
        -cosine(phase_distort(self.phase, self.d, self.v))
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

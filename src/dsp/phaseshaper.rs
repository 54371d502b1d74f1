#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::sine;
use crate::dsp::utils::fast_mod1;
use crate::{ConfigError, Sample};

/*
Phaseshaping
============

A phaseshaper takes the plain 0..1 ramp of a phase accumulator, bends it
through a few cheap piecewise-linear functions, and only then looks up a
waveform. Small changes to the bending give large timbral changes, and one
`mod` knob in [0, 1] sweeps each shape (Kleimola, Lazzarini, Timoney and
Välimäki, "Phaseshaping oscillator algorithms for musical sound synthesis",
SMC 2010).

Building blocks, all on phase x in [0, 1):

  bipolar(x)        2x - 1
  g_lin(x, a)       a * x                   (scale)
  g_ramp(x, a)      (a * x) mod 1           (scale and wrap, i.e. hard sync)
  g_tri(x, a)       (a * |2x - 1|) mod 1    (fold then wrap)
  s_tri(x)          2x below 0.5, 2 - 2x above

Shapes and what `mod` does to them:

  VariableSlope   sine whose first half-cycle is squeezed into width w
                  (w from 0.5 down to 0.1)
  WaveSlice       a slice of a sine, a1 from 0.25 to 0.40 of a cycle,
                  with a polyBLEP at the wrap
  Supersaw        two wrapped ramps summed, m1 from 0.25 to 0.75
  Ripple          staircase on top of a saw, step from 0 to 0.1
  SoftSync        folded ramp through a triangle, a1 from 1 to 1.5
  TriangleMod     triangle folded back by a gain from 0.5 to 1.5

The order of the shapes matters: `set_waveform(1.5)` crossfades WaveSlice
and Supersaw half and half, so neighbours are chosen to morph pleasantly.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    VariableSlope,
    WaveSlice,
    Supersaw,
    Ripple,
    SoftSync,
    TriangleMod,
}

impl Waveform {
    pub const ALL: [Waveform; 6] = [
        Waveform::VariableSlope,
        Waveform::WaveSlice,
        Waveform::Supersaw,
        Waveform::Ripple,
        Waveform::SoftSync,
        Waveform::TriangleMod,
    ];

    pub const COUNT: usize = Self::ALL.len();

    fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::COUNT - 1)]
    }
}

#[inline]
fn bipolar(x: f32) -> f32 {
    2.0 * x - 1.0
}

#[inline]
fn g_tri(x: f32, a1: f32) -> f32 {
    fast_mod1(a1 * bipolar(x).abs())
}

#[inline]
fn s_tri(x: f32) -> f32 {
    if x < 0.5 {
        2.0 * x
    } else {
        2.0 - 2.0 * x
    }
}

/// Two-sample polynomial correction for a step of height `h` at the phase
/// wrap.
#[inline]
fn poly_blep(x: f32, phase: f32, increment: f32, h: f32) -> f32 {
    if phase > 1.0 - increment {
        let t = (phase - 1.0) / increment;
        x + h * (0.5 * t * t + t + 0.5)
    } else if phase < increment {
        let t = phase / increment;
        x + h * (-0.5 * t * t + t - 0.5)
    } else {
        x
    }
}

#[derive(Debug, Clone)]
pub struct Phaseshaper {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    increment: f32,
    waveform: f32,
    modulation: f32,
}

impl Phaseshaper {
    pub fn new(sample_rate: f32) -> Result<Self, ConfigError> {
        let sample_rate = ConfigError::check_sample_rate(sample_rate)?;
        let frequency = 220.0;
        Ok(Self {
            sample_rate,
            frequency,
            phase: 0.0,
            increment: frequency / sample_rate,
            waveform: Waveform::WaveSlice as usize as f32,
            modulation: 0.0,
        })
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.increment = frequency / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Select a shape, or morph between two neighbours with a fractional
    /// value. Clamped to the available shapes.
    pub fn set_waveform(&mut self, waveform: f32) {
        let max = (Waveform::COUNT - 1) as f32;
        self.waveform = if waveform.is_nan() {
            0.0
        } else {
            waveform.clamp(0.0, max)
        };
    }

    pub fn set_shape(&mut self, waveform: Waveform) {
        self.waveform = waveform as usize as f32;
    }

    pub fn waveform(&self) -> f32 {
        self.waveform
    }

    /// Shape-specific modulation, clamped to `[0, 1]`.
    pub fn set_mod(&mut self, modulation: f32) {
        self.modulation = modulation.clamp(0.0, 1.0);
    }

    pub fn modulation(&self) -> f32 {
        self.modulation
    }

    #[inline]
    pub fn next_sample(&mut self) -> Sample {
        let lower = self.waveform.floor();
        let upper = self.waveform.ceil();
        let weight = self.waveform - lower;

        let mut out = self.process_wave(Waveform::from_index(lower as usize)) * (1.0 - weight);
        if upper != lower {
            out += self.process_wave(Waveform::from_index(upper as usize)) * weight;
        }

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

    fn process_wave(&self, waveform: Waveform) -> Sample {
        match waveform {
            Waveform::VariableSlope => self.variable_slope(),
            Waveform::WaveSlice => self.wave_slice(),
            Waveform::Supersaw => self.supersaw(),
            Waveform::Ripple => self.ripple(),
            Waveform::SoftSync => self.soft_sync(),
            Waveform::TriangleMod => self.triangle_mod(),
        }
    }

    fn variable_slope(&self) -> Sample {
        let width = 0.5 - 0.4 * self.modulation;
        let x = self.phase;
        let slope = if x < width {
            0.5 * x / width
        } else {
            0.5 + 0.5 * (x - width) / (1.0 - width)
        };
        sine(slope)
    }

    fn wave_slice(&self) -> Sample {
        let a1 = 0.25 + 0.15 * self.modulation;
        let trivial = bipolar(sine(a1 * self.phase));

        // Falls from bipolar(sine(a1)) back to -1 at the wrap
        let step = -2.0 * sine(a1);
        poly_blep(trivial, self.phase, self.increment, step)
    }

    fn supersaw(&self) -> Sample {
        let m1 = 0.25 + 0.5 * self.modulation;
        const M2: f32 = 0.88;
        let xs = 1.5 * self.phase;

        // Radians, not cycles
        let angle = xs % m1 + xs % M2;
        bipolar(angle.sin())
    }

    fn ripple(&self) -> Sample {
        let step = 0.1 * self.modulation;
        let x = self.phase;
        if step > 0.0 {
            bipolar(x - x % step)
        } else {
            bipolar(x)
        }
    }

    fn soft_sync(&self) -> Sample {
        let a1 = 1.0 + 0.5 * self.modulation;
        bipolar(s_tri(g_tri(self.phase, a1)))
    }

    fn triangle_mod(&self) -> Sample {
        let gain = 0.5 + self.modulation;
        let p = gain * bipolar(g_tri(self.phase, 1.0));
        2.0 * (p - (p - 0.5).ceil())
    }
}

//! Low-level DSP primitives used by the waveguide network and instruments.
//!
//! These components allocate only when constructed and are realtime-safe
//! afterwards, so they can be embedded directly inside instrument structs.
//! They stay focused on the signal-processing math; the waveguide and
//! instrument layers handle topology and parameter mapping.

/// Fixed-capacity ring buffer.
pub mod circular_buffer;
/// Modulated delay chorus.
pub mod chorus;
/// Fractional delay line with pluggable interpolation.
pub mod delay;
/// One/two pole, one/two zero and biquad sections.
pub mod filter;
/// Fractional-index reconstruction strategies.
pub mod interpolation;
/// Linear ramp generator.
pub mod line;
/// Phase-accumulator oscillators and basic waveforms.
pub mod oscillator;
/// Phaseshaping oscillators with morphable waveforms.
pub mod phaseshaper;
/// Windowed-sinc sample rate conversion.
pub mod resample;
/// Sliding window root-mean-square meter.
pub mod rms;
/// Exponential parameter smoothing.
pub mod smooth_param;
/// Conversions, window functions and phase helpers.
pub mod utils;
/// Two-segment phase distortion oscillator.
pub mod vector_phaseshaper;

pub use circular_buffer::CircularBuffer;
pub use delay::DelayLine;
pub use filter::{Biquad, Filter, OnePoleFilter, OneZeroFilter, TwoPoleFilter, TwoZeroFilter};
pub use interpolation::{InterpolationType, Interpolator};
pub use smooth_param::{SmoothParam, SmoothingType};

use crate::Sample;

/// Shared capability of every sample-in, sample-out processor.
///
/// Implementors are stateful; `tick` advances the state by one sample.
pub trait Processor {
    fn tick(&mut self, input: Sample) -> Sample;

    /// Process a block in place.
    fn render(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick(*sample);
        }
    }

    /// Clear internal state without touching configuration.
    fn reset(&mut self);
}

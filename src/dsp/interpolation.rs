#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Sample;

/*
Fractional Delay Interpolation
==============================

A delay line stores samples at integer positions. Reading "10.3 samples ago"
means reconstructing a value between two stored samples.

  Truncate    Drop the fraction. Cheapest, but the delay jumps in whole
              samples, which zippers when the delay is modulated.

  Linear      a + (b - a) * frac over the two neighbours. Cheap and smooth,
              but it is a lowpass: high frequencies are attenuated by up to
              6 dB at Nyquist when frac = 0.5.

  Allpass     First-order allpass section

                  y[n] = c * x[n] + x[n - 1] - c * y[n - 1]
                  c    = (1 - a) / (1 + a)

              Flat magnitude response, so the string loop keeps its
              brightness. The fractional part `a` is kept in [0.5, 1.5) by
              borrowing one sample of integer delay, which keeps `c` away
              from the pole at -1. Below one sample there is nothing to
              borrow, so delays under 0.5 are not allowed. It is stateful:
              one reader per instance.

Buffer addressing convention (shared with `DelayLine`): `write_ptr` is the
slot the next input is written to, and `buffer[(write_ptr + d) % len]` is
the sample that arrived `d` ticks ago.
*/

/// Interpolation chosen at construction time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationType {
    None,
    #[default]
    Linear,
    Allpass,
}

/// Reconstruction strategy, one instance per reader.
#[derive(Debug, Clone)]
pub enum Interpolator {
    /// Nearest-neighbour truncation (`InterpolationType::None`).
    Truncate,
    Linear,
    Allpass(AllpassState),
}

#[derive(Debug, Clone, Default)]
pub struct AllpassState {
    delay: f32,
    allpass_delay: usize,
    coeff: f32,
    last_in: Sample,
    last_out: Sample,
}

impl AllpassState {
    fn new() -> Self {
        Self {
            delay: -1.0, // forces a coefficient update on first use
            ..Self::default()
        }
    }

    fn update_coeff(&mut self, delay: f32) {
        if delay == self.delay {
            return;
        }

        self.delay = delay;
        let mut whole = delay as usize;
        let mut alpha = delay - whole as f32;

        if alpha < 0.5 {
            if whole > 0 {
                alpha += 1.0;
                whole -= 1;
            } else {
                alpha = ALLPASS_MIN_DELAY;
            }
        }

        self.allpass_delay = whole;
        self.coeff = (1.0 - alpha) / (1.0 + alpha);
    }
}

/// Shortest delay an allpass reader supports; `|c| <= 1/3` from here up.
pub const ALLPASS_MIN_DELAY: f32 = 0.5;

impl Interpolator {
    pub fn new(kind: InterpolationType) -> Self {
        match kind {
            InterpolationType::None => Interpolator::Truncate,
            InterpolationType::Linear => Interpolator::Linear,
            InterpolationType::Allpass => Interpolator::Allpass(AllpassState::new()),
        }
    }

    pub fn kind(&self) -> InterpolationType {
        match self {
            Interpolator::Truncate => InterpolationType::None,
            Interpolator::Linear => InterpolationType::Linear,
            Interpolator::Allpass(_) => InterpolationType::Allpass,
        }
    }

    /// Shortest delay this reader can produce without going unstable.
    pub fn min_delay(&self) -> f32 {
        match self {
            Interpolator::Allpass(_) => ALLPASS_MIN_DELAY,
            Interpolator::Truncate | Interpolator::Linear => 0.0,
        }
    }

    /// Reconstruct the value at a fractional index into `buffer`.
    #[inline]
    pub fn interpolate(&mut self, buffer: &[Sample], index: f32) -> Sample {
        self.tap_out(buffer, 0, index)
    }

    /// Read the sample `delay` ticks old relative to `write_ptr`.
    #[inline]
    pub fn tap_out(&mut self, buffer: &[Sample], write_ptr: usize, delay: f32) -> Sample {
        let len = buffer.len();
        match self {
            Interpolator::Truncate => buffer[(write_ptr + delay as usize) % len],
            Interpolator::Linear => linear_tap_out(buffer, write_ptr, delay),
            Interpolator::Allpass(state) => {
                state.update_coeff(delay);
                let x = buffer[(write_ptr + state.allpass_delay) % len];

                let out = state.coeff * x + state.last_in - state.coeff * state.last_out;
                state.last_in = x;
                state.last_out = out;
                out
            }
        }
    }

    /// Add `input` into `buffer` at a fractional delay.
    ///
    /// Truncate writes into a single slot; the others split the energy
    /// linearly over the two neighbouring slots.
    #[inline]
    pub fn tap_in(&self, buffer: &mut [Sample], write_ptr: usize, delay: f32, input: Sample) {
        let len = buffer.len();
        let whole = delay as usize;
        match self {
            Interpolator::Truncate => buffer[(write_ptr + whole) % len] += input,
            Interpolator::Linear | Interpolator::Allpass(_) => {
                let frac = delay - whole as f32;
                buffer[(write_ptr + whole) % len] += input * (1.0 - frac);
                buffer[(write_ptr + whole + 1) % len] += input * frac;
            }
        }
    }

    pub fn reset(&mut self) {
        if let Interpolator::Allpass(state) = self {
            *state = AllpassState::new();
        }
    }
}

/// Stateless linear read, shared by arbitrary taps.
#[inline]
pub(crate) fn linear_tap_out(buffer: &[Sample], write_ptr: usize, delay: f32) -> Sample {
    let len = buffer.len();
    let whole = delay as usize;
    let frac = delay - whole as f32;

    let a = buffer[(write_ptr + whole) % len];
    let b = buffer[(write_ptr + whole + 1) % len];
    a + (b - a) * frac
}

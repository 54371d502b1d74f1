use crate::dsp::interpolation::{linear_tap_out, InterpolationType, Interpolator};
use crate::dsp::Processor;
use crate::{ConfigError, Sample};

/*
Delay Line
==========

A ring buffer read at a (possibly fractional) distance behind the write
position. The write pointer walks *backwards* through the buffer, so
"d samples ago" is simply `buffer[(write_ptr + d) % len]` and every tap
helper shares the same addressing.

  tick(x):   buffer[w] = x
             y = read(w, delay)
             w = w - 1 (mod len)

With an integer delay D the output is x[n - D]; D = 0 passes the input
straight through. The largest usable delay is `capacity - 1`; allpass
lines need at least half a sample.

`next_out()` computes what the next `tick` will return (before the new
input is written) and caches it, so a waveguide can read both ends of its
lines, compute the junction updates, and only then advance. Calling it more
than once per tick costs nothing and keeps stateful interpolators correct.
Once computed, the value is frozen until that tick: later writes and delay
changes take effect from the tick after.
*/

#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Box<[Sample]>,
    write_ptr: usize,
    delay: f32,
    interpolator: Interpolator,
    next_out: Sample,
    next_out_ready: bool,
    last_out: Sample,
}

impl DelayLine {
    pub const MIN_CAPACITY: usize = 2;

    /// Allocate a line holding `max_size` samples. The delay starts at the
    /// maximum (`max_size - 1`).
    pub fn new(max_size: usize, interpolation: InterpolationType) -> Result<Self, ConfigError> {
        if max_size < Self::MIN_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                requested: max_size,
                min: Self::MIN_CAPACITY,
            });
        }

        Ok(Self {
            buffer: vec![0.0; max_size].into_boxed_slice(),
            write_ptr: 0,
            delay: (max_size - 1) as f32,
            interpolator: Interpolator::new(interpolation),
            next_out: 0.0,
            next_out_ready: false,
            last_out: 0.0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 1) as f32
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn interpolation(&self) -> InterpolationType {
        self.interpolator.kind()
    }

    /// Shortest accepted delay: 0.5 for allpass lines, 0 otherwise.
    pub fn min_delay(&self) -> f32 {
        self.interpolator.min_delay()
    }

    pub fn set_delay(&mut self, delay: f32) -> Result<(), ConfigError> {
        let max = self.max_delay();
        if !delay.is_finite() || delay > max {
            return Err(ConfigError::DelayOutOfRange { delay, max });
        }
        let min = self.min_delay();
        if delay < min {
            return Err(ConfigError::OutOfRange {
                name: "delay",
                value: delay,
                min,
                max,
            });
        }

        self.delay = delay;
        Ok(())
    }

    /// Like `set_delay`, but clamps into `min_delay()..=max_delay()` instead
    /// of failing. For delays modulated every sample.
    #[inline]
    pub fn set_delay_clamped(&mut self, delay: f32) {
        let min = self.min_delay();
        self.delay = if delay.is_nan() {
            min
        } else {
            delay.clamp(min, self.max_delay())
        };
    }

    /// Value the next `tick` will return.
    ///
    /// With a delay under one sample the next output depends on an input
    /// that has not arrived yet. Then this is a linear estimate from the
    /// stored samples: nothing is cached, the interpolator is left alone,
    /// and `tick` computes the real output once the input is written.
    #[inline]
    pub fn next_out(&mut self) -> Sample {
        if !self.next_out_ready {
            if self.delay < 1.0 {
                return linear_tap_out(&self.buffer, self.write_ptr, self.delay);
            }
            self.next_out = self
                .interpolator
                .tap_out(&self.buffer, self.write_ptr, self.delay);
            self.next_out_ready = true;
        }
        self.next_out
    }

    /// Output of the most recent `tick`.
    pub fn last_out(&self) -> Sample {
        self.last_out
    }

    /// Write `input`, read at the current delay and advance.
    #[inline]
    pub fn tick(&mut self, input: Sample) -> Sample {
        self.buffer[self.write_ptr] = input;

        // Sub-sample delays must see the input just written
        self.last_out = if self.next_out_ready || self.delay >= 1.0 {
            self.next_out()
        } else {
            self.interpolator
                .tap_out(&self.buffer, self.write_ptr, self.delay)
        };
        self.next_out_ready = false;

        self.write_ptr = self.write_ptr.checked_sub(1).unwrap_or(self.buffer.len() - 1);
        self.last_out
    }

    /// Linearly interpolated read `delay` samples behind the write position.
    ///
    /// The tap is clamped to `0..=self.delay()`.
    #[inline]
    pub fn tap_out(&self, delay: f32) -> Sample {
        let delay = delay.clamp(0.0, self.delay);
        linear_tap_out(&self.buffer, self.write_ptr, delay)
    }

    /// Add `input` at a fractional position, clamped like `tap_out`.
    #[inline]
    pub fn tap_in(&mut self, delay: f32, input: Sample) {
        let delay = delay.clamp(0.0, self.delay);
        self.interpolator
            .tap_in(&mut self.buffer, self.write_ptr, delay, input);
    }

    /// Overwrite the samples around a fractional position.
    ///
    /// The neighbouring slots receive `input` weighted by their distance,
    /// replacing what was there. An integer position touches one slot.
    pub fn set_in(&mut self, delay: f32, input: Sample) {
        let delay = delay.clamp(0.0, self.delay);
        let len = self.buffer.len();
        let whole = delay as usize;
        let frac = delay - whole as f32;

        self.buffer[(self.write_ptr + whole) % len] = input * (1.0 - frac);
        if frac > 0.0 {
            self.buffer[(self.write_ptr + whole + 1) % len] = input * frac;
        }
    }

    /// Sample stored exactly `age` ticks ago.
    #[inline]
    pub fn get(&self, age: usize) -> Sample {
        self.buffer[(self.write_ptr + age) % self.buffer.len()]
    }

    /// Overwrite the sample stored `age` ticks ago.
    #[inline]
    pub fn set(&mut self, age: usize, value: Sample) {
        let len = self.buffer.len();
        self.buffer[(self.write_ptr + age) % len] = value;
    }

    pub fn render(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_ptr = 0;
        self.interpolator.reset();
        self.next_out = 0.0;
        self.next_out_ready = false;
        self.last_out = 0.0;
    }
}

impl Processor for DelayLine {
    fn tick(&mut self, input: Sample) -> Sample {
        DelayLine::tick(self, input)
    }

    fn render(&mut self, buffer: &mut [Sample]) {
        DelayLine::render(self, buffer)
    }

    fn reset(&mut self) {
        DelayLine::reset(self)
    }
}

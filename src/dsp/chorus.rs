use crate::dsp::delay::DelayLine;
use crate::dsp::interpolation::InterpolationType;
use crate::dsp::oscillator::sine;
use crate::dsp::utils::ms_to_samples;
use crate::dsp::Processor;
use crate::{ConfigError, Sample};

/*
Chorus Effect
=============

Chorus thickens a sound by mixing the dry signal with a slightly delayed,
pitch-modulated copy. As the delay time moves, the copy is pitched up and
down a little, which mimics several players on the same part.

Structure (Dattorro, "Effect Design Part 2: Delay-Line Modulation and
Chorus"):

              +----------------- BL ------------------+
              |                                       v
  in --(+)--> xn --> [ delay line ] --> tap(base + mod) * FF --(+)--> wet
        ^                  |
        +--- FB <-- tap(base)

  FB = -0.7   feedback from the fixed centre tap
  FF =  1.0   feedforward from the modulated tap
  BL =  0.7   blend of the undelayed signal

The feedback tap sits at the centre delay and does not move, so the
feedback path never changes pitch; only the output tap is modulated.

Parameters
----------

Delay (ms):  centre delay. Around 10-25 ms for chorus.
Width (ms):  how far the output tap swings either side of the centre.
Speed (Hz):  LFO rate. 0.5-1.5 Hz is classic chorus.
Mix:         0 = dry only, 1 = chorus only.
*/

const FEEDBACK: f32 = -0.7;
const FEEDFORWARD: f32 = 1.0;
const BLEND: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct Chorus {
    sample_rate: f32,
    line: DelayLine,
    base_delay: f32,
    width: f32,
    speed: f32,
    phase: f32,
    phase_increment: f32,
    mix: f32,
}

impl Chorus {
    /// Build a chorus able to reach `max_delay_ms` of delay.
    ///
    /// Starts with the centre at half the maximum, a width of a tenth of
    /// it, 1 Hz speed and an even mix.
    pub fn new(sample_rate: f32, max_delay_ms: f32) -> Result<Self, ConfigError> {
        let sample_rate = ConfigError::check_sample_rate(sample_rate)?;
        let max_samples = ms_to_samples(max_delay_ms, sample_rate);
        if !max_samples.is_finite() || max_samples < 3.0 {
            return Err(ConfigError::DelayOutOfRange {
                delay: max_samples,
                max: 3.0,
            });
        }

        let capacity = max_samples.ceil() as usize + 2;
        let line = DelayLine::new(capacity, InterpolationType::Linear)?;
        log::debug!(
            "chorus: {capacity} sample delay line for {max_delay_ms} ms at {sample_rate} Hz"
        );

        let mut chorus = Self {
            sample_rate,
            line,
            base_delay: max_samples * 0.5,
            width: max_samples * 0.1,
            speed: 0.0,
            phase: 0.0,
            phase_increment: 0.0,
            mix: 0.5,
        };
        chorus.set_speed(1.0)?;
        Ok(chorus)
    }

    fn check_span(&self, base: f32, width: f32) -> Result<(), ConfigError> {
        let max = self.line.max_delay() - 1.0;
        if !(base.is_finite() && width.is_finite()) || width < 0.0 || base - width < 1.0 {
            return Err(ConfigError::DelayOutOfRange {
                delay: base - width,
                max,
            });
        }
        if base + width > max {
            return Err(ConfigError::DelayOutOfRange {
                delay: base + width,
                max,
            });
        }
        Ok(())
    }

    /// Centre delay. The swing `delay ± width` has to stay inside the line.
    pub fn set_delay_ms(&mut self, delay_ms: f32) -> Result<(), ConfigError> {
        let base = ms_to_samples(delay_ms, self.sample_rate);
        self.check_span(base, self.width)?;
        self.base_delay = base;
        Ok(())
    }

    pub fn delay_ms(&self) -> f32 {
        self.base_delay * 1000.0 / self.sample_rate
    }

    pub fn set_width_ms(&mut self, width_ms: f32) -> Result<(), ConfigError> {
        let width = ms_to_samples(width_ms, self.sample_rate);
        self.check_span(self.base_delay, width)?;
        self.width = width;
        Ok(())
    }

    pub fn width_ms(&self) -> f32 {
        self.width * 1000.0 / self.sample_rate
    }

    /// LFO rate in Hz, up to Nyquist.
    pub fn set_speed(&mut self, speed: f32) -> Result<(), ConfigError> {
        self.speed = ConfigError::check_range("speed", speed, 0.0, self.sample_rate * 0.5)?;
        self.phase_increment = speed / self.sample_rate;
        Ok(())
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_mix(&mut self, mix: f32) -> Result<(), ConfigError> {
        self.mix = ConfigError::check_range("mix", mix, 0.0, 1.0)?;
        Ok(())
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }
}

impl Processor for Chorus {
    #[inline]
    fn tick(&mut self, input: Sample) -> Sample {
        let modulation = sine(self.phase) * self.width;
        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        let feedback = self.line.tap_out(self.base_delay) * FEEDBACK;
        let xn = input + feedback;
        let wet = self.line.tap_out(self.base_delay + modulation) * FEEDFORWARD + BLEND * xn;
        self.line.tick(xn);

        (1.0 - self.mix) * input + self.mix * wet
    }

    fn reset(&mut self) {
        self.line.reset();
        self.phase = 0.0;
    }
}

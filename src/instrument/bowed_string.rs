#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::{Filter, OnePoleFilter};
use crate::dsp::interpolation::InterpolationType;
use crate::dsp::smooth_param::{SmoothParam, SmoothingType};
use crate::dsp::utils::hann;
use crate::dsp::Processor;
use crate::waveguide::{BowTable, Termination, Waveguide, WaveguideGate};
use crate::{ConfigError, Sample};

/*
Bowed String
============

  nut                  finger          bow               bridge
   |<------------------- waveguide (length L) --------------->|
   |                     gate           bow table             |
 Termination(nut_gain)                                Termination(-1)
                                                      + loss filter

Per sample:

  1. peek the waves arriving at both ends
  2. finger gate scatters (when pressed)
  3. bow: string velocity at the bow point is right + left; the velocity
     difference goes through the bow table and the result is added back
     into both lines
  4. both ends reflect and the waveguide advances

The fundamental is sample_rate / 2L, so setting a frequency sets L. The
open string is the longest length the waveguide has room for.
*/

const VELOCITY_OFFSET: f32 = 0.03;
const VELOCITY_SCALE: f32 = 0.2;
const DEFAULT_BOW_POSITION: f32 = 0.15;
const MIN_BOW_DISTANCE: f32 = 2.0;
/// Smoothed force below which the bow is off the string
const LIFT_FORCE: f32 = 1e-3;
/// Rigid, inverting bridge; losses come from its filter
const BRIDGE_GAIN: f32 = -1.0;

/// Construction parameters for a [`BowedString`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BowedStringConfig {
    pub sample_rate: f32,
    /// Capacity of each waveguide line, in samples.
    pub max_delay_size: usize,
    /// Lowest playable frequency in Hz.
    pub open_string_tuning: f32,
    pub nut_gain: f32,
    /// Loss filter at the bridge. A default lowpass is derived from the
    /// sample rate when absent.
    pub bridge_filter: Option<OnePoleFilter>,
    pub interpolation: InterpolationType,
}

impl Default for BowedStringConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            max_delay_size: 1024,
            open_string_tuning: 196.0,
            nut_gain: -0.98,
            bridge_filter: None,
            interpolation: InterpolationType::Allpass,
        }
    }
}

impl BowedStringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sample_rate = ConfigError::check_sample_rate(self.sample_rate)?;
        if !(self.open_string_tuning > 0.0) || !self.open_string_tuning.is_finite() {
            return Err(ConfigError::FrequencyOutOfRange {
                frequency: self.open_string_tuning,
                min: 0.0,
                max: sample_rate / 8.0,
            });
        }
        ConfigError::check_range("nut gain", self.nut_gain, -1.0, 1.0)?;
        if let Some(filter) = &self.bridge_filter {
            Termination::check_reflection(BRIDGE_GAIN, filter.peak_gain())?;
        }

        // A fractional length L needs floor(L) + 2 * frac(L) < L + 1 samples
        // in the right-going line, which itself needs one spare slot
        let open_delay = self.open_delay();
        let max = self.max_delay_size as f32 - 2.0;
        if open_delay > max {
            return Err(ConfigError::DelayOutOfRange {
                delay: open_delay,
                max,
            });
        }
        if open_delay < Waveguide::MIN_DELAY * 2.0 {
            return Err(ConfigError::FrequencyOutOfRange {
                frequency: self.open_string_tuning,
                min: 0.0,
                max: sample_rate / 8.0,
            });
        }
        Ok(())
    }

    fn open_delay(&self) -> f32 {
        self.sample_rate / (2.0 * self.open_string_tuning)
    }
}

/// Parameters addressable through [`BowedString::set_parameter`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamId {
    Velocity,
    Force,
    BowPosition,
    FingerPressure,
    NutGain,
    /// Bridge loss filter cutoff as a fraction of the sample rate.
    BridgeFilterCutoff,
    /// Detune in semitones, `-1..=1`.
    TuningAdjustment,
}

#[derive(Debug, Clone)]
pub struct BowedString {
    sample_rate: f32,
    open_string_tuning: f32,

    waveguide: Waveguide,
    gate: WaveguideGate,
    bow_table: BowTable,
    nut: Termination,
    bridge: Termination,

    velocity: SmoothParam,
    force: SmoothParam,
    finger_position: SmoothParam,

    frequency: f32,
    tuning_adjustment: f32,
    bow_ratio: f32,
    bow_position: f32,
    finger_pressure: f32,
    note_on: bool,
}

impl BowedString {
    pub fn new(config: BowedStringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sample_rate = config.sample_rate;

        let bridge_filter = match config.bridge_filter {
            Some(filter) => filter,
            None => {
                let pole = (0.75 - 0.2 * 22_050.0 / sample_rate).max(0.0);
                let mut filter = OnePoleFilter::with_pole(pole)?;
                filter.set_gain(0.98);
                filter
            }
        };

        let mut string = Self {
            sample_rate,
            open_string_tuning: config.open_string_tuning,
            waveguide: Waveguide::new(config.max_delay_size, config.interpolation)?,
            gate: WaveguideGate::new(1.0, 0.0)?,
            bow_table: BowTable::new(),
            nut: Termination::new(config.nut_gain)?,
            bridge: Termination::with_filter(BRIDGE_GAIN, bridge_filter)?,
            velocity: SmoothParam::new(sample_rate, SmoothingType::Exponential, VELOCITY_OFFSET)?,
            force: SmoothParam::new(sample_rate, SmoothingType::Exponential, 0.0)?,
            finger_position: SmoothParam::new(sample_rate, SmoothingType::Exponential, 0.0)?,
            frequency: config.open_string_tuning,
            tuning_adjustment: 0.0,
            bow_ratio: DEFAULT_BOW_POSITION,
            bow_position: MIN_BOW_DISTANCE,
            finger_pressure: 0.0,
            note_on: false,
        };
        string.apply_frequency()?;

        log::debug!(
            "bowed string: open {:.1} Hz, waveguide {} samples, max length {:.1}",
            config.open_string_tuning,
            config.max_delay_size,
            config.sample_rate / (2.0 * config.open_string_tuning),
        );
        Ok(string)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Playable range: the open string up to a quarter of Nyquist.
    pub fn frequency_range(&self) -> (f32, f32) {
        (self.open_string_tuning, self.sample_rate / 8.0)
    }

    pub fn set_frequency(&mut self, frequency: f32) -> Result<(), ConfigError> {
        let (min, max) = self.frequency_range();
        if !(min..=max).contains(&frequency) {
            return Err(ConfigError::FrequencyOutOfRange {
                frequency,
                min,
                max,
            });
        }

        self.frequency = frequency;
        self.apply_frequency()
    }

    /// Frequency set by `set_frequency`, before any tuning adjustment.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Length of the waveguide in samples.
    pub fn delay(&self) -> f32 {
        self.waveguide.delay()
    }

    fn apply_frequency(&mut self) -> Result<(), ConfigError> {
        let (min, max) = self.frequency_range();
        // Detuning never pushes the string past its physical range
        let detuned = (self.frequency * 2.0_f32.powf(self.tuning_adjustment / 12.0)).clamp(min, max);
        self.waveguide.set_delay(self.sample_rate / (2.0 * detuned))?;
        self.update_bow_position();
        Ok(())
    }

    fn update_bow_position(&mut self) {
        let length = self.waveguide.delay();
        self.bow_position = ((1.0 - self.bow_ratio) * length)
            .min(length - MIN_BOW_DISTANCE)
            .max(MIN_BOW_DISTANCE);
    }

    /// Bow speed in `[0, 1]`.
    pub fn set_velocity(&mut self, velocity: f32) -> Result<(), ConfigError> {
        let velocity = ConfigError::check_range("velocity", velocity, 0.0, 1.0)?;
        self.velocity
            .set_target(VELOCITY_OFFSET + VELOCITY_SCALE * velocity);
        Ok(())
    }

    pub fn velocity(&self) -> f32 {
        (self.velocity.target() - VELOCITY_OFFSET) / VELOCITY_SCALE
    }

    /// Bow pressure in `[0, 1]`. Zero lifts the bow off the string once the
    /// smoothed force has faded.
    pub fn set_force(&mut self, force: f32) -> Result<(), ConfigError> {
        self.force
            .set_target(ConfigError::check_range("force", force, 0.0, 1.0)?);
        Ok(())
    }

    pub fn force(&self) -> f32 {
        self.force.target()
    }

    /// Contact point in `[0, 1]`: 0 at the bridge, 1 at the nut.
    ///
    /// The resulting point is kept at least two samples from either end.
    pub fn set_bow_position(&mut self, position: f32) -> Result<(), ConfigError> {
        self.bow_ratio = ConfigError::check_range("bow position", position, 0.0, 1.0)?;
        self.update_bow_position();
        Ok(())
    }

    pub fn bow_position(&self) -> f32 {
        self.bow_ratio
    }

    /// Finger location in `[0, 1]` of the string length, from the nut.
    pub fn set_finger_position(&mut self, position: f32) -> Result<(), ConfigError> {
        self.finger_position
            .set_target(ConfigError::check_range("finger position", position, 0.0, 1.0)?);
        Ok(())
    }

    pub fn finger_position(&self) -> f32 {
        self.finger_position.target()
    }

    /// 0 lifts the finger, 1 stops the string completely.
    pub fn set_finger_pressure(&mut self, pressure: f32) -> Result<(), ConfigError> {
        self.finger_pressure = ConfigError::check_range("finger pressure", pressure, 0.0, 1.0)?;
        Ok(())
    }

    pub fn finger_pressure(&self) -> f32 {
        self.finger_pressure
    }

    pub fn set_note_on(&mut self, note_on: bool) {
        self.note_on = note_on;
    }

    pub fn is_note_on(&self) -> bool {
        self.note_on
    }

    pub fn set_parameter(&mut self, param: ParamId, value: f32) -> Result<(), ConfigError> {
        match param {
            ParamId::Velocity => self.set_velocity(value),
            ParamId::Force => self.set_force(value),
            ParamId::BowPosition => self.set_bow_position(value),
            ParamId::FingerPressure => self.set_finger_pressure(value),
            ParamId::NutGain => self.nut.set_gain(value),
            ParamId::BridgeFilterCutoff => {
                let mut filter = match self.bridge.filter() {
                    Some(Filter::OnePole(filter)) => filter.clone(),
                    Some(_) | None => OnePoleFilter::new(),
                };
                filter.set_lowpass(value)?;
                self.bridge.set_filter(Some(filter.into()))
            }
            ParamId::TuningAdjustment => {
                self.tuning_adjustment =
                    ConfigError::check_range("tuning adjustment", value, -1.0, 1.0)?;
                self.apply_frequency()
            }
        }
    }

    /// Displace the whole string with a Hann-shaped bump.
    pub fn pluck(&mut self) {
        let length = self.waveguide.delay();
        let mut position = 1.0;
        while position < length {
            self.waveguide
                .tap_in(position, hann(position - 1.0, length));
            position += 1.0;
        }
    }

    /// Wave that will arrive at the bridge on the next tick.
    #[inline]
    pub fn next_out(&mut self) -> Sample {
        self.waveguide.next_out().0
    }

    /// Advance one sample. `bridge_input` is what reaches the bridge; for a
    /// free string that is `next_out()`, plus any external excitation.
    /// Returns `bridge_input`.
    #[inline]
    pub fn tick(&mut self, bridge_input: Sample) -> Sample {
        let (_, at_nut) = self.waveguide.next_out();

        let velocity = self.velocity.read();
        let force = self.force.read();
        let finger = self.finger_position.read();

        if self.finger_pressure > 0.0 {
            self.gate.set_position(finger * self.waveguide.delay());
            self.gate.set_coeff_clamped(self.finger_pressure);
            self.gate.process(&mut self.waveguide);
        }

        if self.note_on && force > LIFT_FORCE {
            self.bow_table.set_force(force);
            let string_velocity = self.waveguide.tap_out(self.bow_position);
            let delta = velocity - string_velocity;
            self.waveguide
                .tap_in(self.bow_position, delta * self.bow_table.tick(delta));
        }

        let into_right = self.nut.tick(at_nut);
        let into_left = self.bridge.tick(bridge_input);
        self.waveguide.tick(into_right, into_left);

        bridge_input
    }

    /// Free string plus an external excitation at the bridge.
    #[inline]
    pub fn process(&mut self, excitation: Sample) -> Sample {
        let out = self.next_out();
        self.tick(out + excitation)
    }

    pub fn render(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(0.0);
        }
    }

    /// Silence the string. Parameters are kept.
    pub fn reset(&mut self) {
        self.waveguide.reset();
        self.gate.reset();
        self.nut.reset();
        self.bridge.reset();
        self.velocity.snap(self.velocity.target());
        self.force.snap(self.force.target());
        self.finger_position.snap(self.finger_position.target());
    }
}

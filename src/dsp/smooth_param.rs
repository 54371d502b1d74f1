#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::OnePoleFilter;
use crate::{ConfigError, Sample};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingType {
    /// Jump straight to the target.
    None,
    #[default]
    Exponential,
}

/// A control value that glides towards its target instead of jumping.
///
/// Exponential smoothing is a one-pole lowpass whose pole covers 24 dB of
/// the remaining distance in `time_ms`. The approach is monotonic: a step
/// never overshoots.
#[derive(Debug, Clone)]
pub struct SmoothParam {
    smoothing: SmoothingType,
    sample_rate: f32,
    pole: f32,
    target: Sample,
    current: Sample,
}

impl SmoothParam {
    pub const DEFAULT_TIME_MS: f32 = 10.0;
    const DECAY_DB: f32 = -24.0;

    pub fn new(
        sample_rate: f32,
        smoothing: SmoothingType,
        initial: Sample,
    ) -> Result<Self, ConfigError> {
        let mut param = Self {
            smoothing,
            sample_rate: ConfigError::check_sample_rate(sample_rate)?,
            pole: 0.0,
            target: initial,
            current: initial,
        };
        param.set_time_ms(Self::DEFAULT_TIME_MS)?;
        Ok(param)
    }

    /// Time to cover 24 dB of a step.
    pub fn set_time_ms(&mut self, time_ms: f32) -> Result<(), ConfigError> {
        let mut filter = OnePoleFilter::new();
        filter.set_decay(Self::DECAY_DB, time_ms, self.sample_rate)?;
        self.pole = filter.pole();
        Ok(())
    }

    pub fn smoothing(&self) -> SmoothingType {
        self.smoothing
    }

    pub fn set_target(&mut self, value: Sample) {
        self.target = value;
    }

    pub fn target(&self) -> Sample {
        self.target
    }

    /// Value returned by the last `read` without advancing.
    pub fn current(&self) -> Sample {
        self.current
    }

    /// Jump to `value` immediately.
    pub fn snap(&mut self, value: Sample) {
        self.target = value;
        self.current = value;
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn read(&mut self) -> Sample {
        match self.smoothing {
            SmoothingType::None => self.current = self.target,
            SmoothingType::Exponential => {
                let next = self.target + self.pole * (self.current - self.target);
                // Settle exactly once the step is below resolution
                self.current = if next == self.current {
                    self.target
                } else {
                    next
                };
            }
        }
        self.current
    }
}

use crate::dsp::filter::Filter;
use crate::dsp::Processor;
use crate::{ConfigError, Sample};

/// Reflection at the end of a waveguide (nut, bridge).
///
/// The arriving wave passes through the optional loss filter and is scaled
/// by `gain`. A gain of -1 is a rigid, lossless end; anything smaller in
/// magnitude loses energy each round trip. The filter's peak gain times
/// `|gain|` never exceeds one, so no frequency is amplified on reflection.
#[derive(Debug, Clone)]
pub struct Termination {
    gain: f32,
    filter: Option<Filter>,
}

/// Rounding slack for filters normalised to exactly unity peak gain.
const PEAK_TOLERANCE: f32 = 1e-5;

impl Termination {
    pub fn new(gain: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            gain: ConfigError::check_range("termination gain", gain, -1.0, 1.0)?,
            filter: None,
        })
    }

    pub fn with_filter(gain: f32, filter: impl Into<Filter>) -> Result<Self, ConfigError> {
        let mut termination = Self::new(gain)?;
        termination.set_filter(Some(filter.into()))?;
        Ok(termination)
    }

    /// Reject a reflection whose gain at any frequency exceeds one.
    pub(crate) fn check_reflection(gain: f32, filter_peak: f32) -> Result<(), ConfigError> {
        let peak = gain.abs() * filter_peak;
        if peak <= 1.0 + PEAK_TOLERANCE {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                name: "termination peak gain",
                value: peak,
                min: 0.0,
                max: 1.0,
            })
        }
    }

    fn filter_peak(filter: Option<&Filter>) -> f32 {
        filter.map_or(1.0, Filter::peak_gain)
    }

    /// Gain in `[-1, 1]`; outside that range the reflection would add energy.
    pub fn set_gain(&mut self, gain: f32) -> Result<(), ConfigError> {
        let gain = ConfigError::check_range("termination gain", gain, -1.0, 1.0)?;
        Self::check_reflection(gain, Self::filter_peak(self.filter.as_ref()))?;
        self.gain = gain;
        Ok(())
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Replace the loss filter. Rejected, leaving the current one in place,
    /// when the filter would boost any frequency past unity.
    pub fn set_filter(&mut self, filter: Option<Filter>) -> Result<(), ConfigError> {
        Self::check_reflection(self.gain, Self::filter_peak(filter.as_ref()))?;
        self.filter = filter;
        Ok(())
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }
}

impl Processor for Termination {
    #[inline]
    fn tick(&mut self, input: Sample) -> Sample {
        let filtered = match self.filter.as_mut() {
            Some(filter) => filter.tick(input),
            None => input,
        };
        filtered * self.gain
    }

    fn reset(&mut self) {
        if let Some(filter) = self.filter.as_mut() {
            filter.reset();
        }
    }
}

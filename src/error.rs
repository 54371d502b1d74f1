use std::fmt;

/// Invalid construction or configuration parameters.
///
/// Raised when a component is built or reconfigured, never from a per-sample
/// call. Steady-state processing has no error path.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidSampleRate(f32),
    InvalidCapacity { requested: usize, min: usize },
    DelayOutOfRange { delay: f32, max: f32 },
    UnstableCoefficient { name: &'static str, value: f32 },
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    StringIndex { index: usize, count: usize },
    FrequencyOutOfRange { frequency: f32, min: f32, max: f32 },
}

impl ConfigError {
    /// Check `value` against an inclusive range.
    pub(crate) fn check_range(
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    ) -> Result<f32, ConfigError> {
        if value.is_finite() && (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::OutOfRange {
                name,
                value,
                min,
                max,
            })
        }
    }

    pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<f32, ConfigError> {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            Ok(sample_rate)
        } else {
            Err(ConfigError::InvalidSampleRate(sample_rate))
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSampleRate(sr) => write!(f, "invalid sample rate {sr}"),
            ConfigError::InvalidCapacity { requested, min } => {
                write!(f, "buffer capacity {requested} is below the minimum of {min}")
            }
            ConfigError::DelayOutOfRange { delay, max } => {
                write!(f, "delay of {delay} samples is outside 0..={max}")
            }
            ConfigError::UnstableCoefficient { name, value } => {
                write!(f, "coefficient {name} = {value} would make the filter unstable")
            }
            ConfigError::OutOfRange {
                name,
                value,
                min,
                max,
            } => write!(f, "{name} = {value} is outside {min}..={max}"),
            ConfigError::StringIndex { index, count } => {
                write!(f, "string {index} does not exist (ensemble has {count})")
            }
            ConfigError::FrequencyOutOfRange {
                frequency,
                min,
                max,
            } => write!(f, "frequency {frequency} Hz is outside {min}..={max} Hz"),
        }
    }
}

impl std::error::Error for ConfigError {}

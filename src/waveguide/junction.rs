use crate::{ConfigError, Sample};

/// Kelly-Lochbaum scattering junction.
///
/// Sits between integer positions `n` and `n + 1` of a waveguide. With
/// `f` the right-going wave at `n` and `b` the left-going wave at `n + 1`:
///
/// ```text
/// f' = (1 + k) * f - k * b
/// b' = k * f + (1 - k) * b
/// ```
///
/// `k = 0` is transparent; `k = +-1` reflects everything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Junction {
    position: usize,
    reflection: f32,
}

impl Junction {
    pub fn new(position: usize, reflection: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            position,
            reflection: ConfigError::check_range("reflection", reflection, -1.0, 1.0)?,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reflection(&self) -> f32 {
        self.reflection
    }

    pub fn set_reflection(&mut self, reflection: f32) -> Result<(), ConfigError> {
        self.reflection = ConfigError::check_range("reflection", reflection, -1.0, 1.0)?;
        Ok(())
    }

    /// Outgoing `(right, left)` waves for the incoming pair.
    #[inline]
    pub fn scatter(&self, forward: Sample, backward: Sample) -> (Sample, Sample) {
        let k = self.reflection;
        let right = (1.0 + k) * forward - k * backward;
        let left = k * forward + (1.0 - k) * backward;
        (right, left)
    }
}

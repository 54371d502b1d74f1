use crate::dsp::delay::DelayLine;
use crate::dsp::interpolation::InterpolationType;
use crate::waveguide::guide::{Direction, Waveguide};
use crate::{ConfigError, Sample};

/*
Waveguide Gate
==============

A finger pressed onto a string, modelled as a partial reflection between
integer positions n + 1 and the fractional point p = n + frac.

  right line  ... [n] ---> [n+1] ...
                   |         ^
             delay_a (2f)    | (1 - c) transmitted + c * flip * reflected
                   v         |
  left line   ... [n+1] <--- [n+2] ...
                             |
                       delay_b (2(1 - f))

Each reflected wave travels to the finger and back, which is twice the
fractional distance on its side. With c = 0 the gate is absent; with c = 1
the string is fully stopped at p.
*/

const REFLECTION_DELAY_SIZE: usize = 8;

#[derive(Debug, Clone)]
pub struct WaveguideGate {
    position: f32,
    coeff: f32,
    flip: f32,
    delay_a: DelayLine,
    delay_b: DelayLine,
}

impl WaveguideGate {
    pub fn new(position: f32, coeff: f32) -> Result<Self, ConfigError> {
        let mut gate = Self {
            position: 1.0,
            coeff: ConfigError::check_range("gate coefficient", coeff, 0.0, 1.0)?,
            flip: -1.0,
            delay_a: DelayLine::new(REFLECTION_DELAY_SIZE, InterpolationType::Linear)?,
            delay_b: DelayLine::new(REFLECTION_DELAY_SIZE, InterpolationType::Linear)?,
        };
        gate.set_position(position);
        Ok(gate)
    }

    /// Position along the waveguide, measured from the nut.
    ///
    /// Clamped to at least 1 here, and to `length - 2` of the waveguide
    /// when processed, so it can follow a smoothed value every sample.
    #[inline]
    pub fn set_position(&mut self, position: f32) {
        self.position = if position.is_nan() {
            1.0
        } else {
            position.max(1.0)
        };
        let frac = self.position.fract();
        self.delay_a.set_delay_clamped(2.0 * frac);
        self.delay_b.set_delay_clamped(2.0 * (1.0 - frac));
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Reflection amount in `[0, 1]`.
    pub fn set_coeff(&mut self, coeff: f32) -> Result<(), ConfigError> {
        self.coeff = ConfigError::check_range("gate coefficient", coeff, 0.0, 1.0)?;
        Ok(())
    }

    /// Per-sample variant of `set_coeff` that clamps instead of failing.
    #[inline]
    pub fn set_coeff_clamped(&mut self, coeff: f32) {
        self.coeff = if coeff.is_nan() { 0.0 } else { coeff.clamp(0.0, 1.0) };
    }

    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Sign applied to reflected waves. A rigid stop inverts (-1).
    pub fn set_flip(&mut self, flip: f32) {
        self.flip = flip;
    }

    /// Scatter the waves around the gate. Call once per sample, before
    /// `Waveguide::tick`.
    #[inline]
    pub fn process(&mut self, guide: &mut Waveguide) {
        let last = guide.length().saturating_sub(2).max(1);
        let n = (self.position.floor() as usize).clamp(1, last);

        let reflected_a: Sample = self.delay_a.tick(guide.get(Direction::Right, n));
        let reflected_b: Sample = self.delay_b.tick(guide.get(Direction::Left, n + 2));

        let c = self.coeff;
        let left = guide.get(Direction::Left, n + 1);
        guide.set(
            Direction::Left,
            n + 1,
            (1.0 - c) * left + c * self.flip * reflected_a,
        );
        let right = guide.get(Direction::Right, n + 1);
        guide.set(
            Direction::Right,
            n + 1,
            (1.0 - c) * right + c * self.flip * reflected_b,
        );
    }

    pub fn reset(&mut self) {
        self.delay_a.reset();
        self.delay_b.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plucked_guide() -> Waveguide {
        let mut guide = Waveguide::new(64, InterpolationType::Linear).unwrap();
        guide.set_delay(16.0).unwrap();
        for pos in 1..=16 {
            guide.tap_in(pos as f32, (pos as f32 * 0.4).sin());
        }
        guide
    }

    #[test]
    fn open_gate_changes_nothing() {
        let mut guide = plucked_guide();
        let before: Vec<(Sample, Sample)> =
            (1..=16).map(|p| guide.tap_out_split(p as f32)).collect();

        let mut gate = WaveguideGate::new(5.5, 0.0).unwrap();
        gate.process(&mut guide);

        let after: Vec<(Sample, Sample)> =
            (1..=16).map(|p| guide.tap_out_split(p as f32)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn closed_gate_blocks_and_reflects() {
        let mut guide = Waveguide::new(64, InterpolationType::Linear).unwrap();
        guide.set_delay(16.0).unwrap();
        guide.tap_in_split(2.0, 1.0, 0.0);

        let mut gate = WaveguideGate::new(8.0, 1.0).unwrap();
        let mut at_nut_energy = 0.0;
        for n in 0..40 {
            let (at_bridge, at_nut) = guide.next_out();
            assert!(at_bridge.abs() < 1e-9, "leaked to the bridge at {n}");
            at_nut_energy += at_nut * at_nut;
            gate.process(&mut guide);
            guide.tick(0.0, 0.0);
        }
        assert!((at_nut_energy - 1.0).abs() < 1e-6, "{at_nut_energy}");
    }

    #[test]
    fn position_is_clamped_to_the_string() {
        let mut guide = plucked_guide();
        let mut gate = WaveguideGate::new(200.0, 0.5).unwrap();
        for _ in 0..100 {
            gate.process(&mut guide);
            let (at_bridge, at_nut) = guide.next_out();
            guide.tick(-0.99 * at_nut, -0.99 * at_bridge);
        }
        assert!(guide.tap_out(8.0).is_finite());

        gate.set_position(f32::NAN);
        assert_eq!(gate.position(), 1.0);
    }

    #[test]
    fn coefficient_is_validated() {
        assert!(WaveguideGate::new(4.0, 1.5).is_err());
        let mut gate = WaveguideGate::new(4.0, 0.5).unwrap();
        assert!(gate.set_coeff(-0.1).is_err());
        assert_eq!(gate.coeff(), 0.5);
        gate.set_coeff_clamped(3.0);
        assert_eq!(gate.coeff(), 1.0);
    }
}

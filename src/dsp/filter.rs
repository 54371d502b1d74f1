use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::Processor;
use crate::{ConfigError, Sample};

/*
| type     | difference equation (g = gain)                           | stable when            |
| -------- | -------------------------------------------------------- | ---------------------- |
| one-pole | y = b0 g x - a1 y1                                       | abs(a1) < 1            |
| one-zero | y = b0 g x + b1 g x1                                     | always                 |
| two-pole | y = b0 g x - a1 y1 - a2 y2                               | abs(a2) < 1,           |
|          |                                                          | abs(a1) < 1 + a2       |
| two-zero | y = b0 g x + b1 g x1 + b2 g x2                           | always                 |
| biquad   | y = b0 g x + b1 g x1 + b2 g x2 - a1 y1 - a2 y2           | as two-pole            |

Every filter starts as the identity (b0 = 1, all else 0) and reproduces its
input exactly until configured. Coefficient setters leave the state alone, so
they can be called between any two ticks.
*/

fn unstable(name: &'static str, value: f32) -> ConfigError {
    ConfigError::UnstableCoefficient { name, value }
}

/// Stability triangle for a second-order denominator `1 + a1 z^-1 + a2 z^-2`.
fn check_second_order(a1: f32, a2: f32) -> Result<(), ConfigError> {
    if !a2.is_finite() || a2.abs() >= 1.0 {
        return Err(unstable("a2", a2));
    }
    if !a1.is_finite() || a1.abs() >= 1.0 + a2 {
        return Err(unstable("a1", a1));
    }
    Ok(())
}

fn check_finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(unstable(name, value))
    }
}

/// `|H(e^jw)|^2` of `b0 + b1 z^-1 + b2 z^-2` written as a quadratic in
/// `c = cos w`, highest power first.
fn squared_magnitude(b0: f64, b1: f64, b2: f64) -> [f64; 3] {
    [
        4.0 * b0 * b2,
        2.0 * b1 * (b0 + b2),
        b0 * b0 + b1 * b1 + b2 * b2 - 2.0 * b0 * b2,
    ]
}

fn eval_quadratic([q2, q1, q0]: [f64; 3], c: f64) -> f64 {
    (q2 * c + q1) * c + q0
}

/// Largest magnitude response over `[0, nyquist]` of
/// `gain * (b0 + b1 z^-1 + b2 z^-2) / (1 + a1 z^-1 + a2 z^-2)`.
///
/// Both squared magnitudes are quadratics in `cos w`, so the extrema of
/// their ratio are at the band edges or at the roots of
/// `N' D - N D' = 0`, which is again a quadratic. Infinite when the
/// denominator touches zero or a coefficient is not finite.
fn peak_magnitude(gain: f32, [b0, b1, b2]: [f32; 3], [a1, a2]: [f32; 2]) -> f32 {
    let coeffs = [gain, b0, b1, b2, a1, a2];
    if coeffs.iter().any(|c| !c.is_finite()) {
        return f32::INFINITY;
    }

    let num = squared_magnitude(b0 as f64, b1 as f64, b2 as f64);
    let den = squared_magnitude(1.0, a1 as f64, a2 as f64);
    let [n2, n1, n0] = num;
    let [d2, d1, d0] = den;

    let q2 = n2 * d1 - n1 * d2;
    let q1 = 2.0 * (n2 * d0 - n0 * d2);
    let q0 = n1 * d0 - n0 * d1;

    let mut candidates = [-1.0, 1.0, f64::NAN, f64::NAN];
    if q2.abs() > 1e-12 {
        let disc = q1 * q1 - 4.0 * q2 * q0;
        if disc >= 0.0 {
            let root = disc.sqrt();
            candidates[2] = (-q1 + root) / (2.0 * q2);
            candidates[3] = (-q1 - root) / (2.0 * q2);
        }
    } else if q1.abs() > 1e-12 {
        candidates[2] = -q0 / q1;
    }

    let mut peak = 0.0_f64;
    for c in candidates.into_iter().filter(|c| (-1.0..=1.0).contains(c)) {
        let d = eval_quadratic(den, c);
        if d <= 1e-18 {
            return f32::INFINITY;
        }
        peak = peak.max(eval_quadratic(num, c).max(0.0) / d);
    }

    (gain.abs() as f64 * peak.sqrt()) as f32
}

fn check_frequency(frequency: f32, sample_rate: f32) -> Result<f32, ConfigError> {
    let sample_rate = ConfigError::check_sample_rate(sample_rate)?;
    let nyquist = sample_rate * 0.5;
    if frequency.is_finite() && (0.0..=nyquist).contains(&frequency) {
        Ok(frequency)
    } else {
        Err(ConfigError::FrequencyOutOfRange {
            frequency,
            min: 0.0,
            max: nyquist,
        })
    }
}

// ---------------------------------------------------------------------------

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OnePoleFilter {
    gain: f32,
    b0: f32,
    a1: f32,
    #[cfg_attr(feature = "serde", serde(skip))]
    y1: Sample,
}

impl OnePoleFilter {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            b0: 1.0,
            a1: 0.0,
            y1: 0.0,
        }
    }

    /// Unity-DC-gain lowpass (positive pole) or highpass (negative pole).
    pub fn with_pole(pole: f32) -> Result<Self, ConfigError> {
        let mut filter = Self::new();
        filter.set_pole(pole)?;
        Ok(filter)
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Largest gain over all frequencies, gain setting included.
    pub fn peak_gain(&self) -> f32 {
        peak_magnitude(self.gain, [self.b0, 0.0, 0.0], [self.a1, 0.0])
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn pole(&self) -> f32 {
        -self.a1
    }

    /// Place the pole at `pole`, normalising the peak gain to one.
    pub fn set_pole(&mut self, pole: f32) -> Result<(), ConfigError> {
        if !pole.is_finite() || pole.abs() >= 1.0 {
            return Err(unstable("pole", pole));
        }

        self.b0 = 1.0 - pole.abs();
        self.a1 = -pole;
        Ok(())
    }

    pub fn set_coefficients(&mut self, b0: f32, a1: f32) -> Result<(), ConfigError> {
        if !a1.is_finite() || a1.abs() >= 1.0 {
            return Err(unstable("a1", a1));
        }

        self.b0 = check_finite("b0", b0)?;
        self.a1 = a1;
        Ok(())
    }

    /// Lowpass with its -3 dB point at `cutoff`, given as a fraction of the
    /// sample rate in `(0, 0.5]`.
    pub fn set_lowpass(&mut self, cutoff: f32) -> Result<(), ConfigError> {
        if !(cutoff > 0.0 && cutoff <= 0.5) {
            return Err(ConfigError::OutOfRange {
                name: "cutoff",
                value: cutoff,
                min: 0.0,
                max: 0.5,
            });
        }

        let y = 1.0 - (TAU * cutoff).cos();
        let p = -y + (y * y + 2.0 * y).sqrt();
        self.set_pole(1.0 - p)
    }

    /// Pole that decays by `decay_db` (negative) over `time_ms`.
    pub fn set_decay(
        &mut self,
        decay_db: f32,
        time_ms: f32,
        sample_rate: f32,
    ) -> Result<(), ConfigError> {
        let sample_rate = ConfigError::check_sample_rate(sample_rate)?;
        let samples = time_ms * 0.001 * sample_rate;
        if !(samples > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "time_ms",
                value: time_ms,
                min: 0.0,
                max: f32::MAX,
            });
        }

        let ratio = 10.0_f32.powf(decay_db / 20.0);
        self.set_pole((ratio.ln() / samples).exp())
    }
}

impl Default for OnePoleFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for OnePoleFilter {
    #[inline]
    fn tick(&mut self, input: Sample) -> Sample {
        let y = self.b0 * self.gain * input - self.a1 * self.y1;
        self.y1 = y;
        y
    }

    fn reset(&mut self) {
        self.y1 = 0.0;
    }
}

// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OneZeroFilter {
    gain: f32,
    b0: f32,
    b1: f32,
    x1: Sample,
}

impl OneZeroFilter {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            b0: 1.0,
            b1: 0.0,
            x1: 0.0,
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn peak_gain(&self) -> f32 {
        peak_magnitude(self.gain, [self.b0, self.b1, 0.0], [0.0, 0.0])
    }

    /// Place the zero at `zero`, normalising the peak gain to one.
    ///
    /// A positive zero gives a highpass, a negative one a lowpass.
    pub fn set_zero(&mut self, zero: f32) -> Result<(), ConfigError> {
        let zero = check_finite("zero", zero)?;
        self.b0 = if zero > 0.0 {
            1.0 / (1.0 + zero)
        } else {
            1.0 / (1.0 - zero)
        };
        self.b1 = -zero * self.b0;
        Ok(())
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32) -> Result<(), ConfigError> {
        self.b0 = check_finite("b0", b0)?;
        self.b1 = check_finite("b1", b1)?;
        Ok(())
    }
}

impl Default for OneZeroFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for OneZeroFilter {
    #[inline]
    fn tick(&mut self, input: Sample) -> Sample {
        let x = self.gain * input;
        let y = self.b0 * x + self.b1 * self.x1;
        self.x1 = x;
        y
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
    }
}

// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TwoPoleFilter {
    gain: f32,
    b0: f32,
    a1: f32,
    a2: f32,
    y1: Sample,
    y2: Sample,
}

impl TwoPoleFilter {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            b0: 1.0,
            a1: 0.0,
            a2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn peak_gain(&self) -> f32 {
        peak_magnitude(self.gain, [self.b0, 0.0, 0.0], [self.a1, self.a2])
    }

    /// Resonance at `frequency` Hz with pole radius `radius` in `[0, 1)`.
    ///
    /// With `normalize` the peak gain is scaled to one.
    pub fn set_resonance(
        &mut self,
        frequency: f32,
        radius: f32,
        normalize: bool,
        sample_rate: f32,
    ) -> Result<(), ConfigError> {
        let frequency = check_frequency(frequency, sample_rate)?;
        if !(0.0..1.0).contains(&radius) {
            return Err(unstable("radius", radius));
        }

        let w = TAU * frequency / sample_rate;
        self.a2 = radius * radius;
        self.a1 = -2.0 * radius * w.cos();

        if normalize {
            let real = 1.0 - radius + (self.a2 - radius) * (2.0 * w).cos();
            let imag = (self.a2 - radius) * (2.0 * w).sin();
            self.b0 = (real * real + imag * imag).sqrt();
        }
        Ok(())
    }

    pub fn set_coefficients(&mut self, b0: f32, a1: f32, a2: f32) -> Result<(), ConfigError> {
        check_second_order(a1, a2)?;
        self.b0 = check_finite("b0", b0)?;
        self.a1 = a1;
        self.a2 = a2;
        Ok(())
    }
}

impl Default for TwoPoleFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for TwoPoleFilter {
    #[inline]
    fn tick(&mut self, input: Sample) -> Sample {
        let y = self.b0 * self.gain * input - self.a1 * self.y1 - self.a2 * self.y2;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TwoZeroFilter {
    gain: f32,
    b0: f32,
    b1: f32,
    b2: f32,
    x1: Sample,
    x2: Sample,
}

impl TwoZeroFilter {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            x1: 0.0,
            x2: 0.0,
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn peak_gain(&self) -> f32 {
        peak_magnitude(self.gain, [self.b0, self.b1, self.b2], [0.0, 0.0])
    }

    /// Notch at `frequency` Hz; `radius` sets its width (closer to one is
    /// narrower). The result is normalised to unity peak gain.
    pub fn set_notch(
        &mut self,
        frequency: f32,
        radius: f32,
        sample_rate: f32,
    ) -> Result<(), ConfigError> {
        let frequency = check_frequency(frequency, sample_rate)?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(unstable("radius", radius));
        }

        let b2 = radius * radius;
        let b1 = -2.0 * radius * (TAU * frequency / sample_rate).cos();
        let b0 = if b1 > 0.0 {
            1.0 / (1.0 + b1 + b2)
        } else {
            1.0 / (1.0 - b1 + b2)
        };

        self.b0 = b0;
        self.b1 = b1 * b0;
        self.b2 = b2 * b0;
        Ok(())
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32) -> Result<(), ConfigError> {
        self.b0 = check_finite("b0", b0)?;
        self.b1 = check_finite("b1", b1)?;
        self.b2 = check_finite("b2", b2)?;
        Ok(())
    }
}

impl Default for TwoZeroFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for TwoZeroFilter {
    #[inline]
    fn tick(&mut self, input: Sample) -> Sample {
        let x = self.gain * input;
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2;
        self.x2 = self.x1;
        self.x1 = x;
        y
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
    }
}

// ---------------------------------------------------------------------------

/// Direct form I biquad.
#[derive(Debug, Clone, PartialEq)]
pub struct Biquad {
    gain: f32,
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: Sample,
    x2: Sample,
    y1: Sample,
    y2: Sample,
}

impl Biquad {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn peak_gain(&self) -> f32 {
        peak_magnitude(
            self.gain,
            [self.b0, self.b1, self.b2],
            [self.a1, self.a2],
        )
    }

    pub fn set_coefficients(
        &mut self,
        b0: f32,
        b1: f32,
        b2: f32,
        a1: f32,
        a2: f32,
    ) -> Result<(), ConfigError> {
        check_second_order(a1, a2)?;
        self.b0 = check_finite("b0", b0)?;
        self.b1 = check_finite("b1", b1)?;
        self.b2 = check_finite("b2", b2)?;
        self.a1 = a1;
        self.a2 = a2;
        Ok(())
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for Biquad {
    #[inline]
    fn tick(&mut self, input: Sample) -> Sample {
        let x = self.gain * input;
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

// ---------------------------------------------------------------------------

/// Any of the filter sections, dispatched statically.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    OnePole(OnePoleFilter),
    OneZero(OneZeroFilter),
    TwoPole(TwoPoleFilter),
    TwoZero(TwoZeroFilter),
    Biquad(Biquad),
}

impl Filter {
    pub fn set_gain(&mut self, gain: f32) {
        match self {
            Filter::OnePole(f) => f.set_gain(gain),
            Filter::OneZero(f) => f.set_gain(gain),
            Filter::TwoPole(f) => f.set_gain(gain),
            Filter::TwoZero(f) => f.set_gain(gain),
            Filter::Biquad(f) => f.set_gain(gain),
        }
    }

    /// Largest gain over all frequencies, infinite for unstable sections.
    pub fn peak_gain(&self) -> f32 {
        match self {
            Filter::OnePole(f) => f.peak_gain(),
            Filter::OneZero(f) => f.peak_gain(),
            Filter::TwoPole(f) => f.peak_gain(),
            Filter::TwoZero(f) => f.peak_gain(),
            Filter::Biquad(f) => f.peak_gain(),
        }
    }
}

impl Processor for Filter {
    #[inline]
    fn tick(&mut self, input: Sample) -> Sample {
        match self {
            Filter::OnePole(f) => f.tick(input),
            Filter::OneZero(f) => f.tick(input),
            Filter::TwoPole(f) => f.tick(input),
            Filter::TwoZero(f) => f.tick(input),
            Filter::Biquad(f) => f.tick(input),
        }
    }

    fn reset(&mut self) {
        match self {
            Filter::OnePole(f) => f.reset(),
            Filter::OneZero(f) => f.reset(),
            Filter::TwoPole(f) => f.reset(),
            Filter::TwoZero(f) => f.reset(),
            Filter::Biquad(f) => f.reset(),
        }
    }
}

impl From<OnePoleFilter> for Filter {
    fn from(f: OnePoleFilter) -> Self {
        Filter::OnePole(f)
    }
}

impl From<OneZeroFilter> for Filter {
    fn from(f: OneZeroFilter) -> Self {
        Filter::OneZero(f)
    }
}

impl From<TwoPoleFilter> for Filter {
    fn from(f: TwoPoleFilter) -> Self {
        Filter::TwoPole(f)
    }
}

impl From<TwoZeroFilter> for Filter {
    fn from(f: TwoZeroFilter) -> Self {
        Filter::TwoZero(f)
    }
}

impl From<Biquad> for Filter {
    fn from(f: Biquad) -> Self {
        Filter::Biquad(f)
    }
}

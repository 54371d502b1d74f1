use crate::{ConfigError, Sample};

/*
Windowed-Sinc Resampling
========================

Band-limited interpolation: every output sample is the input convolved
with a sinc centred at the output's (fractional) input position. The sinc
is truncated to ZERO_CROSSINGS lobes either side and tapered with a Kaiser
window so the truncation does not ring.

Only the right half of the (symmetric) filter is stored, sampled
SAMPLES_PER_CROSSING times per lobe. Reads between table entries are
linearly interpolated.

  time -->      t (output position, in input samples)
                |
  in:   o   o   o | o   o   o
              <-- left wing  | right wing -->
              walks back     | walks forward

When downsampling (ratio < 1) the filter is stretched by the ratio, which
lowers its cutoff below the new Nyquist, and the output is scaled by the
same amount to keep unity gain.
*/

pub const ZERO_CROSSINGS: usize = 32;
pub const SAMPLES_PER_CROSSING: usize = 512;
pub const KAISER_BETA: f64 = 10.0;

const SINC_SIZE: usize = ZERO_CROSSINGS * SAMPLES_PER_CROSSING;

/// Zeroth-order modified Bessel function of the first kind.
fn bessel_i0(x: f64) -> f64 {
    let half = x * 0.5;
    let mut sum = 1.0;
    let mut term = 1.0;
    for k in 1..64 {
        term *= half / k as f64;
        let contribution = term * term;
        sum += contribution;
        if contribution < sum * 1e-17 {
            break;
        }
    }
    sum
}

/// Offline sample-rate converter backed by a precomputed sinc table.
#[derive(Debug, Clone)]
pub struct SincResampler {
    table: Box<[f32]>,
}

impl SincResampler {
    pub fn new() -> Self {
        let norm = bessel_i0(KAISER_BETA);

        // Two guard entries so interpolated reads at the very end stay in
        // bounds; both are zero
        let mut table = vec![0.0_f32; SINC_SIZE + 2];
        for (i, entry) in table.iter_mut().enumerate().take(SINC_SIZE + 1) {
            let x = i as f64 / SAMPLES_PER_CROSSING as f64;
            let sinc = if i == 0 {
                1.0
            } else {
                (std::f64::consts::PI * x).sin() / (std::f64::consts::PI * x)
            };

            let r = i as f64 / SINC_SIZE as f64;
            let window = bessel_i0(KAISER_BETA * (1.0 - r * r).max(0.0).sqrt()) / norm;
            *entry = (sinc * window) as f32;
        }

        log::debug!(
            "sinc resampler: {} table entries, {ZERO_CROSSINGS} zero crossings",
            table.len()
        );
        Self {
            table: table.into_boxed_slice(),
        }
    }

    /// Number of output samples `resample` produces for `input_len` samples.
    pub fn output_len(input_len: usize, ratio: f32) -> usize {
        if !(ratio > 0.0) || !ratio.is_finite() {
            return 0;
        }
        (input_len as f64 * ratio as f64).ceil() as usize
    }

    #[inline]
    fn weight(&self, index: f32) -> f32 {
        let whole = index as usize;
        let frac = index - whole as f32;
        let a = self.table[whole];
        let b = self.table[whole + 1];
        a + frac * (b - a)
    }

    /// Resample `input` by `ratio` (output rate / input rate) into `output`.
    ///
    /// Stops when either the input is consumed or `output` is full, and
    /// returns the number of samples written.
    pub fn resample(
        &self,
        input: &[Sample],
        ratio: f32,
        output: &mut [Sample],
    ) -> Result<usize, ConfigError> {
        if !(ratio > 0.0) || !ratio.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "ratio",
                value: ratio,
                min: 0.0,
                max: f32::MAX,
            });
        }

        let time_step = 1.0 / ratio as f64;
        let filter_scale = ratio.min(1.0);
        let filter_step = SAMPLES_PER_CROSSING as f32 * filter_scale;
        let input_len = input.len();

        let mut written = 0;
        let mut t = 0.0_f64;
        while t < input_len as f64 && written < output.len() {
            let index = t as usize;
            let frac = (t - index as f64) as f32;

            // Left wing: input[index], input[index - 1], ...
            let offset = filter_step * frac;
            let count = ((SINC_SIZE as f32 - offset) / filter_step) as usize;
            let count = count.min(index);
            let mut left = 0.0;
            for i in 0..=count {
                left += input[index - i] * self.weight(offset + filter_step * i as f32);
            }

            // Right wing: input[index + 1], input[index + 2], ...
            let offset = filter_step * (1.0 - frac);
            let count = ((SINC_SIZE as f32 - offset) / filter_step) as usize;
            let count = count.min(input_len - index - 1);
            let mut right = 0.0;
            for i in 0..count {
                right += input[index + 1 + i] * self.weight(offset + filter_step * i as f32);
            }

            output[written] = (left + right) * filter_scale;
            written += 1;
            t += time_step;
        }

        Ok(written)
    }
}

impl Default for SincResampler {
    fn default() -> Self {
        Self::new()
    }
}

use std::f32::consts::TAU;

/// Convert a (possibly fractional) MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69. Negative notes map to 0 Hz.
#[inline]
pub fn midi_to_freq(note: f32) -> f32 {
    if note < 0.0 {
        return 0.0;
    }
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// Convert a frequency in Hz to a fractional MIDI note number.
///
/// The result can fall outside the 0..=127 MIDI range. Non-positive
/// frequencies map to note 0.
#[inline]
pub fn freq_to_midi(freq: f32) -> f32 {
    if freq <= 0.0 {
        return 0.0;
    }
    69.0 + 12.0 * (freq / 440.0).log2()
}

/// Wrap `x` into `[0, 1)`.
#[inline]
pub fn fast_mod1(x: f32) -> f32 {
    x - x.floor()
}

/// Wrap `x` into `[0, m)`.
#[inline]
pub fn fast_mod(x: f32, m: f32) -> f32 {
    x - m * (x / m).floor()
}

/// Value of a Hann window of length `len` at position `x`.
#[inline]
pub fn hann(x: f32, len: f32) -> f32 {
    0.5 * (1.0 - (TAU * x / len).cos())
}

/// Convert a duration in milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midi_round_trip_at_a4() {
        assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-3);
        assert!((freq_to_midi(440.0) - 69.0).abs() < 1e-4);
    }

    #[test]
    fn midi_octaves_double_frequency() {
        let a3 = midi_to_freq(57.0);
        let a5 = midi_to_freq(81.0);
        assert!((a3 - 220.0).abs() < 1e-2);
        assert!((a5 - 880.0).abs() < 1e-2);
    }

    #[test]
    fn invalid_inputs_map_to_zero() {
        assert_eq!(midi_to_freq(-1.0), 0.0);
        assert_eq!(freq_to_midi(0.0), 0.0);
    }

    #[test]
    fn mod1_wraps_negative_values() {
        assert!((fast_mod1(1.25) - 0.25).abs() < 1e-6);
        assert!((fast_mod1(-0.25) - 0.75).abs() < 1e-6);
        assert!((fast_mod(7.0, 3.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hann_is_zero_at_edges_and_one_in_the_middle() {
        assert!(hann(0.0, 64.0).abs() < 1e-6);
        assert!((hann(32.0, 64.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ms_conversion() {
        assert!((ms_to_samples(10.0, 48_000.0) - 480.0).abs() < 1e-3);
    }
}

//! End-to-end behaviour of the string models: pitch, decay and stability
//! measured on rendered audio.

use rustfft::{num_complex::Complex, FftPlanner};
use sfdsp::dsp::rms::Rms;
use sfdsp::dsp::utils::hann;
use sfdsp::instrument::{BowedString, BowedStringConfig, StringEnsemble};

const SR: f32 = 48_000.0;
const FFT_LEN: usize = 8192;

fn string_at(frequency: f32) -> BowedString {
    let mut string = BowedString::new(BowedStringConfig::default()).unwrap();
    string.set_frequency(frequency).unwrap();
    string
}

fn render(string: &mut BowedString, len: usize) -> Vec<f32> {
    let mut out = vec![0.0; len];
    string.render(&mut out);
    out
}

/// Frequency of the strongest FFT bin above 50 Hz.
fn peak_frequency(samples: &[f32]) -> f32 {
    let mut bins: Vec<Complex<f32>> = samples[..FFT_LEN]
        .iter()
        .enumerate()
        .map(|(i, &x)| Complex::new(x * hann(i as f32, FFT_LEN as f32), 0.0))
        .collect();
    FftPlanner::new()
        .plan_fft_forward(FFT_LEN)
        .process(&mut bins);

    let first = (50.0 * FFT_LEN as f32 / SR) as usize;
    let peak = (first..FFT_LEN / 2)
        .max_by(|&a, &b| bins[a].norm_sqr().total_cmp(&bins[b].norm_sqr()))
        .unwrap();
    peak as f32 * SR / FFT_LEN as f32
}

/// RMS of one block, measured with a fresh meter spanning it.
fn block_rms(block: &[f32]) -> f32 {
    Rms::new(block.len()).unwrap().process(block)
}

fn assert_near(actual: f32, expected: f32, tolerance: f32) {
    let error = (actual - expected).abs() / expected;
    assert!(
        error < tolerance,
        "expected ~{expected} Hz, got {actual} Hz ({:.1}% off)",
        error * 100.0
    );
}

#[test]
fn plucked_string_sounds_at_its_frequency() {
    for frequency in [220.0, 440.0, 659.3] {
        let mut string = string_at(frequency);
        string.pluck();
        let out = render(&mut string, 1024 + FFT_LEN);
        // Loss filter delay flattens the pitch slightly
        assert_near(peak_frequency(&out[1024..]), frequency, 0.05);
    }
}

#[test]
fn unbowed_string_decays() {
    let mut string = string_at(330.0);
    string.pluck();

    let levels: Vec<f32> = (0..10)
        .map(|_| block_rms(&render(&mut string, 2400)))
        .collect();

    for pair in levels.windows(2) {
        assert!(
            pair[1] <= pair[0] * 1.001,
            "level rose from {} to {}",
            pair[0],
            pair[1]
        );
    }
    assert!(levels[9] < levels[0] * 0.1, "{levels:?}");
}

#[test]
fn lifting_the_bow_lets_the_string_ring_out() {
    let mut string = string_at(440.0);
    string.set_velocity(0.7).unwrap();
    string.set_force(0.5).unwrap();
    string.set_note_on(true);
    render(&mut string, 24_000);

    string.set_force(0.0).unwrap();
    // Let the smoothed force reach zero
    render(&mut string, 4_800);

    let before = block_rms(&render(&mut string, 2400));
    render(&mut string, 24_000);
    let after = block_rms(&render(&mut string, 2400));
    assert!(after < before * 0.1, "{before} -> {after}");
}

#[test]
fn bowed_string_sustains_a_bounded_tone() {
    let mut string = string_at(440.0);
    string.set_velocity(0.7).unwrap();
    string.set_force(0.5).unwrap();
    string.set_note_on(true);

    let out = render(&mut string, 96_000);
    assert!(out.iter().all(|x| x.is_finite() && x.abs() < 2.0));

    let tail = block_rms(&out[out.len() - 4800..]);
    assert!(tail > 1e-3, "bowed tone died out: rms {tail}");
}

#[test]
fn stopped_string_sounds_an_octave_up() {
    let mut string = string_at(440.0);
    string.set_finger_position(0.5).unwrap();
    string.set_finger_pressure(1.0).unwrap();
    // Settle the finger before exciting the string
    string.reset();
    string.pluck();

    let out = render(&mut string, 1024 + FFT_LEN);
    assert_near(peak_frequency(&out[1024..]), 880.0, 0.1);
}

#[test]
fn ensemble_output_is_the_sum_of_its_strings() {
    let mut ensemble = StringEnsemble::violin(SR).unwrap();
    for string in 0..ensemble.len() {
        ensemble.pluck(string).unwrap();
    }

    let mut each = [0.0; 4];
    for _ in 0..4800 {
        let sum = ensemble.tick_each(&mut each);
        assert!((sum - each.iter().sum::<f32>()).abs() < 1e-5);
    }
}

#[test]
fn bowed_ensemble_stays_bounded_with_coupling() {
    let mut ensemble = StringEnsemble::violin(SR).unwrap();
    ensemble.set_bridge_coupling(0.1).unwrap();
    for string in 0..ensemble.len() {
        ensemble.set_velocity(string, 0.8).unwrap();
        ensemble.set_force(string, 0.6).unwrap();
    }

    let mut block = vec![0.0; 48_000];
    ensemble.render(&mut block);
    assert!(block.iter().all(|x| x.is_finite() && x.abs() < 8.0));
    assert!(block[24_000..].iter().any(|x| x.abs() > 1e-3));
}

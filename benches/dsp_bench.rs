//! Benchmarks for DSP primitives and string models.
//!
//! Run with: cargo bench
//!
//! These benchmarks measure the per-block cost of the realtime paths to make
//! sure they complete well within audio deadlines.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (delay, filter, oscillators, etc.)
//!   - scenarios/*  Bowed and plucked strings, full ensembles

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_delay,
    dsp::bench_filter,
    dsp::bench_oscillator,
    dsp::bench_phaseshaper,
    dsp::bench_chorus,
    dsp::bench_rms,
    // String models
    scenarios::bench_strings,
    scenarios::bench_ensemble,
);
criterion_main!(benches);

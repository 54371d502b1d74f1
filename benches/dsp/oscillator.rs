//! Benchmarks for basic waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfdsp::dsp::oscillator::{BasicOscillator, Noise, OscillatorType};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let types = [
        ("sine", OscillatorType::Sine),
        ("tri", OscillatorType::Tri),
        ("saw", OscillatorType::Saw),
        ("square", OscillatorType::Square),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, osc_type) in types {
            let mut osc = BasicOscillator::new(SAMPLE_RATE, 440.0, osc_type).unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer));
                })
            });
        }

        // Noise - xorshift PRNG
        let mut noise = Noise::new(7);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| {
                noise.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

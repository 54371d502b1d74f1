//! Benchmarks for the filter sections.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfdsp::dsp::filter::{Biquad, Filter, OnePoleFilter, TwoPoleFilter};
use sfdsp::dsp::Processor;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut one_pole = OnePoleFilter::new();
        one_pole.set_lowpass(0.05).unwrap();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("one_pole", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                one_pole.render(black_box(&mut buffer));
            })
        });

        let mut two_pole = TwoPoleFilter::new();
        two_pole
            .set_resonance(1000.0, 0.99, true, SAMPLE_RATE)
            .unwrap();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("two_pole", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                two_pole.render(black_box(&mut buffer));
            })
        });

        let mut biquad = Biquad::new();
        biquad
            .set_coefficients(1.0, -1.9537, 0.9542, -1.6357, 0.8697)
            .unwrap();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("biquad", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                biquad.render(black_box(&mut buffer));
            })
        });

        // Same section behind the enum, as terminations hold it
        let mut dispatched = Filter::from(Biquad::new());
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("enum_biquad", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                dispatched.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

//! Benchmarks for the modulated delay chorus.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfdsp::dsp::chorus::Chorus;
use sfdsp::dsp::Processor;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_chorus(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/chorus");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();

        let mut chorus = Chorus::new(SAMPLE_RATE, 20.0).unwrap();
        chorus.set_speed(0.8).unwrap();
        chorus.set_mix(0.5).unwrap();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("render", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                chorus.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

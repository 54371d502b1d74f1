//! Benchmarks for the sliding RMS meter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfdsp::dsp::rms::Rms;

use crate::BLOCK_SIZES;

pub fn bench_rms(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/rms");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        // 50ms window at 48kHz
        let mut meter = Rms::new(2400).unwrap();
        group.bench_with_input(BenchmarkId::new("process", size), &size, |b, _| {
            b.iter(|| meter.process(black_box(&input)))
        });
    }

    group.finish();
}

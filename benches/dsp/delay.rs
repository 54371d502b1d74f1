//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfdsp::dsp::delay::DelayLine;
use sfdsp::dsp::interpolation::InterpolationType;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    let kinds = [
        ("none", InterpolationType::None),
        ("linear", InterpolationType::Linear),
        ("allpass", InterpolationType::Allpass),
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        // Fractional delay around a typical string length
        for (name, kind) in kinds {
            let mut delay = DelayLine::new(1024, kind).unwrap();
            delay.set_delay(122.45).unwrap();
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    delay.render(black_box(&mut buffer));
                })
            });
        }

        // Modulated taps (chorus-like reads between ticks)
        let mut delay = DelayLine::new(1024, InterpolationType::Linear).unwrap();
        for &sample in &input {
            delay.tick(sample);
        }
        group.bench_with_input(BenchmarkId::new("tap_out", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    let d = 480.0 + (i as f32 * 0.1).sin() * 48.0;
                    sum += delay.tap_out(black_box(d));
                }
                sum
            })
        });
    }

    group.finish();
}

//! Benchmarks for the phaseshaping oscillators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfdsp::dsp::phaseshaper::{Phaseshaper, Waveform};
use sfdsp::dsp::vector_phaseshaper::VectorPhaseshaper;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_phaseshaper(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/phaseshaper");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for waveform in Waveform::ALL {
            let mut osc = Phaseshaper::new(SAMPLE_RATE).unwrap();
            osc.set_frequency(220.0);
            osc.set_shape(waveform);
            osc.set_mod(0.4);
            group.bench_with_input(
                BenchmarkId::new(format!("{waveform:?}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        osc.render(black_box(&mut buffer));
                    })
                },
            );
        }

        // Halfway between two shapes, both get computed
        let mut morph = Phaseshaper::new(SAMPLE_RATE).unwrap();
        morph.set_waveform(2.5);
        group.bench_with_input(BenchmarkId::new("morph", size), &size, |b, _| {
            b.iter(|| {
                morph.render(black_box(&mut buffer));
            })
        });

        let mut vector = VectorPhaseshaper::new(SAMPLE_RATE).unwrap();
        vector.set_frequency(220.0);
        vector.set_mod(0.3, 2.5).unwrap();
        group.bench_with_input(BenchmarkId::new("vector", size), &size, |b, _| {
            b.iter(|| {
                vector.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

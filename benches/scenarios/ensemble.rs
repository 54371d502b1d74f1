//! Benchmarks for the four-string ensemble.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfdsp::instrument::StringEnsemble;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn bowed_violin(coupling: f32) -> StringEnsemble {
    let mut ensemble = StringEnsemble::violin(SAMPLE_RATE).unwrap();
    ensemble.set_bridge_coupling(coupling).unwrap();
    for string in 0..ensemble.len() {
        ensemble.set_velocity(string, 0.6).unwrap();
        ensemble.set_force(string, 0.5).unwrap();
    }
    ensemble
}

pub fn bench_ensemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/ensemble");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // All four strings bowed, as in a double-stop chord held
        let mut violin = bowed_violin(0.0);
        group.bench_with_input(BenchmarkId::new("violin_bowed", size), &size, |b, _| {
            b.iter(|| {
                violin.render(black_box(&mut buffer));
            })
        });

        let mut coupled = bowed_violin(0.1);
        group.bench_with_input(BenchmarkId::new("violin_coupled", size), &size, |b, _| {
            b.iter(|| {
                coupled.render(black_box(&mut buffer));
            })
        });

        // Per-string outputs, as the violonist meters use them
        let mut metered = bowed_violin(0.0);
        let mut each = [0.0f32; 4];
        group.bench_with_input(BenchmarkId::new("tick_each", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = metered.tick_each(black_box(&mut each));
                }
            })
        });
    }

    group.finish();
}

//! Benchmarks for a single bowed string.
//!
//! One string per interpolation strategy, bowed with the finger down,
//! which is the most expensive path through `BowedString::tick`.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfdsp::dsp::interpolation::InterpolationType;
use sfdsp::instrument::{BowedString, BowedStringConfig};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn bowed(interpolation: InterpolationType) -> BowedString {
    let mut string = BowedString::new(BowedStringConfig {
        sample_rate: SAMPLE_RATE,
        interpolation,
        ..Default::default()
    })
    .unwrap();
    string.set_frequency(440.0).unwrap();
    string.set_velocity(0.7).unwrap();
    string.set_force(0.5).unwrap();
    string.set_finger_position(0.3).unwrap();
    string.set_finger_pressure(0.2).unwrap();
    string.set_note_on(true);
    string
}

pub fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/strings");

    let kinds = [
        ("bowed_none", InterpolationType::None),
        ("bowed_linear", InterpolationType::Linear),
        ("bowed_allpass", InterpolationType::Allpass),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, kind) in kinds {
            let mut string = bowed(kind);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    string.render(black_box(&mut buffer));
                })
            });
        }

        // Free decay: no bow, no finger
        let mut plucked = BowedString::new(BowedStringConfig::default()).unwrap();
        plucked.pluck();
        group.bench_with_input(BenchmarkId::new("plucked", size), &size, |b, _| {
            b.iter(|| {
                plucked.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

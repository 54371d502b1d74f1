//! Benchmarks for low-level DSP primitives.

mod chorus;
mod delay;
mod filter;
mod oscillator;
mod phaseshaper;
mod rms;

pub use chorus::bench_chorus;
pub use delay::bench_delay;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use phaseshaper::bench_phaseshaper;
pub use rms::bench_rms;

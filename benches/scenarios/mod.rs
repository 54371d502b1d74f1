//! String model benchmarks.
//!
//! A single string with each interpolation strategy, then the full
//! four-string ensemble as the violonist binary runs it.

mod ensemble;
mod strings;

pub use ensemble::bench_ensemble;
pub use strings::bench_strings;

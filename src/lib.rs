//! Realtime-safe DSP primitives and digital waveguide string models.
//!
//! Everything here is constructed once with a fixed configuration and then
//! driven sample by sample (or block by block) from a single audio thread.
//! Nothing allocates, locks or blocks after construction.

pub mod dsp; // Buffers, delays, filters, oscillators, analysis
pub mod error;
pub mod instrument; // Bowed strings and ensembles
pub mod waveguide; // Waveguide network building blocks

pub use error::ConfigError;

/// A single audio value flowing between components.
pub type Sample = f32;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

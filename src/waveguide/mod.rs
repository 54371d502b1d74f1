//! Digital waveguide building blocks.
//!
//! A [`Waveguide`] is a pair of delay lines carrying the right-going and
//! left-going halves of a travelling wave. Everything else in this module
//! acts on those lines between ticks: terminations reflect at the ends,
//! junctions and gates scatter in the middle, and the bow table turns the
//! bow/string velocity difference into a friction force.
//!
//! Positions along a waveguide are measured in samples from the nut
//! (position 1) to the bridge (position `delay()`).

pub mod bow_table;
pub mod gate;
pub mod guide;
pub mod junction;
pub mod termination;

pub use bow_table::BowTable;
pub use gate::WaveguideGate;
pub use guide::{Direction, Waveguide};
pub use junction::Junction;
pub use termination::Termination;

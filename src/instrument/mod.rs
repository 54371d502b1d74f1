//! Playable instruments assembled from the waveguide blocks.
//!
//! A [`BowedString`] is one waveguide string with a bow, a finger and two
//! reflecting ends. A [`StringEnsemble`] owns several of them and mixes
//! their bridge outputs; it is the type an audio callback usually holds,
//! fed by [`EnsembleMessage`]s from the control side.

pub mod bowed_string;
pub mod ensemble;
pub mod message;

pub use bowed_string::{BowedString, BowedStringConfig, ParamId};
pub use ensemble::{StringEnsemble, VIOLIN_TUNING};
pub use message::{EnsembleMessage, MessageReceiver};

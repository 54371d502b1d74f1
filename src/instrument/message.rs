#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::instrument::bowed_string::ParamId;

/// Control change for a [`StringEnsemble`](super::StringEnsemble), sent
/// from a non-audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EnsembleMessage {
    SetFrequency { string: usize, frequency: f32 },
    SetVelocity { string: usize, velocity: f32 },
    /// Force above zero also starts the note; zero stops it.
    SetForce { string: usize, force: f32 },
    SetBowPosition { string: usize, position: f32 },
    SetFingerPosition { string: usize, position: f32 },
    Pluck { string: usize },
    SetParameter { string: usize, param: ParamId, value: f32 },
    SetBridgeCoupling(f32),
    /// Lift the bow off every string.
    AllStop,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<EnsembleMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<EnsembleMessage> {
    fn pop(&mut self) -> Option<EnsembleMessage> {
        Consumer::pop(self).ok()
    }
}

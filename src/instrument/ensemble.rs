use crate::dsp::filter::OnePoleFilter;
use crate::dsp::Processor;
use crate::instrument::bowed_string::{BowedString, BowedStringConfig, ParamId};
use crate::instrument::message::{EnsembleMessage, MessageReceiver};
use crate::{ConfigError, Sample};

/// Usual violin tuning: G3, D4, A4, E5.
pub const VIOLIN_TUNING: [f32; 4] = [196.0, 293.7, 440.0, 659.3];

const TRANSMISSION_POLE: f32 = 0.6;

/// A set of independent bowed strings summed at a shared bridge.
///
/// Each string is tuned with one semitone of headroom below its initial
/// frequency. With a non-zero bridge coupling, a lowpassed share of every
/// string's bridge wave is fed back into all of them.
#[derive(Debug, Clone)]
pub struct StringEnsemble {
    strings: Vec<BowedString>,
    transmission: OnePoleFilter,
    coupling: f32,
}

impl StringEnsemble {
    pub fn new(sample_rate: f32, frequencies: &[f32]) -> Result<Self, ConfigError> {
        let sample_rate = ConfigError::check_sample_rate(sample_rate)?;
        let defaults = BowedStringConfig::default();

        let strings = frequencies
            .iter()
            .map(|&frequency| {
                let open_string_tuning = frequency * 2.0_f32.powf(-1.0 / 12.0);
                let open_delay = sample_rate / (2.0 * open_string_tuning);
                let config = BowedStringConfig {
                    sample_rate,
                    // Room for the open string, whatever the rate
                    max_delay_size: defaults.max_delay_size.max(open_delay.ceil() as usize + 4),
                    open_string_tuning,
                    ..defaults.clone()
                };
                let mut string = BowedString::new(config)?;
                string.set_frequency(frequency)?;
                Ok(string)
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        log::debug!("string ensemble: {} strings at {sample_rate} Hz", strings.len());
        Ok(Self {
            strings,
            transmission: OnePoleFilter::with_pole(TRANSMISSION_POLE)?,
            coupling: 0.0,
        })
    }

    /// Four strings in violin tuning.
    pub fn violin(sample_rate: f32) -> Result<Self, ConfigError> {
        Self::new(sample_rate, &VIOLIN_TUNING)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn string(&self, index: usize) -> Option<&BowedString> {
        self.strings.get(index)
    }

    pub fn string_mut(&mut self, index: usize) -> Result<&mut BowedString, ConfigError> {
        let count = self.strings.len();
        self.strings
            .get_mut(index)
            .ok_or(ConfigError::StringIndex { index, count })
    }

    fn checked(&self, index: usize) -> Result<&BowedString, ConfigError> {
        self.strings.get(index).ok_or(ConfigError::StringIndex {
            index,
            count: self.strings.len(),
        })
    }

    pub fn set_frequency(&mut self, index: usize, frequency: f32) -> Result<(), ConfigError> {
        self.string_mut(index)?.set_frequency(frequency)
    }

    pub fn frequency(&self, index: usize) -> Result<f32, ConfigError> {
        Ok(self.checked(index)?.frequency())
    }

    pub fn set_velocity(&mut self, index: usize, velocity: f32) -> Result<(), ConfigError> {
        self.string_mut(index)?.set_velocity(velocity)
    }

    pub fn velocity(&self, index: usize) -> Result<f32, ConfigError> {
        Ok(self.checked(index)?.velocity())
    }

    /// Bow force; anything above zero also starts the note.
    pub fn set_force(&mut self, index: usize, force: f32) -> Result<(), ConfigError> {
        let string = self.string_mut(index)?;
        string.set_force(force)?;
        string.set_note_on(force > 0.0);
        Ok(())
    }

    pub fn force(&self, index: usize) -> Result<f32, ConfigError> {
        Ok(self.checked(index)?.force())
    }

    pub fn pluck(&mut self, index: usize) -> Result<(), ConfigError> {
        self.string_mut(index)?.pluck();
        Ok(())
    }

    /// Share of each string's bridge wave sent through the bridge, `0..=1`.
    pub fn set_bridge_coupling(&mut self, ratio: f32) -> Result<(), ConfigError> {
        self.coupling = ConfigError::check_range("bridge coupling", ratio, 0.0, 1.0)?;
        Ok(())
    }

    pub fn bridge_coupling(&self) -> f32 {
        self.coupling
    }

    pub fn apply(&mut self, message: EnsembleMessage) -> Result<(), ConfigError> {
        match message {
            EnsembleMessage::SetFrequency { string, frequency } => {
                self.set_frequency(string, frequency)
            }
            EnsembleMessage::SetVelocity { string, velocity } => {
                self.set_velocity(string, velocity)
            }
            EnsembleMessage::SetForce { string, force } => self.set_force(string, force),
            EnsembleMessage::SetBowPosition { string, position } => {
                self.string_mut(string)?.set_bow_position(position)
            }
            EnsembleMessage::SetFingerPosition { string, position } => {
                self.string_mut(string)?.set_finger_position(position)
            }
            EnsembleMessage::Pluck { string } => self.pluck(string),
            EnsembleMessage::SetParameter {
                string,
                param,
                value,
            } => {
                let target = self.string_mut(string)?;
                target.set_parameter(param, value)?;
                if param == ParamId::Force {
                    target.set_note_on(value > 0.0);
                }
                Ok(())
            }
            EnsembleMessage::SetBridgeCoupling(ratio) => self.set_bridge_coupling(ratio),
            EnsembleMessage::AllStop => {
                for string in self.strings.iter_mut() {
                    string.set_force(0.0)?;
                    string.set_note_on(false);
                }
                Ok(())
            }
        }
    }

    /// Apply every pending message. Returns how many were rejected.
    pub fn drain(&mut self, rx: &mut impl MessageReceiver) -> usize {
        let mut rejected = 0;
        while let Some(message) = rx.pop() {
            if self.apply(message).is_err() {
                rejected += 1;
            }
        }
        rejected
    }

    /// Advance every string one sample and return their sum.
    #[inline]
    pub fn tick(&mut self) -> Sample {
        let mut output = 0.0;
        let mut transmission = 0.0;
        for string in self.strings.iter_mut() {
            let out = string.next_out();
            output += out;
            transmission += out * self.coupling;
        }

        let transmission = self.transmission.tick(transmission);
        let share = if self.strings.is_empty() {
            0.0
        } else {
            transmission / self.strings.len() as f32
        };

        for string in self.strings.iter_mut() {
            // Cached: same value as above
            let out = string.next_out();
            string.tick(out * (1.0 - self.coupling) + share);
        }
        output
    }

    /// Like `tick`, also writing each string's output into `outputs`
    /// (as many as fit).
    #[inline]
    pub fn tick_each(&mut self, outputs: &mut [Sample]) -> Sample {
        for (slot, string) in outputs.iter_mut().zip(self.strings.iter_mut()) {
            *slot = string.next_out();
        }
        self.tick()
    }

    pub fn render(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick();
        }
    }

    pub fn reset(&mut self) {
        for string in self.strings.iter_mut() {
            string.reset();
        }
        self.transmission.reset();
    }
}

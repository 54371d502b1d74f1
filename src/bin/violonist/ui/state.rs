//! Shared state types between the UI and audio threads
//!
//! Everything crossing the ring buffers is `Copy` so the audio callback
//! never allocates.

/// Strings on the instrument (one per key 1-4)
pub const STRING_COUNT: usize = 4;

/// Per-string RMS levels, sent from the audio thread once per callback
#[derive(Clone, Copy, Debug, Default)]
pub struct StringLevels {
    pub rms: [f32; STRING_COUNT],
}

/// Static setup handed to the UI at startup
#[derive(Clone, Copy, Debug)]
pub struct UiSetup {
    pub sample_rate: f32,
    pub tuning: [f32; STRING_COUNT],
    pub velocity: f32,
    pub force: f32,
    pub coupling: f32,
}

/// What the UI believes each string is doing
#[derive(Clone, Copy, Debug, Default)]
pub struct StringState {
    pub frequency: f32,
    pub bowing: bool,
}

/// Note name of the nearest equal-tempered pitch, e.g. "A4"
pub fn note_name(frequency: f32) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    if !(frequency > 0.0) {
        return String::from("-");
    }
    let note = sfdsp::dsp::utils::freq_to_midi(frequency).round() as i32;
    let name = NAMES[note.rem_euclid(12) as usize];
    format!("{}{}", name, note.div_euclid(12) - 1)
}

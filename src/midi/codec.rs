// MIDI codec abstraction
// The pipeline only sees events; byte-level MIDI handling lives behind this trait

use thiserror::Error;

use crate::events::MusicEvent;

/// Errors that can occur while reading or writing MIDI data
#[derive(Debug, Error)]
pub enum MidiError {
    #[error("Failed to parse MIDI: {0}")]
    Parse(#[from] midly::Error),

    #[error("Failed to write MIDI: {0}")]
    Write(#[from] std::io::Error),

    #[error("Unsupported MIDI timing: {0}")]
    UnsupportedTiming(String),

    #[error("Pitch {pitch} at offset {offset} cannot be written as a MIDI key")]
    PitchOutOfRange { offset: f64, pitch: i32 },

    #[error("Offset {0} cannot be written as a MIDI tick")]
    InvalidOffset(f64),
}

/// Converts between MIDI bytes and note/chord events
///
/// Offsets on both sides are in quarter notes.
pub trait MidiCodec {
    /// Decode a MIDI file into events sorted by offset
    fn parse(&self, bytes: &[u8]) -> Result<Vec<MusicEvent>, MidiError>;

    /// Encode events into MIDI file bytes
    fn write(&self, events: &[MusicEvent]) -> Result<Vec<u8>, MidiError>;
}

// Groove errors
// Failures raised while transposing or quantizing raw note events

use thiserror::Error;

/// Errors that can occur during transposition and quantization
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrooveError {
    /// Quantization is undefined over an empty event list
    #[error("No note events to quantize")]
    EmptyInput,

    /// Offsets must be finite and non-negative
    #[error("Invalid offset: {0}")]
    InvalidOffset(f64),

    /// Strict transposition pushed a pitch outside [0, 127]
    #[error("Pitch {pitch} at offset {offset} is outside the MIDI range after shifting by {shift} semitones")]
    PitchOutOfRange { offset: f64, pitch: i32, shift: i32 },
}

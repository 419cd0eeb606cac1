// Groove Engine - Transposition and offset quantization
// Turns raw note events into quantized (offset, pitch) pairs

pub mod error;
pub mod quantize;
pub mod transpose;

pub use error::GrooveError;
pub use quantize::{offset_ranks, quantize, Offset, QuantizedNote, RhythmMode};
pub use transpose::{transpose, transpose_note, RangePolicy};

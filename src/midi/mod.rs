// MIDI module
// Codec seam between MIDI byte streams and note/chord events

pub mod codec;
pub mod smf;

pub use codec::{MidiCodec, MidiError};
pub use smf::{MidiOptions, SmfCodec};

// Event model
// Note and chord events exchanged between the codec and the sequence pipeline

pub mod types;

pub use types::{is_midi_pitch, EventKind, MusicEvent, NoteEvent, MIDI_PITCH_MAX, MIDI_PITCH_MIN};

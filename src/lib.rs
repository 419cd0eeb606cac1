// midiseq - MIDI to pitch-set sequence encoder/decoder
// Module declarations

pub mod events;
pub mod groove;
pub mod key;
pub mod midi;
pub mod pipeline;
pub mod sequence;

pub use events::{EventKind, MusicEvent, NoteEvent};
pub use groove::{Offset, RangePolicy, RhythmMode};
pub use pipeline::{BatchRunner, PipelineError, PreprocessSettings, Preprocessor};
pub use sequence::{Sequence, SequenceStep};

// Sequence module
// Aggregation, text serialization and reconstruction of pitch-set sequences

pub mod aggregate;
pub mod format;
pub mod reconstruct;
pub mod types;
pub mod windows;

pub use aggregate::{aggregate, aggregate_events};
pub use format::{parse_seq_str, read_steps, to_seq_string, write_sequence, write_steps, FormatError};
pub use reconstruct::reconstruct;
pub use types::{Sequence, SequenceError, SequenceStep};
pub use windows::{windows, write_batch_file};

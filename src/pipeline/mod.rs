// Pipeline module
// Encode/decode orchestration, batch conversion and run tracing

pub mod batch;
pub mod preprocess;
pub mod trace;

pub use batch::{BatchFailure, BatchReport, BatchRunner};
pub use preprocess::{PipelineError, PreprocessSettings, Preprocessor};
pub use trace::{read_trace_file, FileStatus, TraceEntry, TraceError, TraceWriter};

// Batch conversion
// Converts a directory of MIDI files into .seq files, tallying per-file failures

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::preprocess::{PipelineError, Preprocessor};
use super::trace::{calculate_sha256, TraceEntry, TraceWriter};
use crate::key::KeyAnalyzer;
use crate::midi::MidiCodec;
use crate::sequence::write_sequence;

/// Extension of written sequence files
pub const SEQ_EXTENSION: &str = "seq";

/// A file that could not be converted
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub converted: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Runs the preprocessor over every file of a directory
///
/// A failing file is logged, recorded and skipped; only errors that stop the
/// whole run (unreadable input directory, trace write failures) are returned.
pub struct BatchRunner<C, K> {
    preprocessor: Preprocessor<C, K>,
    trace: Option<TraceWriter>,
}

impl<C: MidiCodec, K: KeyAnalyzer> BatchRunner<C, K> {
    pub fn new(preprocessor: Preprocessor<C, K>) -> Self {
        BatchRunner {
            preprocessor,
            trace: None,
        }
    }

    /// Record one JSONL trace entry per file
    pub fn with_trace(mut self, trace: TraceWriter) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchReport, PipelineError> {
        fs::create_dir_all(output_dir)?;

        let mut inputs: Vec<PathBuf> = fs::read_dir(input_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        inputs.sort();

        let mut report = BatchReport {
            total: inputs.len(),
            ..Default::default()
        };

        log::info!(
            "Converting {} MIDI files from {} to {}",
            report.total,
            input_dir.display(),
            output_dir.display()
        );

        for (index, path) in inputs.iter().enumerate() {
            log::info!(
                "Preprocessing file {} of {}: {}",
                index + 1,
                report.total,
                path.display()
            );

            let mut sha256 = None;
            let outcome = fs::read(path).map_err(PipelineError::from).and_then(|bytes| {
                sha256 = Some(calculate_sha256(&bytes));
                self.convert(&bytes, &output_path(path, output_dir))
            });

            let entry = match outcome {
                Ok(steps) => {
                    report.converted += 1;
                    TraceEntry::converted(path, steps, sha256.unwrap_or_default())
                }
                Err(e) => {
                    log::warn!("Error reading {}: {}", path.display(), e);
                    report.failures.push(BatchFailure {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                    TraceEntry::failed(path, sha256, e.to_string())
                }
            };

            if let Some(trace) = &self.trace {
                trace.write(&entry)?;
            }
        }

        log::info!(
            "Preprocessed {} files with {} errors",
            report.total,
            report.failed()
        );

        Ok(report)
    }

    /// Encode one file's bytes and write the sequence; returns the step count
    fn convert(&self, bytes: &[u8], output: &Path) -> Result<usize, PipelineError> {
        let sequence = self.preprocessor.encode_midi(bytes)?;

        let mut writer = BufWriter::new(File::create(output)?);
        write_sequence(&mut writer, &sequence)?;
        writer.flush()?;

        Ok(sequence.len())
    }
}

/// `<output_dir>/<input stem>.seq`
fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    output_dir.join(format!("{}.{}", stem, SEQ_EXTENSION))
}

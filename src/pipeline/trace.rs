// Batch run tracing
// Append-only JSONL record of every file a batch run touched

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during trace operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Outcome of converting one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    Failed,
}

/// A single trace entry, one per input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// ISO 8601 timestamp of when this entry was created
    pub timestamp: String,

    /// Input file path
    pub file: String,

    pub status: FileStatus,

    /// Number of sequence steps written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,

    /// SHA256 of the input bytes, when they could be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TraceEntry {
    /// Entry for a successfully converted file
    pub fn converted(file: &Path, steps: usize, sha256: String) -> Self {
        TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            file: file.display().to_string(),
            status: FileStatus::Converted,
            steps: Some(steps),
            sha256: Some(sha256),
            error: None,
        }
    }

    /// Entry for a file that failed to convert
    pub fn failed(file: &Path, sha256: Option<String>, error: impl Into<String>) -> Self {
        TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            file: file.display().to_string(),
            status: FileStatus::Failed,
            steps: None,
            sha256,
            error: Some(error.into()),
        }
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// Trace writer
/// Manages append-only JSONL trace file
pub struct TraceWriter {
    file_path: PathBuf,
}

impl TraceWriter {
    pub fn new(file_path: PathBuf) -> Self {
        TraceWriter { file_path }
    }

    /// Append a trace entry to the file
    /// Creates file if it doesn't exist
    pub fn write(&self, entry: &TraceEntry) -> Result<(), TraceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        let json_line = entry.to_json_line()?;
        file.write_all(json_line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Read trace entries from a JSONL file
pub fn read_trace_file(path: &Path) -> Result<Vec<TraceEntry>, TraceError> {
    let contents = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: TraceEntry = serde_json::from_str(line)?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Calculate SHA256 hash of data
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_calculate_sha256() {
        let hash = calculate_sha256(b"hello world");
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_failed_entry_omits_steps() {
        let entry = TraceEntry::failed(Path::new("midi/bad.mid"), None, "boom");
        let json_line = entry.to_json_line().unwrap();

        assert!(json_line.ends_with('\n'));
        assert!(!json_line.contains("\"steps\""));
        assert!(json_line.contains("\"status\":\"failed\""));
    }

    #[test]
    fn test_trace_writer_appends() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");
        let writer = TraceWriter::new(trace_path.clone());

        writer
            .write(&TraceEntry::converted(Path::new("a.mid"), 12, "abc".to_string()))
            .unwrap();
        writer
            .write(&TraceEntry::failed(Path::new("b.mid"), None, "bad header"))
            .unwrap();

        let entries = read_trace_file(writer.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, FileStatus::Converted);
        assert_eq!(entries[0].steps, Some(12));
        assert_eq!(entries[1].status, FileStatus::Failed);
        assert_eq!(entries[1].error.as_deref(), Some("bad header"));
    }
}

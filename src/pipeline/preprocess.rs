// Preprocessing pipeline
// MIDI -> events -> (transpose) -> quantize -> aggregate, and back again

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::trace::TraceError;
use crate::events::MusicEvent;
use crate::groove::{quantize, transpose, GrooveError, RangePolicy, RhythmMode};
use crate::key::{Key, KeyAnalyzer, PitchClass, ProfileKeyAnalyzer};
use crate::midi::{MidiCodec, MidiError, MidiOptions, SmfCodec};
use crate::sequence::{
    aggregate, parse_seq_str, reconstruct, FormatError, Sequence, SequenceError, SequenceStep,
};

/// Errors that can occur anywhere in the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Groove error: {0}")]
    Groove(#[from] GrooveError),

    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("MIDI error: {0}")]
    Midi(#[from] MidiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("Could not detect the key of the input")]
    KeyUndetected,
}

/// Settings for the encode/decode pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessSettings {
    /// Keep real-valued offsets instead of collapsing them to unit steps
    pub keep_rhythm: bool,

    /// Transpose every input so its detected tonic lands on this pitch class
    pub transpose_to: Option<PitchClass>,

    /// How transposed pitches outside [0, 127] are handled
    pub range_policy: RangePolicy,

    /// MIDI read/write options
    pub midi: MidiOptions,
}

impl PreprocessSettings {
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PipelineError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn rhythm_mode(&self) -> RhythmMode {
        RhythmMode::from_keep_rhythm(self.keep_rhythm)
    }
}

/// Runs the encode and decode paths with pluggable codec and key analyzer
pub struct Preprocessor<C = SmfCodec, K = ProfileKeyAnalyzer> {
    settings: PreprocessSettings,
    codec: C,
    analyzer: K,
}

impl Preprocessor {
    /// Preprocessor backed by the SMF codec and the profile key analyzer
    pub fn new(settings: PreprocessSettings) -> Self {
        let codec = SmfCodec::new(settings.midi.clone());
        Preprocessor {
            settings,
            codec,
            analyzer: ProfileKeyAnalyzer::new(),
        }
    }
}

impl<C: MidiCodec, K: KeyAnalyzer> Preprocessor<C, K> {
    pub fn with_collaborators(settings: PreprocessSettings, codec: C, analyzer: K) -> Self {
        Preprocessor {
            settings,
            codec,
            analyzer,
        }
    }

    pub fn settings(&self) -> &PreprocessSettings {
        &self.settings
    }

    /// Encode note/chord events into a sequence
    pub fn encode_events(&self, events: &[MusicEvent]) -> Result<Sequence, PipelineError> {
        let notes = MusicEvent::flatten(events);
        if notes.is_empty() {
            return Err(GrooveError::EmptyInput.into());
        }

        let notes = match self.settings.transpose_to {
            Some(target) => {
                let detection = self
                    .analyzer
                    .detect_key(&notes)
                    .ok_or(PipelineError::KeyUndetected)?;
                let shift = self.analyzer.interval(detection.key, Key::major(target));

                log::debug!(
                    "Detected {} (confidence {:.2}), shifting by {} semitones",
                    detection.key,
                    detection.confidence,
                    shift
                );

                transpose(&notes, shift, self.settings.range_policy)?
            }
            None => notes,
        };

        let quantized = quantize(&notes, self.settings.rhythm_mode())?;
        let sequence = aggregate(&quantized)?;

        Ok(sequence)
    }

    /// Encode MIDI file bytes into a sequence
    pub fn encode_midi(&self, bytes: &[u8]) -> Result<Sequence, PipelineError> {
        let events = self.codec.parse(bytes)?;
        self.encode_events(&events)
    }

    /// Render sequence steps as MIDI file bytes
    pub fn decode_steps(&self, steps: &[SequenceStep]) -> Result<Vec<u8>, PipelineError> {
        let events = reconstruct(steps)?;
        Ok(self.codec.write(&events)?)
    }

    /// Render sequence text as MIDI file bytes
    ///
    /// Only integer offsets parse, so text written with `keep_rhythm` and
    /// fractional offsets fails with `FormatError::InvalidOffset`.
    pub fn decode_seq_str(&self, text: &str) -> Result<Vec<u8>, PipelineError> {
        let steps = parse_seq_str(text)?;
        self.decode_steps(&steps)
    }
}

// Offset Quantization - Maps continuous note offsets onto sequence positions
// Either keeps real-valued timing or collapses it to a dense step index

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::GrooveError;
use crate::events::NoteEvent;

/// How offsets are carried into the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhythmMode {
    /// Keep the original real-valued offsets
    Preserve,

    /// Replace offsets with their dense rank (unit spacing between onsets)
    #[default]
    Discard,
}

impl RhythmMode {
    pub fn from_keep_rhythm(keep_rhythm: bool) -> Self {
        if keep_rhythm {
            RhythmMode::Preserve
        } else {
            RhythmMode::Discard
        }
    }
}

/// A position in a sequence
///
/// Steps and times never mix within one sequence, but ordering is total
/// across both so either can key an ordered map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offset {
    /// Dense rank from rhythm-discarding quantization
    Step(u64),

    /// Real-valued time from rhythm-preserving quantization
    Time(f64),
}

impl Offset {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Offset::Step(step) => step as f64,
            Offset::Time(time) => time,
        }
    }
}

impl PartialEq for Offset {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Offset {}

impl PartialOrd for Offset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Offset {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Offset::Step(a), Offset::Step(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Step(step) => write!(f, "{}", step),
            Offset::Time(time) => write!(f, "{}", time),
        }
    }
}

/// A note whose offset has been quantized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizedNote {
    pub offset: Offset,
    pub pitch: i32,
}

/// Quantize note offsets
///
/// Output keeps the input order. In `Discard` mode the mapping only covers the
/// offsets actually present; nothing is extrapolated.
pub fn quantize(notes: &[NoteEvent], mode: RhythmMode) -> Result<Vec<QuantizedNote>, GrooveError> {
    if notes.is_empty() {
        return Err(GrooveError::EmptyInput);
    }

    match mode {
        RhythmMode::Preserve => notes
            .iter()
            .map(|note| -> Result<QuantizedNote, GrooveError> {
                let time = normalize_offset(note.offset)?;
                Ok(QuantizedNote {
                    offset: Offset::Time(time),
                    pitch: note.pitch,
                })
            })
            .collect(),
        RhythmMode::Discard => {
            let offsets: Vec<f64> = notes.iter().map(|note| note.offset).collect();
            let ranks = offset_ranks(&offsets)?;

            Ok(notes
                .iter()
                .zip(ranks)
                .map(|(note, rank)| QuantizedNote {
                    offset: Offset::Step(rank),
                    pitch: note.pitch,
                })
                .collect())
        }
    }
}

/// Dense rank of each offset among the distinct offsets, sorted ascending
///
/// Equal offsets share a rank; ranks run 0..k-1 for k distinct values.
pub fn offset_ranks(offsets: &[f64]) -> Result<Vec<u64>, GrooveError> {
    if offsets.is_empty() {
        return Err(GrooveError::EmptyInput);
    }

    let normalized = offsets
        .iter()
        .map(|&offset| normalize_offset(offset))
        .collect::<Result<Vec<_>, _>>()?;

    let mut distinct = normalized.clone();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();

    Ok(normalized
        .iter()
        .map(|offset| {
            // Every offset is in `distinct`, so the search always hits
            let index = distinct
                .binary_search_by(|probe| probe.total_cmp(offset))
                .unwrap_or_else(|i| i);
            index as u64
        })
        .collect())
}

/// Reject negative or non-finite offsets and fold -0.0 into 0.0
fn normalize_offset(offset: f64) -> Result<f64, GrooveError> {
    if !offset.is_finite() || offset < 0.0 {
        return Err(GrooveError::InvalidOffset(offset));
    }
    Ok(offset + 0.0)
}

// Event Reconstruction
// Expands sequence steps back into playable note and chord events

use super::types::{Sequence, SequenceError, SequenceStep};
use crate::events::{EventKind, MusicEvent};

/// Turn steps into note/chord events
///
/// A single distinct pitch becomes a note, two or more a chord. Offsets are
/// copied as-is; no rescaling happens here.
pub fn reconstruct(steps: &[SequenceStep]) -> Result<Vec<MusicEvent>, SequenceError> {
    steps
        .iter()
        .map(|step| -> Result<MusicEvent, SequenceError> {
            let kind = EventKind::from_pitches(step.pitches.iter().copied())
                .ok_or(SequenceError::EmptyStep(step.offset))?;

            Ok(MusicEvent {
                offset: step.offset.as_f64(),
                kind,
            })
        })
        .collect()
}

impl Sequence {
    /// Reconstruct events in ascending offset order
    pub fn to_events(&self) -> Vec<MusicEvent> {
        self.iter()
            .filter_map(|(offset, pitches)| {
                EventKind::from_pitches(pitches.iter().copied()).map(|kind| MusicEvent {
                    offset: offset.as_f64(),
                    kind,
                })
            })
            .collect()
    }
}

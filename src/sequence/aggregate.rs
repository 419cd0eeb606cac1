// Event Aggregation
// Groups notes sharing a quantized offset into one pitch set

use super::types::{Sequence, SequenceError};
use crate::events::{EventKind, MusicEvent};
use crate::groove::{Offset, QuantizedNote};

/// Build a sequence from quantized notes
///
/// Pitches at the same offset merge into one set; duplicates collapse.
pub fn aggregate(notes: &[QuantizedNote]) -> Result<Sequence, SequenceError> {
    if notes.is_empty() {
        return Err(SequenceError::EmptyInput);
    }

    let mut sequence = Sequence::new();
    for note in notes {
        sequence.insert(note.offset, note.pitch);
    }

    log::debug!(
        "Aggregated {} notes into {} steps",
        notes.len(),
        sequence.len()
    );

    Ok(sequence)
}

/// Build a sequence directly from tagged note/chord events
///
/// `offset_of` maps each event to its sequence offset; a chord contributes all
/// of its members at that offset.
pub fn aggregate_events<F>(events: &[MusicEvent], mut offset_of: F) -> Result<Sequence, SequenceError>
where
    F: FnMut(&MusicEvent) -> Offset,
{
    if events.is_empty() {
        return Err(SequenceError::EmptyInput);
    }

    let mut sequence = Sequence::new();
    for event in events {
        let offset = offset_of(event);
        match &event.kind {
            EventKind::Note(pitch) => sequence.insert(offset, *pitch),
            EventKind::Chord(pitches) => {
                for &pitch in pitches {
                    sequence.insert(offset, pitch);
                }
            }
        }
    }

    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantized(offset: u64, pitch: i32) -> QuantizedNote {
        QuantizedNote {
            offset: Offset::Step(offset),
            pitch,
        }
    }

    #[test]
    fn test_aggregate_groups_by_offset() {
        let notes = vec![
            quantized(0, 60),
            quantized(0, 64),
            quantized(1, 62),
            quantized(0, 67),
        ];

        let sequence = aggregate(&notes).unwrap();
        let steps = sequence.steps();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].pitches, vec![60, 64, 67]);
        assert_eq!(steps[1].pitches, vec![62]);
    }

    #[test]
    fn test_aggregate_dedups_pitches() {
        let sequence = aggregate(&[quantized(0, 60), quantized(0, 60)]).unwrap();
        assert_eq!(sequence.get(Offset::Step(0)).unwrap().len(), 1);
    }

    #[test]
    fn test_aggregate_sorts_out_of_order_offsets() {
        let sequence = aggregate(&[quantized(5, 60), quantized(2, 61)]).unwrap();
        let offsets: Vec<Offset> = sequence.iter().map(|(o, _)| o).collect();
        assert_eq!(offsets, vec![Offset::Step(2), Offset::Step(5)]);
    }

    #[test]
    fn test_aggregate_empty_fails() {
        assert_eq!(aggregate(&[]), Err(SequenceError::EmptyInput));
    }

    #[test]
    fn test_aggregate_events_expands_chords() {
        let events = vec![
            MusicEvent::chord(0.0, [60, 64]).unwrap(),
            MusicEvent::note(0.0, 67),
            MusicEvent::note(1.5, 62),
        ];

        let sequence = aggregate_events(&events, |e| Offset::Time(e.offset)).unwrap();

        assert_eq!(sequence.len(), 2);
        assert_eq!(
            sequence.get(Offset::Time(0.0)).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![60, 64, 67]
        );
    }
}

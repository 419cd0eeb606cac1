// Pitch Transposition
// Shifts note pitches by a semitone interval under an explicit range policy

use serde::{Deserialize, Serialize};

use super::error::GrooveError;
use crate::events::{is_midi_pitch, NoteEvent, MIDI_PITCH_MAX, MIDI_PITCH_MIN};

/// What to do with a shifted pitch that leaves the MIDI range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Fail with `GrooveError::PitchOutOfRange`
    #[default]
    Strict,

    /// Keep the out-of-range value as is
    PassThrough,

    /// Saturate to [0, 127]
    Clamp,
}

/// Shift a single note by `shift` semitones
pub fn transpose_note(
    note: &NoteEvent,
    shift: i32,
    policy: RangePolicy,
) -> Result<NoteEvent, GrooveError> {
    let shifted = note.pitch.saturating_add(shift);

    let pitch = if is_midi_pitch(shifted) {
        shifted
    } else {
        match policy {
            RangePolicy::Strict => {
                return Err(GrooveError::PitchOutOfRange {
                    offset: note.offset,
                    pitch: shifted,
                    shift,
                });
            }
            RangePolicy::PassThrough => shifted,
            RangePolicy::Clamp => shifted.clamp(MIDI_PITCH_MIN, MIDI_PITCH_MAX),
        }
    };

    Ok(NoteEvent::new(note.offset, pitch))
}

/// Shift every note by `shift` semitones, leaving offsets untouched
///
/// Under `RangePolicy::Strict` the first out-of-range result aborts the whole
/// transposition.
pub fn transpose(
    notes: &[NoteEvent],
    shift: i32,
    policy: RangePolicy,
) -> Result<Vec<NoteEvent>, GrooveError> {
    notes
        .iter()
        .map(|note| transpose_note(note, shift, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(pitches: &[i32]) -> Vec<NoteEvent> {
        pitches
            .iter()
            .enumerate()
            .map(|(i, &p)| NoteEvent::new(i as f64 * 0.5, p))
            .collect()
    }

    #[test]
    fn test_transpose_shifts_pitch_only() {
        let input = notes(&[60, 64, 67]);
        let shifted = transpose(&input, -7, RangePolicy::Strict).unwrap();

        assert_eq!(
            shifted.iter().map(|n| n.pitch).collect::<Vec<_>>(),
            vec![53, 57, 60]
        );
        for (a, b) in input.iter().zip(&shifted) {
            assert_eq!(a.offset, b.offset);
        }
    }

    #[test]
    fn test_transpose_is_invertible() {
        let input = notes(&[0, 21, 60, 100, 120]);

        for shift in [-12, -5, 0, 3, 7] {
            let there = transpose(&input, shift, RangePolicy::PassThrough).unwrap();
            let back = transpose(&there, -shift, RangePolicy::PassThrough).unwrap();
            assert_eq!(back, input);
        }
    }

    #[test]
    fn test_strict_rejects_out_of_range() {
        let input = notes(&[60, 125]);
        let result = transpose(&input, 5, RangePolicy::Strict);

        assert_eq!(
            result,
            Err(GrooveError::PitchOutOfRange {
                offset: 0.5,
                pitch: 130,
                shift: 5,
            })
        );
    }

    #[test]
    fn test_strict_checks_range_without_shift() {
        let input = vec![NoteEvent::new(0.0, 200)];

        assert_eq!(
            transpose(&input, 0, RangePolicy::Strict),
            Err(GrooveError::PitchOutOfRange {
                offset: 0.0,
                pitch: 200,
                shift: 0,
            })
        );
        assert_eq!(transpose(&input, 0, RangePolicy::PassThrough).unwrap(), input);
        assert_eq!(transpose(&input, 0, RangePolicy::Clamp).unwrap()[0].pitch, 127);
    }

    #[test]
    fn test_pass_through_keeps_out_of_range() {
        let input = notes(&[2]);
        let shifted = transpose(&input, -5, RangePolicy::PassThrough).unwrap();
        assert_eq!(shifted[0].pitch, -3);
    }

    #[test]
    fn test_clamp_saturates() {
        let input = notes(&[2, 126]);

        let down = transpose(&input, -5, RangePolicy::Clamp).unwrap();
        assert_eq!(down[0].pitch, 0);

        let up = transpose(&input, 5, RangePolicy::Clamp).unwrap();
        assert_eq!(up[1].pitch, 127);
    }

    #[test]
    fn test_default_policy_is_strict() {
        assert_eq!(RangePolicy::default(), RangePolicy::Strict);
    }
}

// Note event types
// Raw notes and tagged note/chord events exchanged with the MIDI codec

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Lowest valid MIDI pitch number
pub const MIDI_PITCH_MIN: i32 = 0;

/// Highest valid MIDI pitch number
pub const MIDI_PITCH_MAX: i32 = 127;

/// Check whether a pitch lies in the MIDI range [0, 127]
pub fn is_midi_pitch(pitch: i32) -> bool {
    (MIDI_PITCH_MIN..=MIDI_PITCH_MAX).contains(&pitch)
}

/// A single sounding pitch at a time position
///
/// Offsets are in the source's native time unit (quarter notes for MIDI input).
/// Pitch is a MIDI note number; the wider integer type lets pass-through
/// transposition carry values outside [0, 127].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Time position, >= 0
    pub offset: f64,

    /// MIDI note number
    pub pitch: i32,
}

impl NoteEvent {
    pub fn new(offset: f64, pitch: i32) -> Self {
        NoteEvent { offset, pitch }
    }
}

/// What sounds at an event's offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// One pitch
    Note(i32),

    /// Two or more pitches struck together
    Chord(BTreeSet<i32>),
}

impl EventKind {
    /// Build the variant matching the number of distinct pitches
    ///
    /// Returns `None` for an empty pitch list.
    pub fn from_pitches<I: IntoIterator<Item = i32>>(pitches: I) -> Option<Self> {
        let set: BTreeSet<i32> = pitches.into_iter().collect();
        match set.len() {
            0 => None,
            1 => set.into_iter().next().map(EventKind::Note),
            _ => Some(EventKind::Chord(set)),
        }
    }

    /// Pitches of this event in ascending order
    pub fn pitches(&self) -> Vec<i32> {
        match self {
            EventKind::Note(pitch) => vec![*pitch],
            EventKind::Chord(pitches) => pitches.iter().copied().collect(),
        }
    }
}

/// A note or chord event at an offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicEvent {
    pub offset: f64,
    pub kind: EventKind,
}

impl MusicEvent {
    /// Create a single-note event
    pub fn note(offset: f64, pitch: i32) -> Self {
        MusicEvent {
            offset,
            kind: EventKind::Note(pitch),
        }
    }

    /// Create a chord event from its member pitches
    ///
    /// Returns `None` unless there are at least two distinct pitches.
    pub fn chord<I: IntoIterator<Item = i32>>(offset: f64, pitches: I) -> Option<Self> {
        match EventKind::from_pitches(pitches)? {
            kind @ EventKind::Chord(_) => Some(MusicEvent { offset, kind }),
            EventKind::Note(_) => None,
        }
    }

    /// Expand events into raw notes, one per chord member
    pub fn flatten(events: &[MusicEvent]) -> Vec<NoteEvent> {
        let mut notes = Vec::with_capacity(events.len());

        for event in events {
            match &event.kind {
                EventKind::Note(pitch) => notes.push(NoteEvent::new(event.offset, *pitch)),
                EventKind::Chord(pitches) => {
                    notes.extend(pitches.iter().map(|&p| NoteEvent::new(event.offset, p)));
                }
            }
        }

        notes
    }
}

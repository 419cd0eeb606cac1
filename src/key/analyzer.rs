// Key detection
// Krumhansl-Kessler profile correlation over a pitch-class histogram

use super::types::{Key, KeyDetection, KeyMode, PitchClass};
use crate::events::{is_midi_pitch, NoteEvent};

/// Krumhansl-Kessler major key profile, indexed from the tonic
const MAJOR_PROFILE: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl-Kessler minor key profile, indexed from the tonic
const MINOR_PROFILE: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Detects the key of a note collection and the shift between keys
pub trait KeyAnalyzer {
    /// Best-matching key, or `None` when the notes carry no tonal information
    fn detect_key(&self, notes: &[NoteEvent]) -> Option<KeyDetection>;

    /// Semitone shift that moves `from`'s tonic onto `to`'s tonic
    ///
    /// Both tonics are taken in the same octave, so the result lies in
    /// -11..=11. Modes are ignored.
    fn interval(&self, from: Key, to: Key) -> i32 {
        to.tonic.index() as i32 - from.tonic.index() as i32
    }
}

/// Profile-correlation key analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileKeyAnalyzer;

impl ProfileKeyAnalyzer {
    pub fn new() -> Self {
        ProfileKeyAnalyzer
    }
}

impl KeyAnalyzer for ProfileKeyAnalyzer {
    fn detect_key(&self, notes: &[NoteEvent]) -> Option<KeyDetection> {
        let histogram = pitch_class_histogram(notes);
        if histogram.iter().all(|&count| count == 0.0) {
            return None;
        }

        let mut best: Option<KeyDetection> = None;

        for (mode, profile) in [(KeyMode::Major, &MAJOR_PROFILE), (KeyMode::Minor, &MINOR_PROFILE)] {
            for tonic in 0..12 {
                let rotated: Vec<f64> = (0..12).map(|pc| profile[(pc + 12 - tonic) % 12]).collect();

                let Some(confidence) = pearson(&histogram, &rotated) else {
                    continue;
                };

                if best.map_or(true, |b| confidence > b.confidence) {
                    best = Some(KeyDetection {
                        key: Key::new(PitchClass::from_pitch(tonic as i32), mode),
                        confidence,
                    });
                }
            }
        }

        best
    }
}

/// Count notes per pitch class, skipping pitches outside the MIDI range
fn pitch_class_histogram(notes: &[NoteEvent]) -> [f64; 12] {
    let mut histogram = [0.0; 12];
    for note in notes.iter().filter(|n| is_midi_pitch(n.pitch)) {
        histogram[PitchClass::from_pitch(note.pitch).index() as usize] += 1.0;
    }
    histogram
}

/// Pearson correlation; `None` when either side has zero variance
fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denominator = (var_a * var_b).sqrt();
    if denominator <= f64::EPSILON {
        return None;
    }

    Some(covariance / denominator)
}

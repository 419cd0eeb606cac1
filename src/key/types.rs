// Key types
// Pitch classes, modes and detected keys

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SHARP_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid pitch class name: {0:?}")]
pub struct PitchClassError(pub String);

/// Pitch class 0-11 (C=0, C#=1, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Pitch class of any integer pitch
    pub fn from_pitch(pitch: i32) -> Self {
        PitchClass(pitch.rem_euclid(12) as u8)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }
}

impl FromStr for PitchClass {
    type Err = PitchClassError;

    /// Parse names like `C`, `F#`, `Bb`, `E-` (flat) or `c##`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();

        let natural: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(PitchClassError(s.to_string())),
        };

        let mut alteration = 0;
        for c in chars {
            match c {
                '#' => alteration += 1,
                'b' | '-' => alteration -= 1,
                _ => return Err(PitchClassError(s.to_string())),
            }
        }

        Ok(PitchClass::from_pitch(natural + alteration))
    }
}

impl TryFrom<String> for PitchClass {
    type Error = PitchClassError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PitchClass> for String {
    fn from(value: PitchClass) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    Major,
    Minor,
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Major => write!(f, "major"),
            KeyMode::Minor => write!(f, "minor"),
        }
    }
}

/// A musical key: tonic plus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub tonic: PitchClass,
    pub mode: KeyMode,
}

impl Key {
    pub fn new(tonic: PitchClass, mode: KeyMode) -> Self {
        Key { tonic, mode }
    }

    pub fn major(tonic: PitchClass) -> Self {
        Key::new(tonic, KeyMode::Major)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.mode)
    }
}

/// Result of key detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyDetection {
    pub key: Key,

    /// Pearson correlation with the best-matching key profile
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pitch_class_names() {
        assert_eq!("C".parse::<PitchClass>().unwrap().index(), 0);
        assert_eq!("F#".parse::<PitchClass>().unwrap().index(), 6);
        assert_eq!("Bb".parse::<PitchClass>().unwrap().index(), 10);
        assert_eq!("E-".parse::<PitchClass>().unwrap().index(), 3);
        assert_eq!("b#".parse::<PitchClass>().unwrap().index(), 0);
        assert_eq!("Cb".parse::<PitchClass>().unwrap().index(), 11);
    }

    #[test]
    fn test_parse_invalid_names() {
        assert!("H".parse::<PitchClass>().is_err());
        assert!("".parse::<PitchClass>().is_err());
        assert!("C4".parse::<PitchClass>().is_err());
    }

    #[test]
    fn test_pitch_class_from_pitch() {
        assert_eq!(PitchClass::from_pitch(60), PitchClass::C);
        assert_eq!(PitchClass::from_pitch(-1).name(), "B");
    }

    #[test]
    fn test_pitch_class_serde_as_name() {
        let json = serde_json::to_string(&PitchClass::from_pitch(7)).unwrap();
        assert_eq!(json, "\"G\"");

        let parsed: PitchClass = serde_json::from_str("\"Db\"").unwrap();
        assert_eq!(parsed.name(), "C#");
    }

    #[test]
    fn test_key_display() {
        let key = Key::new(PitchClass::from_pitch(9), KeyMode::Minor);
        assert_eq!(key.to_string(), "A minor");
    }
}

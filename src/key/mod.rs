// Key analysis
// Key detection and the transposition interval between keys

pub mod analyzer;
pub mod types;

pub use analyzer::{KeyAnalyzer, ProfileKeyAnalyzer};
pub use types::{Key, KeyDetection, KeyMode, PitchClass, PitchClassError};

// Sequence types
// The ordered offset -> pitch-set mapping and its line-level representation

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::groove::Offset;

/// Errors raised while building or expanding sequences
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("No notes to aggregate")]
    EmptyInput,

    #[error("Sequence step at offset {0} has no pitches")]
    EmptyStep(Offset),

    #[error("Invalid window: length {length}, stride {stride}")]
    InvalidWindow { length: usize, stride: usize },
}

/// One time step: an offset and the pitches sounding there
///
/// This is the unit of the persisted text format, one step per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub offset: Offset,
    pub pitches: Vec<i32>,
}

impl SequenceStep {
    pub fn new(offset: Offset, pitches: Vec<i32>) -> Self {
        SequenceStep { offset, pitches }
    }
}

/// Ordered mapping from offset to a non-empty set of pitches
///
/// Iteration is always ascending by offset, independent of insertion order.
/// Only the aggregator in this crate inserts; callers get a read-only view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    steps: BTreeMap<Offset, BTreeSet<i32>>,
}

impl Sequence {
    pub(crate) fn new() -> Self {
        Sequence::default()
    }

    /// Add a pitch at an offset, creating the set on first use
    pub(crate) fn insert(&mut self, offset: Offset, pitch: i32) {
        self.steps.entry(offset).or_default().insert(pitch);
    }

    /// Build a sequence from parsed steps
    ///
    /// Steps sharing an offset merge; duplicate pitches collapse.
    pub fn from_steps(steps: &[SequenceStep]) -> Result<Self, SequenceError> {
        let mut sequence = Sequence::new();

        for step in steps {
            if step.pitches.is_empty() {
                return Err(SequenceError::EmptyStep(step.offset));
            }
            for &pitch in &step.pitches {
                sequence.insert(step.offset, pitch);
            }
        }

        Ok(sequence)
    }

    /// Number of distinct offsets
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pitch set at an offset
    pub fn get(&self, offset: Offset) -> Option<&BTreeSet<i32>> {
        self.steps.get(&offset)
    }

    /// Iterate `(offset, pitches)` in ascending offset order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.steps.iter(),
        }
    }

    /// Steps in ascending offset order, pitches sorted ascending
    pub fn steps(&self) -> Vec<SequenceStep> {
        self.iter()
            .map(|(offset, pitches)| SequenceStep::new(offset, pitches.iter().copied().collect()))
            .collect()
    }
}

/// Ascending iterator over a sequence
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, Offset, BTreeSet<i32>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Offset, &'a BTreeSet<i32>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(offset, pitches)| (*offset, pitches))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = (Offset, &'a BTreeSet<i32>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

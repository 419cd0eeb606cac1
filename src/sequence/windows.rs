// Training windows
// Fixed-length overlapping slices of a sequence, written as a batch file

use std::io::{self, Write};

use super::format::write_steps;
use super::types::{SequenceError, SequenceStep};

/// Slice steps into windows of `length`, starting every `stride` steps
///
/// Only full windows are produced; a sequence shorter than `length` yields none.
pub fn windows(
    steps: &[SequenceStep],
    length: usize,
    stride: usize,
) -> Result<Vec<&[SequenceStep]>, SequenceError> {
    if length == 0 || stride == 0 {
        return Err(SequenceError::InvalidWindow { length, stride });
    }

    if steps.len() < length {
        return Ok(Vec::new());
    }

    Ok((0..=steps.len() - length)
        .step_by(stride)
        .map(|start| &steps[start..start + length])
        .collect())
}

/// Write windows to a batch file
///
/// Each window is a header line `<len>,<source>` followed by its steps.
pub fn write_batch_file<W: Write>(
    writer: &mut W,
    batches: &[(&str, &[SequenceStep])],
) -> io::Result<()> {
    for (source, window) in batches {
        writeln!(writer, "{},{}", window.len(), source)?;
        write_steps(writer, window)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groove::Offset;

    fn steps(count: u64) -> Vec<SequenceStep> {
        (0..count)
            .map(|i| SequenceStep::new(Offset::Step(i), vec![60 + i as i32]))
            .collect()
    }

    #[test]
    fn test_overlapping_windows() {
        let steps = steps(3);
        let windows = windows(&steps, 2, 1).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0][0].offset, Offset::Step(0));
        assert_eq!(windows[1][0].offset, Offset::Step(1));
    }

    #[test]
    fn test_stride_skips_partial_tail() {
        let steps = steps(10);
        let windows = windows(&steps, 4, 3).unwrap();

        // Starts at 0, 3, 6; 9 would run past the end
        assert_eq!(windows.len(), 3);
        assert!(windows.iter().all(|w| w.len() == 4));
    }

    #[test]
    fn test_short_sequence_yields_nothing() {
        assert!(windows(&steps(2), 5, 1).unwrap().is_empty());
    }

    #[test]
    fn test_zero_length_or_stride_fails() {
        assert_eq!(
            windows(&steps(3), 0, 1),
            Err(SequenceError::InvalidWindow { length: 0, stride: 1 })
        );
        assert!(windows(&steps(3), 2, 0).is_err());
    }

    #[test]
    fn test_batch_file_layout() {
        let steps = steps(3);
        let windows = windows(&steps, 2, 1).unwrap();
        let batches: Vec<(&str, &[SequenceStep])> =
            windows.into_iter().map(|w| ("song.seq", w)).collect();

        let mut buffer = Vec::new();
        write_batch_file(&mut buffer, &batches).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "2,song.seq\n0:60\n1:61\n2,song.seq\n1:61\n2:62\n"
        );
    }
}

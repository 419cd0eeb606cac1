// Sequence text format
// One line per time step: `offset:pitch[,pitch...]`

use std::io::{self, BufRead, Write};

use thiserror::Error;

use super::types::{Sequence, SequenceStep};
use crate::groove::Offset;

/// Errors raised while reading the sequence text format
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Line {line}: missing ':' separator")]
    MissingSeparator { line: usize },

    #[error("Line {line}: invalid offset {token:?}")]
    InvalidOffset { line: usize, token: String },

    #[error("Line {line}: invalid pitch {token:?}")]
    InvalidPitch { line: usize, token: String },

    #[error("Line {line}: empty pitch list")]
    EmptyPitchList { line: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Write one step as a line, pitches sorted ascending
fn write_line<W: Write>(writer: &mut W, offset: Offset, pitches: &[i32]) -> io::Result<()> {
    write!(writer, "{}:", offset)?;
    for (i, pitch) in pitches.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        write!(writer, "{}", pitch)?;
    }
    writer.write_all(b"\n")
}

/// Serialize a sequence in ascending offset order
///
/// The writer stays owned by the caller; nothing is flushed or closed here.
pub fn write_sequence<W: Write>(writer: &mut W, sequence: &Sequence) -> io::Result<()> {
    for (offset, pitches) in sequence {
        let pitches: Vec<i32> = pitches.iter().copied().collect();
        write_line(writer, offset, &pitches)?;
    }
    Ok(())
}

/// Serialize steps in the order given
pub fn write_steps<W: Write>(writer: &mut W, steps: &[SequenceStep]) -> io::Result<()> {
    for step in steps {
        let mut pitches = step.pitches.clone();
        pitches.sort_unstable();
        pitches.dedup();
        write_line(writer, step.offset, &pitches)?;
    }
    Ok(())
}

/// Serialize a sequence into a string
pub fn to_seq_string(sequence: &Sequence) -> String {
    let mut text = String::new();
    for (offset, pitches) in sequence {
        let pitches: Vec<String> = pitches.iter().map(|pitch| pitch.to_string()).collect();
        text.push_str(&format!("{}:{}\n", offset, pitches.join(",")));
    }
    text
}

/// Parse a single line into a step
fn parse_line(line_number: usize, line: &str) -> Result<SequenceStep, FormatError> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let (offset_part, pitch_part) = line
        .split_once(':')
        .ok_or(FormatError::MissingSeparator { line: line_number })?;

    let offset_token = offset_part.trim();
    let offset = offset_token
        .parse::<u64>()
        .map_err(|_| FormatError::InvalidOffset {
            line: line_number,
            token: offset_token.to_string(),
        })?;

    if pitch_part.trim().is_empty() {
        return Err(FormatError::EmptyPitchList { line: line_number });
    }

    let pitches = pitch_part
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<i32>().map_err(|_| FormatError::InvalidPitch {
                line: line_number,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SequenceStep::new(Offset::Step(offset), pitches))
}

/// Read steps in file order
///
/// Offsets are always integers in the persisted format. Pitches are not
/// range-checked and lines are not re-sorted.
pub fn read_steps<R: BufRead>(reader: R) -> Result<Vec<SequenceStep>, FormatError> {
    let mut steps = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        steps.push(parse_line(index + 1, &line)?);
    }

    Ok(steps)
}

/// Parse steps from a string
pub fn parse_seq_str(text: &str) -> Result<Vec<SequenceStep>, FormatError> {
    read_steps(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_sequence() -> Sequence {
        let steps = vec![
            SequenceStep::new(Offset::Step(0), vec![67, 60, 64]),
            SequenceStep::new(Offset::Step(1), vec![62]),
        ];
        Sequence::from_steps(&steps).unwrap()
    }

    #[test]
    fn test_serialize_example() {
        assert_eq!(to_seq_string(&example_sequence()), "0:60,64,67\n1:62\n");
    }

    #[test]
    fn test_deserialize_example() {
        let steps = parse_seq_str("0:60,64,67\n1:62\n").unwrap();

        assert_eq!(
            steps,
            vec![
                SequenceStep::new(Offset::Step(0), vec![60, 64, 67]),
                SequenceStep::new(Offset::Step(1), vec![62]),
            ]
        );
    }

    #[test]
    fn test_round_trip_compares_as_sets() {
        let original = example_sequence();
        let text = to_seq_string(&original);
        let parsed = Sequence::from_steps(&parse_seq_str(&text).unwrap()).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn test_round_trip_integer_sequences() {
        let cases: Vec<(&str, Vec<SequenceStep>)> = vec![
            (
                "gapped offsets",
                vec![
                    SequenceStep::new(Offset::Step(0), vec![60]),
                    SequenceStep::new(Offset::Step(7), vec![62, 65]),
                    SequenceStep::new(Offset::Step(1000), vec![48, 52, 55]),
                ],
            ),
            (
                "boundary pitches",
                vec![
                    SequenceStep::new(Offset::Step(0), vec![0, 127]),
                    SequenceStep::new(Offset::Step(1), vec![127]),
                    SequenceStep::new(Offset::Step(2), vec![0]),
                ],
            ),
            ("single step", vec![SequenceStep::new(Offset::Step(3), vec![64])]),
            (
                "unordered and duplicate steps",
                vec![
                    SequenceStep::new(Offset::Step(2), vec![67, 60]),
                    SequenceStep::new(Offset::Step(0), vec![60, 60]),
                    SequenceStep::new(Offset::Step(2), vec![64, 60]),
                    SequenceStep::new(Offset::Step(1), vec![62]),
                ],
            ),
            (
                "large offset",
                vec![
                    SequenceStep::new(Offset::Step(0), vec![60]),
                    SequenceStep::new(Offset::Step(u64::MAX), vec![72]),
                ],
            ),
        ];

        for (name, steps) in cases {
            let original = Sequence::from_steps(&steps).unwrap();
            let text = to_seq_string(&original);
            let parsed = Sequence::from_steps(&parse_seq_str(&text).unwrap()).unwrap();

            assert_eq!(parsed, original, "{}", name);
        }
    }

    #[test]
    fn test_to_seq_string_matches_writer() {
        let sequence = example_sequence();
        let mut buffer = Vec::new();
        write_sequence(&mut buffer, &sequence).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), to_seq_string(&sequence));
    }

    #[test]
    fn test_time_offsets_render_as_decimals() {
        let steps = vec![
            SequenceStep::new(Offset::Time(0.0), vec![60]),
            SequenceStep::new(Offset::Time(1.5), vec![64, 62]),
        ];
        let sequence = Sequence::from_steps(&steps).unwrap();

        assert_eq!(to_seq_string(&sequence), "0:60\n1.5:62,64\n");
    }

    #[test]
    fn test_invalid_offset() {
        let err = parse_seq_str("abc:60").unwrap_err();
        assert!(matches!(err, FormatError::InvalidOffset { line: 1, ref token } if token == "abc"));

        let err = parse_seq_str("0:60\n-1:60").unwrap_err();
        assert!(matches!(err, FormatError::InvalidOffset { line: 2, .. }));
    }

    #[test]
    fn test_empty_pitch_list() {
        let err = parse_seq_str("0:").unwrap_err();
        assert!(matches!(err, FormatError::EmptyPitchList { line: 1 }));
    }

    #[test]
    fn test_invalid_pitch() {
        let err = parse_seq_str("0:60,x").unwrap_err();
        assert!(matches!(err, FormatError::InvalidPitch { ref token, .. } if token == "x"));

        let err = parse_seq_str("0:60,,64").unwrap_err();
        assert!(matches!(err, FormatError::InvalidPitch { .. }));
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_seq_str("0:60\n\n1:62").unwrap_err();
        assert!(matches!(err, FormatError::MissingSeparator { line: 2 }));
    }

    #[test]
    fn test_reader_tolerates_legacy_spacing_and_crlf() {
        let steps = parse_seq_str("0:60, 64, 67\r\n1:62\r\n").unwrap();

        assert_eq!(steps[0].pitches, vec![60, 64, 67]);
        assert_eq!(steps[1].pitches, vec![62]);
    }

    #[test]
    fn test_reader_keeps_file_order_and_range() {
        let steps = parse_seq_str("5:200\n2:-3\n").unwrap();

        assert_eq!(steps[0].offset, Offset::Step(5));
        assert_eq!(steps[0].pitches, vec![200]);
        assert_eq!(steps[1].pitches, vec![-3]);
    }

    #[test]
    fn test_write_steps_sorts_pitches() {
        let mut buffer = Vec::new();
        write_steps(&mut buffer, &[SequenceStep::new(Offset::Step(3), vec![64, 60, 64])]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "3:60,64\n");
    }
}

// Standard MIDI File codec using the midly crate
// Reads note onsets as quarter-note offsets and writes events back as a playable track

use std::collections::{BTreeMap, BTreeSet};

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use serde::{Deserialize, Serialize};

use super::codec::{MidiCodec, MidiError};
use crate::events::{is_midi_pitch, EventKind, MusicEvent};

/// General MIDI program for Electric Guitar (jazz), 0-indexed
pub const GM_ELECTRIC_GUITAR: u8 = 26;

/// Largest delta time a MIDI event can carry (28-bit)
const MAX_TICK: u64 = 0x0FFF_FFFF;

/// MIDI read/write options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiOptions {
    /// Pulses per quarter note (PPQ) used when writing
    pub ppq: u16,

    /// Tempo written to the meta track
    pub bpm: f64,

    /// Length of every written note, in quarter notes
    pub note_length: f64,

    /// Velocity of every written note (1-127)
    pub velocity: u8,

    /// Output channel (0-15)
    pub channel: u8,

    /// Program change sent before the notes, if any
    pub program: Option<u8>,

    /// Name of the note track, if any
    pub track_name: Option<String>,
}

impl Default for MidiOptions {
    fn default() -> Self {
        MidiOptions {
            ppq: 480,
            bpm: 120.0,
            note_length: 1.0,
            velocity: 90,
            channel: 0,
            program: Some(GM_ELECTRIC_GUITAR),
            track_name: None,
        }
    }
}

/// MIDI codec over Standard MIDI Files
#[derive(Debug, Clone, Default)]
pub struct SmfCodec {
    options: MidiOptions,
}

impl SmfCodec {
    pub fn new(options: MidiOptions) -> Self {
        SmfCodec { options }
    }

    /// Convert a quarter-note offset to an absolute tick
    fn offset_to_tick(&self, offset: f64) -> Result<u64, MidiError> {
        if !offset.is_finite() || offset < 0.0 {
            return Err(MidiError::InvalidOffset(offset));
        }

        let tick = (offset * self.options.ppq as f64).round();
        if tick > MAX_TICK as f64 {
            return Err(MidiError::InvalidOffset(offset));
        }

        Ok(tick as u64)
    }

    /// Build the note track: program change, then note on/off pairs
    fn create_note_track(&self, events: &[MusicEvent]) -> Result<Track<'_>, MidiError> {
        let channel = self.options.channel.min(15);
        let velocity = self.options.velocity.clamp(1, 127);
        let length_ticks = self.offset_to_tick(self.options.note_length.max(0.0))?.max(1);

        let mut track = Track::new();

        if let Some(name) = &self.options.track_name {
            add_track_name(&mut track, 0, name);
        }

        if let Some(program) = self.options.program {
            track.push(TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Midi {
                    channel: channel.into(),
                    message: MidiMessage::ProgramChange {
                        program: program.min(127).into(),
                    },
                },
            });
        }

        // (tick, note-off before note-on at equal ticks, kind)
        let mut timed: Vec<(u64, u8, TrackEventKind)> = Vec::new();

        for event in events {
            let tick_on = self.offset_to_tick(event.offset)?;
            let tick_off = tick_on + length_ticks;

            for pitch in event.kind.pitches() {
                if !is_midi_pitch(pitch) {
                    return Err(MidiError::PitchOutOfRange {
                        offset: event.offset,
                        pitch,
                    });
                }
                let key = pitch as u8;

                timed.push((
                    tick_on,
                    1,
                    TrackEventKind::Midi {
                        channel: channel.into(),
                        message: MidiMessage::NoteOn {
                            key: key.into(),
                            vel: velocity.into(),
                        },
                    },
                ));
                timed.push((
                    tick_off,
                    0,
                    TrackEventKind::Midi {
                        channel: channel.into(),
                        message: MidiMessage::NoteOff {
                            key: key.into(),
                            vel: 0.into(),
                        },
                    },
                ));
            }
        }

        // Sort events by tick (absolute time)
        timed.sort_by_key(|(tick, order, _)| (*tick, *order));

        // Convert to delta times and add to track
        let mut last_tick = 0u64;
        for (tick, _, kind) in timed {
            let delta = tick.saturating_sub(last_tick).min(MAX_TICK) as u32;
            track.push(TrackEvent {
                delta: delta.into(),
                kind,
            });
            last_tick = tick;
        }

        add_end_of_track(&mut track, 0);
        Ok(track)
    }
}

impl MidiCodec for SmfCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<MusicEvent>, MidiError> {
        let smf = Smf::parse(bytes)?;

        let ppq = match smf.header.timing {
            Timing::Metrical(ppq) => ppq.as_int().max(1) as f64,
            Timing::Timecode(fps, subframes) => {
                return Err(MidiError::UnsupportedTiming(format!(
                    "SMPTE {} fps, {} subframes",
                    fps.as_f32(),
                    subframes
                )));
            }
        };

        let mut events = Vec::new();

        for track in &smf.tracks {
            // Onsets on the same tick within a track form a chord
            let mut onsets: BTreeMap<u64, BTreeSet<i32>> = BTreeMap::new();
            let mut tick = 0u64;

            for event in track {
                tick += event.delta.as_int() as u64;

                if let TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, vel },
                    ..
                } = event.kind
                {
                    if vel.as_int() > 0 {
                        onsets.entry(tick).or_default().insert(key.as_int() as i32);
                    }
                }
            }

            for (tick, pitches) in onsets {
                if let Some(kind) = EventKind::from_pitches(pitches) {
                    events.push(MusicEvent {
                        offset: tick as f64 / ppq,
                        kind,
                    });
                }
            }
        }

        // Stable, so tracks keep their order at equal offsets
        events.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        log::debug!(
            "Parsed {} events from {} tracks",
            events.len(),
            smf.tracks.len()
        );

        Ok(events)
    }

    fn write(&self, events: &[MusicEvent]) -> Result<Vec<u8>, MidiError> {
        let header = Header::new(Format::Parallel, Timing::Metrical(self.options.ppq.max(1).into()));

        // Track 0: tempo metadata
        let mut meta_track = Track::new();
        add_tempo(&mut meta_track, 0, self.options.bpm);
        add_end_of_track(&mut meta_track, 0);

        let note_track = self.create_note_track(events)?;

        let smf = Smf {
            header,
            tracks: vec![meta_track, note_track],
        };

        let mut bytes = Vec::new();
        smf.write_std(&mut bytes)?;

        Ok(bytes)
    }
}

/// Add track name to track
fn add_track_name<'a>(track: &mut Track<'a>, delta: u32, name: &'a str) {
    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
    });
}

/// Add tempo meta message
fn add_tempo(track: &mut Track<'_>, delta: u32, bpm: f64) {
    let bpm = if bpm.is_finite() && bpm > 0.0 { bpm } else { 120.0 };

    // Microseconds per quarter note, limited to 24 bits
    let us_per_quarter = ((60_000_000.0 / bpm) as u32).min(0x00FF_FFFF);

    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(us_per_quarter.into())),
    });
}

/// Add end of track message
fn add_end_of_track(track: &mut Track<'_>, delta: u32) {
    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
}

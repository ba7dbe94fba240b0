// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{ControlChangeEvent, MidiFileSettings, NoteEvent};
use crate::{
    error::{Result, ValidationError},
    time::Tempo,
};
use midly::{
    num::{u15, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// When several events share a tick, they're written in this order. Note-offs
/// go first so that a note ending exactly where the next one on the same key
/// begins doesn't silence the new note, and controllers precede note-ons so
/// that a note starts with the automation already applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    NoteOff,
    Controller,
    NoteOn,
}

#[derive(Debug)]
struct TimedMessage {
    tick: u64,
    precedence: Precedence,
    message: MidiMessage,
}

/// Encodes note and controller events as a single-track (format 0) Standard
/// MIDI File.
#[derive(Clone, Debug, Default)]
pub struct MidiWriter {
    settings: MidiFileSettings,
    tempo: Tempo,
}
impl MidiWriter {
    // Deltas are stored as 28-bit variable-length quantities.
    const MAX_DELTA: u64 = 0x0fff_ffff;

    #[allow(missing_docs)]
    pub fn new_with(settings: MidiFileSettings, tempo: Tempo) -> Self {
        Self { settings, tempo }
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &MidiFileSettings {
        &self.settings
    }

    #[allow(missing_docs)]
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Validates everything and returns the bytes of the file. Nothing is
    /// produced unless every event is valid.
    pub fn encode(
        &self,
        notes: &[NoteEvent],
        control_changes: &[ControlChangeEvent],
    ) -> Result<Vec<u8>> {
        let ticks_per_beat = self.settings.ticks_per_beat;
        let timing = u15::try_from(ticks_per_beat)
            .filter(|t| t.as_int() > 0)
            .ok_or(ValidationError::TicksPerBeat(ticks_per_beat))?;
        let channel = self.settings.channel.to_u4()?;
        let micros_per_beat = self.tempo.micros_per_beat()?;
        notes
            .iter()
            .enumerate()
            .try_for_each(|(i, note)| note.validate(i))?;
        control_changes
            .iter()
            .enumerate()
            .try_for_each(|(i, cc)| cc.validate(i))?;

        let mut messages = self.timed_messages(notes, control_changes)?;
        messages.sort_by_key(|m| (m.tick, m.precedence));
        if self.settings.deinterleave {
            messages = Self::deinterleave(messages);
        }

        let mut track = Vec::with_capacity(messages.len() + 3);
        if let Some(name) = self.settings.track_name.as_ref() {
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
            });
        }
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(micros_per_beat)),
        });
        track.extend(Self::to_track_events(channel, ticks_per_beat, &messages)?);
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });

        let smf = Smf {
            header: Header::new(Format::SingleTrack, Timing::Metrical(timing)),
            tracks: vec![track],
        };
        let mut bytes = Vec::new();
        smf.write_std(&mut bytes)?;
        log::debug!(
            "encoded {} notes and {} control changes at {} into {} bytes",
            notes.len(),
            control_changes.len(),
            self.tempo,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Encodes the events and writes them to `path`, replacing any existing
    /// file. The file isn't touched if validation fails.
    pub fn write_to_file(
        &self,
        notes: &[NoteEvent],
        control_changes: &[ControlChangeEvent],
        path: &Path,
    ) -> Result<()> {
        let bytes = self.encode(notes, control_changes)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn beats_to_ticks(&self, beats: f64) -> std::result::Result<u64, ValidationError> {
        let ticks = (beats * self.settings.ticks_per_beat as f64).round();
        if ticks >= u64::MAX as f64 {
            Err(ValidationError::TooLate(beats))
        } else {
            Ok(ticks as u64)
        }
    }

    fn timed_messages(
        &self,
        notes: &[NoteEvent],
        control_changes: &[ControlChangeEvent],
    ) -> std::result::Result<Vec<TimedMessage>, ValidationError> {
        let mut messages = Vec::with_capacity(notes.len() * 2 + control_changes.len());
        for note in notes {
            let key = u7::new(note.midi);
            let start = self.beats_to_ticks(note.t)?;
            // A very short note still lasts at least a tick, or its note-off
            // would sort ahead of its note-on.
            let end = self.beats_to_ticks(note.end())?.max(start + 1);
            messages.push(TimedMessage {
                tick: start,
                precedence: Precedence::NoteOn,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(note.vel),
                },
            });
            messages.push(TimedMessage {
                tick: end,
                precedence: Precedence::NoteOff,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            });
        }
        for cc in control_changes {
            messages.push(TimedMessage {
                tick: self.beats_to_ticks(cc.t)?,
                precedence: Precedence::Controller,
                message: MidiMessage::Controller {
                    controller: u7::new(cc.controller_number),
                    value: u7::new(cc.parameter),
                },
            });
        }
        Ok(messages)
    }

    /// Rewrites overlapping notes on the same key. A note-on for a key that's
    /// already sounding first ends the sounding note, and only the note-off
    /// that brings the key's count of pending notes back to zero is kept.
    fn deinterleave(messages: Vec<TimedMessage>) -> Vec<TimedMessage> {
        let mut sounding = [0usize; 128];
        let mut result = Vec::with_capacity(messages.len());
        for m in messages {
            match m.message {
                MidiMessage::NoteOn { key, .. } => {
                    let count = &mut sounding[key.as_int() as usize];
                    if *count > 0 {
                        result.push(TimedMessage {
                            tick: m.tick,
                            precedence: Precedence::NoteOff,
                            message: MidiMessage::NoteOff {
                                key,
                                vel: u7::new(0),
                            },
                        });
                    }
                    *count += 1;
                    result.push(m);
                }
                MidiMessage::NoteOff { key, .. } => {
                    let count = &mut sounding[key.as_int() as usize];
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        result.push(m);
                    }
                }
                _ => result.push(m),
            }
        }
        result
    }

    /// Converts absolute ticks to deltas. Only the gap between consecutive
    /// events is limited, so a long file is fine as long as it's never
    /// silent for too long.
    fn to_track_events<'a>(
        channel: u4,
        ticks_per_beat: u16,
        messages: &[TimedMessage],
    ) -> std::result::Result<Vec<TrackEvent<'a>>, ValidationError> {
        let to_beats = |tick: u64| tick as f64 / ticks_per_beat as f64;
        let mut last_tick = 0;
        messages
            .iter()
            .map(|m| {
                let delta = m.tick - last_tick;
                if delta > Self::MAX_DELTA {
                    return Err(ValidationError::GapTooLong {
                        from: to_beats(last_tick),
                        to: to_beats(m.tick),
                    });
                }
                last_tick = m.tick;
                Ok(TrackEvent {
                    delta: u28::new(delta as u32),
                    kind: TrackEventKind::Midi {
                        channel,
                        message: m.message,
                    },
                })
            })
            .collect()
    }
}

fn path_with_suffix(out_filename: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(out_filename.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn save(
    notes: &[NoteEvent],
    control_changes: &[ControlChangeEvent],
    path: PathBuf,
    tempo: Tempo,
) -> Result<PathBuf> {
    MidiWriter::new_with(MidiFileSettings::default(), tempo).write_to_file(
        notes,
        control_changes,
        &path,
    )?;
    log::info!("saved {}", path.display());
    Ok(path)
}

/// Writes the notes as a one-track MIDI file named `<out_filename>.mid`, and
/// returns the path that was written.
pub fn save_midi(
    events: &[NoteEvent],
    out_filename: impl AsRef<Path>,
    bpm: impl Into<Tempo>,
) -> Result<PathBuf> {
    save(
        events,
        &[],
        path_with_suffix(out_filename.as_ref(), ".mid"),
        bpm.into(),
    )
}

/// Writes the notes and control changes as a one-track MIDI file named
/// `<out_filename>_cc.mid`, and returns the path that was written.
pub fn save_midi_cc(
    events: &[NoteEvent],
    events_cc: &[ControlChangeEvent],
    out_filename: impl AsRef<Path>,
    bpm: impl Into<Tempo>,
) -> Result<PathBuf> {
    save(
        events,
        events_cc,
        path_with_suffix(out_filename.as_ref(), "_cc.mid"),
        bpm.into(),
    )
}

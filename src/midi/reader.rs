// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{ControlChangeEvent, NoteEvent};
use crate::{
    error::{Error, Result},
    time::Tempo,
};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::{collections::VecDeque, path::Path};

/// What [read_midi()] found in a Standard MIDI File.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedMidi {
    /// The first tempo event, if there was one.
    pub tempo: Option<Tempo>,
    #[allow(missing_docs)]
    pub ticks_per_beat: u16,
    /// Notes from every track and channel, sorted by start time.
    pub notes: Vec<NoteEvent>,
    /// Controller changes from every track and channel, sorted by time.
    pub control_changes: Vec<ControlChangeEvent>,
}

/// Decodes notes and controller changes from the bytes of a Standard MIDI
/// File. Each note-on is paired with the next note-off on the same key; a
/// note-on with zero velocity counts as a note-off. Note-ons that never end
/// are dropped.
pub fn read_midi(bytes: &[u8]) -> Result<DecodedMidi> {
    let smf = Smf::parse(bytes)?;
    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(ticks_per_beat) => ticks_per_beat.as_int(),
        Timing::Timecode(..) => return Err(Error::UnsupportedTiming),
    };
    let to_beats = |tick: u64| tick as f64 / ticks_per_beat as f64;

    let mut decoded = DecodedMidi {
        ticks_per_beat,
        ..Default::default()
    };
    for track in smf.tracks.iter() {
        // Relative times start over at zero with each track. Deltas are 28
        // bits each, so a long enough track passes u32::MAX.
        let mut tick: u64 = 0;
        let mut pending: Vec<VecDeque<(u64, u8)>> = vec![VecDeque::new(); 128];

        for event in track.iter() {
            tick += event.delta.as_int() as u64;
            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(micros)) => {
                    if decoded.tempo.is_none() {
                        decoded.tempo = Some(Tempo::from_micros_per_beat(micros));
                    }
                }
                TrackEventKind::Midi { message, .. } => match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        pending[key.as_int() as usize].push_back((tick, vel.as_int()));
                    }
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        if let Some((start, vel)) = pending[key.as_int() as usize].pop_front() {
                            decoded.notes.push(NoteEvent::new(
                                key.as_int(),
                                to_beats(start),
                                to_beats(tick - start),
                                vel,
                            ));
                        }
                    }
                    MidiMessage::Controller { controller, value } => {
                        decoded.control_changes.push(ControlChangeEvent::new(
                            to_beats(tick),
                            controller.as_int(),
                            value.as_int(),
                        ));
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }
    decoded
        .notes
        .sort_by(|a, b| a.t.total_cmp(&b.t).then(a.midi.cmp(&b.midi)));
    decoded
        .control_changes
        .sort_by(|a, b| a.t.total_cmp(&b.t));
    Ok(decoded)
}

/// Reads and decodes a Standard MIDI File from disk.
pub fn load_midi(path: impl AsRef<Path>) -> Result<DecodedMidi> {
    let bytes = std::fs::read(path.as_ref())?;
    read_midi(&bytes)
}

// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Note and controller events, and their conversion to and from Standard MIDI
//! Files.

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{
        load_midi, read_midi, save_midi, save_midi_cc, ControlChangeEvent, DecodedMidi,
        MidiChannel, MidiFileSettings, MidiWriter, NoteEvent,
    };
}

pub use midly::{
    num::{u4, u7},
    MidiMessage,
};
pub use reader::{load_midi, read_midi, DecodedMidi};
pub use writer::{save_midi, save_midi_cc, MidiWriter};

use crate::error::ValidationError;
use derive_more::Display as DeriveDisplay;
use serde::{Deserialize, Serialize};

mod reader;
mod writer;

/// Newtype for MIDI channel.
#[derive(
    Clone, Copy, Debug, Default, DeriveDisplay, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub struct MidiChannel(pub u8);
#[allow(missing_docs)]
impl MidiChannel {
    pub const MIN_VALUE: u8 = 0;
    pub const MAX_VALUE: u8 = 15; // inclusive

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the channel as midly wants it, if it's in range.
    pub fn to_u4(&self) -> Result<u4, ValidationError> {
        u4::try_from(self.0).ok_or(ValidationError::Channel(self.0))
    }
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}
impl From<u8> for MidiChannel {
    fn from(value: u8) -> Self {
        Self(value)
    }
}
impl From<MidiChannel> for u8 {
    fn from(value: MidiChannel) -> Self {
        value.0
    }
}

/// A single played note. Times are in beats (quarter notes) relative to the
/// start of the file.
///
/// The field names match the event dictionaries that sonification scripts
/// typically build, so a JSON list like
/// `[{"midi": 60, "t": 0.0, "dur": 1.0, "vel": 100}]` deserializes directly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// The MIDI key, 0..=127. 60 is C4.
    pub midi: u8,
    /// Start time in beats.
    pub t: f64,
    /// Duration in beats.
    pub dur: f64,
    /// Note-on velocity, 0..=127.
    pub vel: u8,
}
impl NoteEvent {
    #[allow(missing_docs)]
    pub const fn new(midi: u8, t: f64, dur: f64, vel: u8) -> Self {
        Self { midi, t, dur, vel }
    }

    /// When the note stops, in beats.
    pub fn end(&self) -> f64 {
        self.t + self.dur
    }

    /// Checks that the note can be represented in a MIDI file. `index` is
    /// used only to make the error point at the offending event.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.midi > 127 {
            return Err(ValidationError::Pitch {
                index,
                value: self.midi,
            });
        }
        if self.vel > 127 {
            return Err(ValidationError::Velocity {
                index,
                value: self.vel,
            });
        }
        if !(self.t.is_finite() && self.t >= 0.0) {
            return Err(ValidationError::StartTime {
                index,
                value: self.t,
            });
        }
        if !(self.dur.is_finite() && self.dur > 0.0) {
            return Err(ValidationError::Duration {
                index,
                value: self.dur,
            });
        }
        Ok(())
    }
}

/// A controller change (automation) event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlChangeEvent {
    /// Time in beats.
    pub t: f64,
    /// The controller number, 0..=127 (e.g., 1 is the mod wheel, 7 is volume).
    pub controller_number: u8,
    /// The new controller value, 0..=127.
    pub parameter: u8,
}
impl ControlChangeEvent {
    #[allow(missing_docs)]
    pub const fn new(t: f64, controller_number: u8, parameter: u8) -> Self {
        Self {
            t,
            controller_number,
            parameter,
        }
    }

    /// Checks that the event can be represented in a MIDI file.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.controller_number > 127 {
            return Err(ValidationError::Controller {
                index,
                value: self.controller_number,
            });
        }
        if self.parameter > 127 {
            return Err(ValidationError::Parameter {
                index,
                value: self.parameter,
            });
        }
        if !(self.t.is_finite() && self.t >= 0.0) {
            return Err(ValidationError::ControlTime {
                index,
                value: self.t,
            });
        }
        Ok(())
    }
}

/// How [MidiWriter] lays out the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MidiFileSettings {
    /// Time resolution, in ticks per quarter note. Must be 1..=32767.
    pub ticks_per_beat: u16,
    /// The channel that all events are written to.
    pub channel: MidiChannel,
    /// If set, written as a Track Name meta event.
    pub track_name: Option<String>,
    /// Whether overlapping notes on the same key are split so that each
    /// note-on is matched by exactly one note-off.
    pub deinterleave: bool,
}
impl Default for MidiFileSettings {
    fn default() -> Self {
        Self {
            ticks_per_beat: Self::DEFAULT_TICKS_PER_BEAT,
            channel: MidiChannel::default(),
            track_name: None,
            deinterleave: true,
        }
    }
}
impl MidiFileSettings {
    #[allow(missing_docs)]
    pub const DEFAULT_TICKS_PER_BEAT: u16 = 960;

    /// Loads settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_validation() {
        assert!(NoteEvent::new(60, 0.0, 1.0, 100).validate(0).is_ok());
        assert!(NoteEvent::new(127, 3.5, 0.01, 0).validate(0).is_ok());
        assert_eq!(
            NoteEvent::new(128, 0.0, 1.0, 100).validate(3),
            Err(ValidationError::Pitch {
                index: 3,
                value: 128
            })
        );
        assert_eq!(
            NoteEvent::new(60, 0.0, 1.0, 200).validate(0),
            Err(ValidationError::Velocity {
                index: 0,
                value: 200
            })
        );
        assert!(matches!(
            NoteEvent::new(60, -0.5, 1.0, 100).validate(0),
            Err(ValidationError::StartTime { .. })
        ));
        assert!(matches!(
            NoteEvent::new(60, f64::NAN, 1.0, 100).validate(0),
            Err(ValidationError::StartTime { .. })
        ));
        assert!(matches!(
            NoteEvent::new(60, 0.0, 0.0, 100).validate(0),
            Err(ValidationError::Duration { .. })
        ));
        assert!(matches!(
            NoteEvent::new(60, 0.0, -1.0, 100).validate(0),
            Err(ValidationError::Duration { .. })
        ));
    }

    #[test]
    fn control_change_validation() {
        assert!(ControlChangeEvent::new(0.0, 1, 64).validate(0).is_ok());
        assert!(matches!(
            ControlChangeEvent::new(0.0, 128, 64).validate(0),
            Err(ValidationError::Controller { value: 128, .. })
        ));
        assert!(matches!(
            ControlChangeEvent::new(0.0, 1, 255).validate(0),
            Err(ValidationError::Parameter { value: 255, .. })
        ));
        assert!(matches!(
            ControlChangeEvent::new(-1.0, 1, 64).validate(0),
            Err(ValidationError::ControlTime { .. })
        ));
    }

    #[test]
    fn events_deserialize_from_dictionaries() {
        let notes: Vec<NoteEvent> =
            serde_json::from_str(r#"[{"midi": 60, "t": 0, "dur": 1.5, "vel": 100}]"#).unwrap();
        assert_eq!(notes, vec![NoteEvent::new(60, 0.0, 1.5, 100)]);

        let ccs: Vec<ControlChangeEvent> = serde_json::from_str(
            r#"[{"t": 2.0, "controller_number": 74, "parameter": 12}]"#,
        )
        .unwrap();
        assert_eq!(ccs, vec![ControlChangeEvent::new(2.0, 74, 12)]);
    }

    #[test]
    fn settings_defaults_and_json() {
        let settings = MidiFileSettings::default();
        assert_eq!(settings.ticks_per_beat, 960);
        assert_eq!(settings.channel, MidiChannel(0));
        assert!(settings.deinterleave);

        let settings =
            MidiFileSettings::from_json(r#"{"channel": 9, "track-name": "drums"}"#).unwrap();
        assert_eq!(settings.channel, MidiChannel(9));
        assert_eq!(settings.track_name.as_deref(), Some("drums"));
        assert_eq!(settings.ticks_per_beat, 960);

        assert!(MidiFileSettings::from_json("{").is_err());
    }

    #[test]
    fn channel_range() {
        assert_eq!(MidiChannel::new(15).to_u4().unwrap().as_int(), 15);
        assert_eq!(MidiChannel(16).to_u4(), Err(ValidationError::Channel(16)));
    }
}

// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Conversion between pitch names such as "C#4" and MIDI note numbers.
//!
//! We use the convention where A4 is MIDI note 69, so middle C is C4 = 60 and
//! MIDI note 0 is C-1.

use crate::error::{Error, Result};
use midly::num::u7;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// How accidentals are written when naming a pitch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Spelling {
    /// C, C#, D, D#, ...
    #[default]
    Sharps,
    /// C, Db, D, Eb, ...
    Flats,
}

/// A 12-TET pitch, identified by its MIDI note number.
///
/// A [Pitch] may lie outside 0..=127 while it's only being named. Use
/// [Pitch::to_midi_key()] when it's time to put it in a MIDI message.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pitch(pub i16);
impl Pitch {
    /// MIDI note number of A4.
    pub const A4_VALUE: i16 = 69;
    /// The frequency of A4.
    pub const A4_FREQUENCY: f64 = 440.0;
    #[allow(missing_docs)]
    pub const A4: Pitch = Pitch(Self::A4_VALUE);
    /// Middle C.
    pub const C4: Pitch = Pitch(60);

    const SHARP_NAMES: [&'static str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    const FLAT_NAMES: [&'static str; 12] = [
        "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
    ];

    #[allow(missing_docs)]
    pub const fn new(value: i16) -> Self {
        Self(value)
    }

    #[allow(missing_docs)]
    pub const fn value(&self) -> i16 {
        self.0
    }

    /// Moves the pitch by the given number of semitones, or returns None if
    /// the result doesn't fit.
    pub const fn checked_transposed(&self, semitones: i16) -> Option<Self> {
        match self.0.checked_add(semitones) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// The octave number, where C4 begins octave 4.
    pub const fn octave(&self) -> i16 {
        self.0.div_euclid(12) - 1
    }

    /// The pitch class, 0 for C through 11 for B.
    pub const fn pitch_class(&self) -> usize {
        self.0.rem_euclid(12) as usize
    }

    /// The name with octave, e.g. "F#3", using sharps.
    pub fn name(&self) -> String {
        self.name_with(Spelling::Sharps)
    }

    /// The name with octave, e.g. "Gb3" or "F#3".
    pub fn name_with(&self, spelling: Spelling) -> String {
        let names = match spelling {
            Spelling::Sharps => &Self::SHARP_NAMES,
            Spelling::Flats => &Self::FLAT_NAMES,
        };
        format!("{}{}", names[self.pitch_class()], self.octave())
    }

    /// The frequency in Hz, tuned to A4 = 440.
    pub fn frequency(&self) -> f64 {
        Self::A4_FREQUENCY * 2.0f64.powf((self.0 - Self::A4_VALUE) as f64 / 12.0)
    }

    /// Returns the MIDI key, or an error if the pitch is outside 0..=127.
    pub fn to_midi_key(&self) -> Result<u7> {
        u8::try_from(self.0)
            .ok()
            .and_then(u7::try_from)
            .ok_or(Error::PitchOutOfRange(self.0))
    }
}
impl Display for Pitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
impl From<u7> for Pitch {
    fn from(value: u7) -> Self {
        Self(value.as_int() as i16)
    }
}
impl From<u8> for Pitch {
    fn from(value: u8) -> Self {
        Self(value as i16)
    }
}
impl FromStr for Pitch {
    type Err = Error;

    /// Parses names like "C4", "c#4", "Bb-1", or "Fx2". Letters and
    /// accidentals are case-insensitive; `#` raises by a semitone, `b` lowers
    /// by one, and `x` raises by two. Any number of accidentals may follow the
    /// letter.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidNoteName(s.to_string());
        let lowered = s.trim().to_ascii_lowercase();
        let mut chars = lowered.chars();

        // Semitones above C within the octave.
        let mut offset: i16 = match chars.next().ok_or_else(invalid)? {
            'c' => 0,
            'd' => 2,
            'e' => 4,
            'f' => 5,
            'g' => 7,
            'a' => 9,
            'b' => 11,
            _ => return Err(invalid()),
        };
        let rest = chars.as_str();
        let octave_start = rest
            .find(|c: char| !matches!(c, '#' | 'b' | 'x'))
            .ok_or_else(invalid)?;
        for accidental in rest[..octave_start].chars() {
            offset += match accidental {
                '#' => 1,
                'b' => -1,
                _ => 2,
            };
        }
        let octave: i16 = rest[octave_start..].parse().map_err(|_| invalid())?;
        octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|base| base.checked_add(offset))
            .map(Self)
            .ok_or_else(invalid)
    }
}

/// Returns the MIDI note number for a pitch name like "A4".
pub fn str_to_midi(name: &str) -> Result<i16> {
    Ok(name.parse::<Pitch>()?.value())
}

/// Returns the sharp-spelled pitch name for a MIDI note number.
pub fn midi_to_str(note: i16) -> String {
    Pitch(note).name()
}

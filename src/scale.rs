// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Scales as sequences of semitone steps, and helpers that walk them to
//! produce runs of notes.

use crate::{
    error::{Error, Result},
    pitch::Pitch,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// The built-in scales. Each one parses from and displays as its camelCase
/// name, e.g. "harmonicMinor".
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum Scale {
    Chromatic,
    Major,
    Minor,
    HarmonicMinor,
    MelodicMinor,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Lochrian,
    MajorPent,
    MinorPent,
    Wholetone,
    Diminished,
}
impl Scale {
    /// The semitone steps between consecutive degrees, starting at the root.
    pub const fn steps(&self) -> &'static [u8] {
        match self {
            Scale::Chromatic => &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            Scale::Major | Scale::Ionian => &[2, 2, 1, 2, 2, 2, 1],
            Scale::Minor | Scale::Aeolian => &[2, 1, 2, 2, 1, 2, 2],
            Scale::HarmonicMinor => &[2, 1, 2, 2, 1, 3, 1],
            Scale::MelodicMinor => &[2, 1, 2, 2, 2, 2, 1],
            Scale::Dorian => &[2, 1, 2, 2, 2, 1, 2],
            Scale::Phrygian => &[1, 2, 2, 2, 1, 2, 2],
            Scale::Lydian => &[2, 2, 2, 1, 2, 2, 1],
            Scale::Mixolydian => &[2, 2, 1, 2, 2, 1, 2],
            Scale::Lochrian => &[1, 2, 2, 1, 2, 2, 2],
            Scale::MajorPent => &[2, 2, 3, 2, 3],
            Scale::MinorPent => &[3, 2, 2, 3, 2],
            Scale::Wholetone => &[2, 2, 2, 2, 2, 2],
            Scale::Diminished => &[2, 1, 2, 1, 2, 1, 2, 1],
        }
    }

    /// Looks up a scale by name.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| Error::UnknownScale(name.to_string()))
    }
}

/// Where a walk gets its steps: a built-in [Scale] or a caller-supplied list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleSteps {
    #[allow(missing_docs)]
    Named(Scale),
    /// Steps in semitones. Nothing checks that they add up to an octave.
    Custom(Vec<u8>),
}
impl ScaleSteps {
    #[allow(missing_docs)]
    pub fn steps(&self) -> &[u8] {
        match self {
            ScaleSteps::Named(scale) => scale.steps(),
            ScaleSteps::Custom(steps) => steps,
        }
    }

    /// Total number of semitones covered by one pass through the steps. This
    /// is 12 for the usual octave-repeating scales.
    pub fn span(&self) -> u32 {
        self.steps().iter().map(|s| *s as u32).sum()
    }
}
impl From<Scale> for ScaleSteps {
    fn from(value: Scale) -> Self {
        Self::Named(value)
    }
}
impl From<Vec<u8>> for ScaleSteps {
    fn from(value: Vec<u8>) -> Self {
        Self::Custom(value)
    }
}
impl From<&[u8]> for ScaleSteps {
    fn from(value: &[u8]) -> Self {
        Self::Custom(value.to_vec())
    }
}
impl<const N: usize> From<[u8; N]> for ScaleSteps {
    fn from(value: [u8; N]) -> Self {
        Self::Custom(value.to_vec())
    }
}
impl TryFrom<&str> for ScaleSteps {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Scale::from_name(value).map(Self::Named)
    }
}

/// Anything that can name or list a scale's steps. This lets
/// [get_scale_notes()] accept scale names, [Scale]s, and step lists alike.
pub trait IntoScaleSteps {
    /// Resolves to steps, failing only for unknown scale names.
    fn into_scale_steps(self) -> Result<ScaleSteps>;
}
impl IntoScaleSteps for ScaleSteps {
    fn into_scale_steps(self) -> Result<ScaleSteps> {
        Ok(self)
    }
}
impl IntoScaleSteps for &ScaleSteps {
    fn into_scale_steps(self) -> Result<ScaleSteps> {
        Ok(self.clone())
    }
}
impl IntoScaleSteps for Scale {
    fn into_scale_steps(self) -> Result<ScaleSteps> {
        Ok(self.into())
    }
}
impl IntoScaleSteps for Vec<u8> {
    fn into_scale_steps(self) -> Result<ScaleSteps> {
        Ok(self.into())
    }
}
impl IntoScaleSteps for &[u8] {
    fn into_scale_steps(self) -> Result<ScaleSteps> {
        Ok(self.into())
    }
}
impl<const N: usize> IntoScaleSteps for [u8; N] {
    fn into_scale_steps(self) -> Result<ScaleSteps> {
        Ok(self.into())
    }
}
impl IntoScaleSteps for &str {
    fn into_scale_steps(self) -> Result<ScaleSteps> {
        ScaleSteps::try_from(self)
    }
}
impl IntoScaleSteps for &String {
    fn into_scale_steps(self) -> Result<ScaleSteps> {
        ScaleSteps::try_from(self.as_str())
    }
}

/// Walks `steps` upward from `start` for `octaves` octaves.
///
/// Each octave restarts exactly 12 semitones above the previous one and emits
/// one pitch per step, so the last step of each pass only leads back to the
/// octave. The walk ends with the root `octaves` octaves above `start`. The
/// result always has `octaves * steps.len() + 1` pitches.
///
/// Fails with [Error::PitchOverflow] if any pitch along the way wouldn't fit
/// in a [Pitch].
pub fn get_scale_pitches(start: Pitch, octaves: usize, steps: &[u8]) -> Result<Vec<Pitch>> {
    let overflow = || Error::PitchOverflow {
        start: start.value(),
        octaves,
    };
    let octave_root = |octave: usize| -> Result<Pitch> {
        i16::try_from(octave)
            .ok()
            .and_then(|o| o.checked_mul(12))
            .and_then(|semitones| start.checked_transposed(semitones))
            .ok_or_else(overflow)
    };

    // The closing root is the highest octave root, so checking it first keeps
    // huge octave counts from allocating.
    let top = octave_root(octaves)?;
    let mut pitches = Vec::with_capacity(octaves * steps.len() + 1);
    for octave in 0..octaves {
        // The last step of each pass only leads to the next octave, so it
        // may overflow without harm.
        let mut next = Some(octave_root(octave)?);
        for step in steps {
            let pitch = next.ok_or_else(overflow)?;
            pitches.push(pitch);
            next = pitch.checked_transposed(*step as i16);
        }
    }
    pitches.push(top);
    Ok(pitches)
}

/// Returns the names of the notes of `scale`, starting at `start_note` and
/// spanning `octaves` octaves, with the root repeated as the highest note.
///
/// ```
/// use ensnare_sonify::scale::get_scale_notes;
///
/// let notes = get_scale_notes("C2", 1, "major").unwrap();
/// assert_eq!(notes, ["C2", "D2", "E2", "F2", "G2", "A2", "B2", "C3"]);
/// ```
pub fn get_scale_notes(
    start_note: &str,
    octaves: usize,
    scale: impl IntoScaleSteps,
) -> Result<Vec<String>> {
    let steps = scale.into_scale_steps()?;
    let start: Pitch = start_note.parse()?;
    Ok(get_scale_pitches(start, octaves, steps.steps())?
        .iter()
        .map(Pitch::name)
        .collect())
}

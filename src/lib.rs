// Copyright (c) 2024 Mike Tsao. All rights reserved.

#![warn(missing_docs)]

//! The `ensnare-sonify` crate helps turn numbers into music.
//!
//! A typical sonification maps a data series onto a musical scale with
//! [map_value_to_integer()](map::map_value_to_integer), looks up the
//! corresponding notes with [get_scale_notes()](scale::get_scale_notes), and
//! writes the result as a MIDI file with [save_midi()](midi::save_midi).
//!
//! ```no_run
//! use ensnare_sonify::prelude::*;
//!
//! # fn main() -> ensnare_sonify::error::Result<()> {
//! let data = [0.1, 0.5, 0.9, 0.3];
//! let scale = get_scale_pitches("C3".parse()?, 2, Scale::MajorPent.steps())?;
//! let indexes = map_values_to_integer(&data, 0.0, 1.0, 0, scale.len() as i64 - 1, 1.0)?;
//! let events: Vec<NoteEvent> = indexes
//!     .iter()
//!     .enumerate()
//!     .map(|(beat, i)| -> ensnare_sonify::error::Result<NoteEvent> {
//!         let key = scale[*i as usize].to_midi_key()?.as_int();
//!         Ok(NoteEvent::new(key, beat as f64, 1.0, 100))
//!     })
//!     .collect::<ensnare_sonify::error::Result<_>>()?;
//! save_midi(&events, "data", 90.0)?;
//! # Ok(())
//! # }
//! ```

/// Error types shared by every module.
pub mod error;
/// Mapping values between numeric ranges.
pub mod map;
/// MIDI events and Standard MIDI File I/O.
pub mod midi;
/// Pitch names and MIDI note numbers.
pub mod pitch;
/// Named and custom scales.
pub mod scale;
/// Tempo.
pub mod time;

/// A collection of imports that are useful to users of this crate. `use
/// ensnare_sonify::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        error::{Error, ValidationError},
        map::{
            map_matrix, map_value, map_value_to_integer, map_values, map_values_to_integer,
            RangeMapper, RangeMapperBuilder,
        },
        midi::prelude::*,
        pitch::{midi_to_str, str_to_midi, Pitch, Spelling},
        scale::{get_scale_notes, get_scale_pitches, IntoScaleSteps, Scale, ScaleSteps},
        time::Tempo,
    };
}

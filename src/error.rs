// Copyright (c) 2024 Mike Tsao. All rights reserved.

use derive_builder::UninitializedFieldError;
use thiserror::Error;

/// Shorthand for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A value handed to a range mapping fell outside its input range.
    #[error("value {value} is outside of range [{min_value}, {max_value}]")]
    OutOfRange {
        #[allow(missing_docs)]
        value: f64,
        #[allow(missing_docs)]
        min_value: f64,
        #[allow(missing_docs)]
        max_value: f64,
    },

    /// The input range of a mapping is empty, inverted, or not finite.
    #[error("input range [{min_value}, {max_value}] cannot be normalized")]
    DegenerateRange {
        #[allow(missing_docs)]
        min_value: f64,
        #[allow(missing_docs)]
        max_value: f64,
    },

    /// Curve exponents must be finite and positive.
    #[error("power must be finite and greater than zero (got {0})")]
    InvalidPower(f64),

    /// The scale name isn't one of the [Scale](crate::scale::Scale) variants.
    #[error("scale name not recognized: {0:?}")]
    UnknownScale(String),

    /// The string couldn't be parsed as a pitch name like "C#4".
    #[error("not a valid note name: {0:?}")]
    InvalidNoteName(String),

    /// Walking a scale went past the highest or lowest representable pitch.
    #[error("scale from {start} over {octaves} octaves leaves the representable pitch range")]
    PitchOverflow {
        #[allow(missing_docs)]
        start: i16,
        #[allow(missing_docs)]
        octaves: usize,
    },

    /// The pitch exists as a name but not as a MIDI key.
    #[error("pitch {0} is outside the MIDI key range 0..=127")]
    PitchOutOfRange(i16),

    /// Some event or setting can't be represented in a MIDI file.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The MIDI file uses SMPTE timecode, which we don't convert to beats.
    #[error("MIDI files with timecode timing are not supported")]
    UnsupportedTiming,

    #[allow(missing_docs)]
    #[error("MIDI encoding failed: {0}")]
    Midi(#[from] midly::Error),

    #[allow(missing_docs)]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[allow(missing_docs)]
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[allow(missing_docs)]
    #[error(transparent)]
    Builder(#[from] UninitializedFieldError),
}

/// Reasons a set of events won't be written to a MIDI file.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[allow(missing_docs)]
    #[error("note {index}: pitch {value} exceeds 127")]
    Pitch { index: usize, value: u8 },
    #[allow(missing_docs)]
    #[error("note {index}: velocity {value} exceeds 127")]
    Velocity { index: usize, value: u8 },
    #[allow(missing_docs)]
    #[error("note {index}: start time {value} must be finite and non-negative")]
    StartTime { index: usize, value: f64 },
    #[allow(missing_docs)]
    #[error("note {index}: duration {value} must be finite and positive")]
    Duration { index: usize, value: f64 },
    #[allow(missing_docs)]
    #[error("control change {index}: controller number {value} exceeds 127")]
    Controller { index: usize, value: u8 },
    #[allow(missing_docs)]
    #[error("control change {index}: parameter {value} exceeds 127")]
    Parameter { index: usize, value: u8 },
    #[allow(missing_docs)]
    #[error("control change {index}: time {value} must be finite and non-negative")]
    ControlTime { index: usize, value: f64 },
    #[allow(missing_docs)]
    #[error("tempo {0} BPM can't be encoded")]
    Tempo(f64),
    #[allow(missing_docs)]
    #[error("channel {0} exceeds 15")]
    Channel(u8),
    #[allow(missing_docs)]
    #[error("ticks per beat must be between 1 and 32767 (got {0})")]
    TicksPerBeat(u16),
    #[allow(missing_docs)]
    #[error("event at {0} beats is too late to encode")]
    TooLate(f64),
    /// Nothing happens between two events for longer than one delta time can
    /// express (2^28 - 1 ticks).
    #[error("gap from {from} to {to} beats is too long to encode")]
    GapTooLong {
        #[allow(missing_docs)]
        from: f64,
        #[allow(missing_docs)]
        to: f64,
    },
}

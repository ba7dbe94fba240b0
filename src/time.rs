// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::error::ValidationError;
use midly::num::u24;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Beats per minute.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tempo(pub f64);
impl Default for Tempo {
    fn default() -> Self {
        Self(60.0)
    }
}
impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.2} BPM", self.0))
    }
}
impl From<u16> for Tempo {
    fn from(value: u16) -> Self {
        Self(value as f64)
    }
}
impl From<f64> for Tempo {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl Tempo {
    const MICROSECONDS_PER_MINUTE: f64 = 60_000_000.0;
    const MAX_MICROS_PER_BEAT: u32 = 0x00ff_ffff;

    /// A getter for the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }
    /// Beats per second.
    pub fn bps(&self) -> f64 {
        self.0 / 60.0
    }

    /// The tempo as a Set Tempo meta event wants it: microseconds per quarter
    /// note, which must fit in 24 bits. That works out to roughly 3.58 BPM at
    /// the slow end.
    pub fn micros_per_beat(&self) -> Result<u24, ValidationError> {
        if !(self.0.is_finite() && self.0 > 0.0) {
            return Err(ValidationError::Tempo(self.0));
        }
        let micros = (Self::MICROSECONDS_PER_MINUTE / self.0).round();
        if micros < 1.0 || micros > Self::MAX_MICROS_PER_BEAT as f64 {
            return Err(ValidationError::Tempo(self.0));
        }
        Ok(u24::new(micros as u32))
    }

    /// The inverse of [Tempo::micros_per_beat()].
    pub fn from_micros_per_beat(micros: u24) -> Self {
        Self(Self::MICROSECONDS_PER_MINUTE / micros.as_int().max(1) as f64)
    }
}

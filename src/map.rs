// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Maps numbers from one interval to another, optionally along a power curve.
//!
//! The real-valued entry points ([map_value], [map_values], [map_matrix])
//! always return `f64`. The integer entry points ([map_value_to_integer],
//! [map_values_to_integer]) round to the nearest integer, with halves rounded
//! away from zero.
//!
//! Every entry point checks all of its inputs before producing any output, so
//! a single out-of-range element fails the whole call.

use crate::error::{Error, Result};
use derive_builder::Builder;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// A validated mapping from `[min_value, max_value]` onto
/// `[min_result, max_result]`.
///
/// ```
/// use ensnare_sonify::map::RangeMapperBuilder;
///
/// let mapper = RangeMapperBuilder::default()
///     .min_value(0.0)
///     .max_value(10.0)
///     .min_result(0.0)
///     .max_result(100.0)
///     .power(2.0)
///     .build()
///     .unwrap();
/// assert_eq!(mapper.map(5.0).unwrap(), 25.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate", error = "Error"))]
#[serde(rename_all = "kebab-case", try_from = "RangeMapperFields")]
pub struct RangeMapper {
    min_value: f64,
    max_value: f64,
    min_result: f64,
    max_result: f64,
    /// 1.0 is linear. Larger values compress the low end of the output and
    /// expand the high end; values below 1.0 do the opposite.
    #[builder(default = "1.0")]
    power: f64,
}
/// The serialized form of [RangeMapper], checked by [RangeMapper::new_with()]
/// on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RangeMapperFields {
    min_value: f64,
    max_value: f64,
    min_result: f64,
    max_result: f64,
    #[serde(default = "RangeMapperFields::default_power")]
    power: f64,
}
impl RangeMapperFields {
    fn default_power() -> f64 {
        1.0
    }
}
impl TryFrom<RangeMapperFields> for RangeMapper {
    type Error = Error;

    fn try_from(fields: RangeMapperFields) -> Result<Self> {
        Self::new_with(
            fields.min_value,
            fields.max_value,
            fields.min_result,
            fields.max_result,
            fields.power,
        )
    }
}

impl RangeMapperBuilder {
    fn validate(&self) -> Result<()> {
        if let (Some(min_value), Some(max_value)) = (self.min_value, self.max_value) {
            RangeMapper::check_input_range(min_value, max_value)?;
        }
        if let Some(power) = self.power {
            RangeMapper::check_power(power)?;
        }
        Ok(())
    }
}
impl RangeMapper {
    /// Creates a mapper, failing if the input range or power can't produce
    /// finite results.
    pub fn new_with(
        min_value: f64,
        max_value: f64,
        min_result: f64,
        max_result: f64,
        power: f64,
    ) -> Result<Self> {
        Self::check_input_range(min_value, max_value)?;
        Self::check_power(power)?;
        Ok(Self {
            min_value,
            max_value,
            min_result,
            max_result,
            power,
        })
    }

    fn check_input_range(min_value: f64, max_value: f64) -> Result<()> {
        // Also rejects NaN bounds, because every comparison with NaN is false.
        if min_value.is_finite() && max_value.is_finite() && min_value < max_value {
            Ok(())
        } else {
            Err(Error::DegenerateRange {
                min_value,
                max_value,
            })
        }
    }

    fn check_power(power: f64) -> Result<()> {
        if power.is_finite() && power > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidPower(power))
        }
    }

    fn check_value(&self, value: f64) -> Result<()> {
        if (self.min_value..=self.max_value).contains(&value) {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                value,
                min_value: self.min_value,
                max_value: self.max_value,
            })
        }
    }

    // Assumes check_value() has already passed.
    fn apply(&self, value: f64) -> f64 {
        let t = ((value - self.min_value) / (self.max_value - self.min_value)).powf(self.power);
        if t <= 0.0 {
            return self.min_result;
        }
        if t >= 1.0 {
            return self.max_result;
        }

        // t and the span both have a fixed direction, so this never reverses.
        // Rounding can still push it a hair past max_result, hence the clamp.
        let result = self.min_result + t * (self.max_result - self.min_result);
        if self.min_result <= self.max_result {
            result.clamp(self.min_result, self.max_result)
        } else {
            result.clamp(self.max_result, self.min_result)
        }
    }

    /// Maps a single value.
    pub fn map(&self, value: f64) -> Result<f64> {
        self.check_value(value)?;
        Ok(self.apply(value))
    }

    /// Maps every value, preserving length and order.
    pub fn map_all(&self, values: &[f64]) -> Result<Vec<f64>> {
        values.iter().try_for_each(|v| self.check_value(*v))?;
        Ok(values.iter().map(|v| self.apply(*v)).collect())
    }

    /// Maps every element of a matrix, preserving its shape.
    pub fn map_matrix(&self, values: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        values.iter().try_for_each(|v| self.check_value(*v))?;
        Ok(values.map(|v| self.apply(v)))
    }

    /// Maps a single value and rounds the result.
    pub fn map_to_integer(&self, value: f64) -> Result<i64> {
        self.map(value).map(|v| v.round() as i64)
    }

    /// Maps every value and rounds each result.
    pub fn map_all_to_integer(&self, values: &[f64]) -> Result<Vec<i64>> {
        Ok(self
            .map_all(values)?
            .into_iter()
            .map(|v| v.round() as i64)
            .collect())
    }

    #[allow(missing_docs)]
    pub fn input_range(&self) -> (f64, f64) {
        (self.min_value, self.max_value)
    }

    #[allow(missing_docs)]
    pub fn output_range(&self) -> (f64, f64) {
        (self.min_result, self.max_result)
    }

    #[allow(missing_docs)]
    pub fn power(&self) -> f64 {
        self.power
    }
}

/// Maps `value` from `[min_value, max_value]` to `[min_result, max_result]`.
pub fn map_value(
    value: f64,
    min_value: f64,
    max_value: f64,
    min_result: f64,
    max_result: f64,
    power: f64,
) -> Result<f64> {
    RangeMapper::new_with(min_value, max_value, min_result, max_result, power)?.map(value)
}

/// Like [map_value], for a whole sequence.
pub fn map_values(
    values: &[f64],
    min_value: f64,
    max_value: f64,
    min_result: f64,
    max_result: f64,
    power: f64,
) -> Result<Vec<f64>> {
    RangeMapper::new_with(min_value, max_value, min_result, max_result, power)?.map_all(values)
}

/// Like [map_value], for every element of a matrix.
pub fn map_matrix(
    values: &DMatrix<f64>,
    min_value: f64,
    max_value: f64,
    min_result: f64,
    max_result: f64,
    power: f64,
) -> Result<DMatrix<f64>> {
    RangeMapper::new_with(min_value, max_value, min_result, max_result, power)?.map_matrix(values)
}

/// Like [map_value], but the output range is integral and the result is
/// rounded half away from zero.
pub fn map_value_to_integer(
    value: f64,
    min_value: f64,
    max_value: f64,
    min_result: i64,
    max_result: i64,
    power: f64,
) -> Result<i64> {
    RangeMapper::new_with(
        min_value,
        max_value,
        min_result as f64,
        max_result as f64,
        power,
    )?
    .map_to_integer(value)
}

/// Like [map_value_to_integer], for a whole sequence.
pub fn map_values_to_integer(
    values: &[f64],
    min_value: f64,
    max_value: f64,
    min_result: i64,
    max_result: i64,
    power: f64,
) -> Result<Vec<i64>> {
    RangeMapper::new_with(
        min_value,
        max_value,
        min_result as f64,
        max_result as f64,
        power,
    )?
    .map_all_to_integer(values)
}

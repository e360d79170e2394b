//! Face weights and the single parse-and-validate step that produces them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ArgumentError;
use crate::numbers::i64_to_f64;

/// A validated, finite, non-negative face weight.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl Weight {
    pub const ONE: Self = Self(1.0);
    pub const ZERO: Self = Self(0.0);

    /// Validate a raw number. `raw` is only used to describe the rejected input.
    fn validated(value: f64, raw: impl fmt::Display) -> Result<Self, ArgumentError> {
        if value.is_finite() && value >= 0.0 {
            // normalize -0.0
            Ok(Self(value.abs()))
        } else {
            Err(ArgumentError::InvalidWeight {
                value: raw.to_string(),
            })
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Weight {
    type Error = ArgumentError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::validated(value, value)
    }
}

impl TryFrom<i64> for Weight {
    type Error = ArgumentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::validated(i64_to_f64(value), value)
    }
}

impl TryFrom<i32> for Weight {
    type Error = ArgumentError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::validated(f64::from(value), value)
    }
}

impl TryFrom<u32> for Weight {
    type Error = ArgumentError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::validated(f64::from(value), value)
    }
}

impl FromStr for Weight {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .trim()
            .parse::<f64>()
            .map_err(|_| ArgumentError::InvalidWeight {
                value: s.to_string(),
            })?;
        Self::validated(parsed, s)
    }
}

impl TryFrom<&str> for Weight {
    type Error = ArgumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Weight {
    type Error = ArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Unvalidated weight as it appears in configuration: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightValue {
    Number(f64),
    Text(String),
}

impl TryFrom<WeightValue> for Weight {
    type Error = ArgumentError;

    fn try_from(value: WeightValue) -> Result<Self, Self::Error> {
        match value {
            WeightValue::Number(number) => Self::try_from(number),
            WeightValue::Text(text) => text.parse(),
        }
    }
}

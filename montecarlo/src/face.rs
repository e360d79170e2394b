//! Face values a die can show.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Bound shared by every face type: faces are compared, hashed, sorted and printed.
pub trait Face: Clone + Ord + Hash + fmt::Debug + fmt::Display {}

impl<T> Face for T where T: Clone + Ord + Hash + fmt::Debug + fmt::Display {}

/// Dynamically typed face used by configuration files and the CLI.
///
/// Integers sort before text, so a mixed face set still has a total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceValue {
    Int(i64),
    Text(String),
}

impl FaceValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for FaceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for FaceValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FaceValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FaceValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl FromStr for FaceValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        // only tokens that print back unchanged become integers, so `01` and `+1` stay labels
        Ok(match token.parse::<i64>() {
            Ok(value) if value.to_string() == token => Self::Int(value),
            _ => Self::text(token),
        })
    }
}

/// Parse a comma-separated face list such as `1,2,3` or `heads,tails`.
#[must_use]
pub fn parse_face_list(list: &str) -> Vec<FaceValue> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse().ok())
        .collect()
}

//! Error types shared by dice, games and analyzers.

use thiserror::Error;

/// Reasons an argument was rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgumentError {
    #[error("a die needs at least one face")]
    EmptyFaces,
    #[error("die faces are not distinct (duplicate {face})")]
    DuplicateFace { face: String },
    #[error("a game needs at least one die")]
    EmptyDice,
    #[error("die {die} does not match the faces of die 0")]
    MismatchedDice { die: usize },
    #[error("weight must be a non-negative number (got {value})")]
    InvalidWeight { value: String },
    #[error("every face weight is zero, nothing can be rolled")]
    AllWeightsZero,
    #[error("face weights sum past the largest finite number")]
    WeightSumOverflow,
    #[error("roll count must be positive")]
    ZeroRolls,
    #[error("table format must be `wide` or `narrow` (got {value})")]
    UnknownTableFormat { value: String },
    #[error("game has not been played yet")]
    NoPlay,
}

/// Errors raised by dice, games and analyzers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    #[error("face {face} does not exist on this die")]
    UnknownFace { face: String },
}

impl DiceError {
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    #[must_use]
    pub const fn is_unknown_face(&self) -> bool {
        matches!(self, Self::UnknownFace { .. })
    }
}

impl From<std::convert::Infallible> for DiceError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

pub type DiceResult<T> = Result<T, DiceError>;

//! Weighted dice Monte Carlo engine
//!
//! Weighted dice, games that roll several identically-faced dice together, and
//! an analyzer that tabulates jackpots, per-roll face counts, combinations and
//! permutations from a game's most recent play. The crate has no I/O; hosts
//! consume the returned tables directly or through `serde`.

pub mod analyzer;
pub mod die;
pub mod error;
pub mod experiment;
pub mod face;
pub mod game;
pub mod numbers;
pub mod rng;
pub mod table;
pub mod weight;

// Re-export commonly used types
pub use analyzer::{FaceCounts, OutcomeCount, OutcomeCounts, PlayAnalyzer};
pub use die::{FaceWeight, WeightedDie};
pub use error::{ArgumentError, DiceError, DiceResult};
pub use experiment::{ConfigError, DiceSpec, DieSpec, ExperimentConfig, ExperimentReport};
pub use face::{Face, FaceValue, parse_face_list};
pub use game::DiceGame;
pub use rng::RngStreams;
pub use table::{NarrowRow, PlayTable, PlayView, TableFormat};
pub use weight::{Weight, WeightValue};

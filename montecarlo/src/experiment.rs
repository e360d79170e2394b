//! JSON-configured experiments: build a game, play it and summarize the play.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::analyzer::{FaceCounts, OutcomeCounts, PlayAnalyzer};
use crate::die::WeightedDie;
use crate::error::{ArgumentError, DiceError, DiceResult};
use crate::face::{Face, FaceValue};
use crate::game::DiceGame;
use crate::numbers::ratio;
use crate::table::PlayTable;
use crate::weight::WeightValue;

/// Errors raised while loading or running an experiment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("experiment config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// Weight overrides keyed by face label, e.g. `{"6": 3, "heads": "0.5"}`.
pub type WeightOverrides = BTreeMap<String, WeightValue>;

/// Dice in an experiment: a plain count of identical dice, or one entry per die.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiceSpec {
    Count(usize),
    PerDie(Vec<DieSpec>),
}

impl Default for DiceSpec {
    fn default() -> Self {
        Self::Count(2)
    }
}

/// Per-die weight overrides, applied after the shared overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DieSpec {
    #[serde(default)]
    pub weights: WeightOverrides,
}

/// A complete experiment description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    pub faces: Vec<FaceValue>,
    #[serde(default)]
    pub dice: DiceSpec,
    /// Overrides applied to every die.
    #[serde(default)]
    pub weights: WeightOverrides,
    #[serde(default = "ExperimentConfig::default_rolls")]
    pub rolls: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ExperimentConfig {
    const fn default_rolls() -> usize {
        1
    }

    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that the configuration describes a playable game.
    ///
    /// # Errors
    ///
    /// Returns the first dice error the configuration would trigger.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rolls == 0 {
            return Err(DiceError::from(ArgumentError::ZeroRolls).into());
        }
        self.build_game()?;
        Ok(())
    }

    /// Build the configured game without playing it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for bad faces, weights or dice counts and
    /// `UnknownFace` for overrides that name a face not in `faces`.
    pub fn build_game(&self) -> DiceResult<DiceGame<FaceValue>> {
        let per_die: Vec<Option<&WeightOverrides>> = match &self.dice {
            DiceSpec::Count(count) => vec![None; *count],
            DiceSpec::PerDie(specs) => specs.iter().map(|spec| Some(&spec.weights)).collect(),
        };

        let dice = per_die
            .into_iter()
            .map(|overrides| -> DiceResult<WeightedDie<FaceValue>> {
                let mut die = WeightedDie::new(self.faces.iter().cloned())?;
                apply_overrides(&mut die, &self.weights)?;
                if let Some(overrides) = overrides {
                    apply_overrides(&mut die, overrides)?;
                }
                Ok(die)
            })
            .collect::<DiceResult<Vec<_>>>()?;

        match self.seed {
            Some(seed) => DiceGame::with_seed(dice, seed),
            None => DiceGame::new(dice),
        }
    }

    /// Build, play and summarize the experiment.
    ///
    /// # Errors
    ///
    /// Returns any error raised while building or playing the game.
    pub fn run(&self) -> Result<(DiceGame<FaceValue>, ExperimentReport<FaceValue>), ConfigError> {
        let mut game = self.build_game()?;
        game.play(self.rolls)?;
        let report = ExperimentReport::from_game(&game)?;
        Ok((game, report))
    }
}

fn apply_overrides(
    die: &mut WeightedDie<FaceValue>,
    overrides: &WeightOverrides,
) -> DiceResult<()> {
    for (label, weight) in overrides {
        let face = resolve_face(die, label);
        die.set_weight(&face, weight.clone())?;
    }
    Ok(())
}

/// Map an override key to a face: the parsed value when the die has it,
/// otherwise the face that prints as the key.
fn resolve_face(die: &WeightedDie<FaceValue>, label: &str) -> FaceValue {
    let Ok(parsed) = label.parse::<FaceValue>();
    if die.weight_of(&parsed).is_some() {
        return parsed;
    }
    die.faces()
        .iter()
        .find(|face| face.to_string() == label.trim())
        .cloned()
        .unwrap_or(parsed)
}

/// Every statistic of one play, bundled for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport<F> {
    pub seed: u64,
    pub n_dice: usize,
    pub n_rolls: usize,
    pub faces: Vec<F>,
    pub jackpots: usize,
    pub jackpot_rate: f64,
    pub face_totals: Vec<(F, usize)>,
    pub face_counts: FaceCounts<F>,
    pub combinations: OutcomeCounts<F>,
    pub permutations: OutcomeCounts<F>,
    pub play: PlayTable<F>,
}

impl<F: Face> ExperimentReport<F> {
    /// Analyze the most recent play of `game`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the game has not been played.
    pub fn from_game(game: &DiceGame<F>) -> DiceResult<Self> {
        let analyzer = PlayAnalyzer::new(game)?;
        let table = analyzer.table().clone();
        let jackpots = analyzer.jackpot();
        let face_counts = analyzer.face_counts_per_roll();
        Ok(Self {
            seed: game.seed(),
            n_dice: table.n_dice(),
            n_rolls: table.n_rolls(),
            faces: analyzer.faces().to_vec(),
            jackpots,
            jackpot_rate: ratio(jackpots, table.n_rolls()),
            face_totals: face_counts.totals(),
            face_counts,
            combinations: analyzer.combo_count(),
            permutations: analyzer.permutation_count(),
            play: table,
        })
    }
}

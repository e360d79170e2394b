//! Statistics derived from a game's most recent play.
//!
//! The analyzer owns a snapshot of the play, so replaying the game afterwards
//! does not change anything it reports.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{ArgumentError, DiceResult};
use crate::face::Face;
use crate::game::DiceGame;
use crate::table::PlayTable;

/// Per-roll face tallies: one row per roll, one column per declared face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceCounts<F> {
    faces: Vec<F>,
    counts: Vec<Vec<usize>>,
}

impl<F: Face> FaceCounts<F> {
    /// Column labels: the full face set, including faces never rolled.
    #[must_use]
    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    #[must_use]
    pub fn n_rolls(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.counts
    }

    #[must_use]
    pub fn row(&self, roll: usize) -> Option<&[usize]> {
        self.counts.get(roll).map(Vec::as_slice)
    }

    /// Dice showing `face` on `roll`.
    #[must_use]
    pub fn count(&self, roll: usize, face: &F) -> Option<usize> {
        let column = self.faces.iter().position(|candidate| candidate == face)?;
        self.counts.get(roll).map(|row| row[column])
    }

    /// Occurrences of each face summed over every roll, in face order.
    #[must_use]
    pub fn totals(&self) -> Vec<(F, usize)> {
        self.faces
            .iter()
            .enumerate()
            .map(|(column, face)| {
                let total = self.counts.iter().map(|row| row[column]).sum();
                (face.clone(), total)
            })
            .collect()
    }
}

/// One distinct outcome tuple and how many rolls produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeCount<F> {
    pub outcome: Vec<F>,
    pub count: usize,
}

/// Occurrence counts keyed by outcome tuple, sorted by tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts<F> {
    label: &'static str,
    counts: Vec<OutcomeCount<F>>,
}

impl<F: Face> OutcomeCounts<F> {
    fn tally(label: &'static str, tuples: impl Iterator<Item = Vec<F>>) -> Self {
        let mut grouped: BTreeMap<Vec<F>, usize> = BTreeMap::new();
        for tuple in tuples {
            *grouped.entry(tuple).or_default() += 1;
        }
        let counts = grouped
            .into_iter()
            .map(|(outcome, count)| OutcomeCount { outcome, count })
            .collect();
        Self { label, counts }
    }

    /// Name of the key column: `ordered_rolls` for combinations, `rolls` for permutations.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn entries(&self) -> &[OutcomeCount<F>] {
        &self.counts
    }

    #[must_use]
    pub fn get(&self, outcome: &[F]) -> Option<usize> {
        self.counts
            .binary_search_by(|entry| entry.outcome.as_slice().cmp(outcome))
            .ok()
            .map(|idx| self.counts[idx].count)
    }

    /// Number of distinct tuples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts; equals the number of rolls analyzed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }
}

/// Read-only statistics over one snapshot of a game's play.
#[derive(Debug, Clone)]
pub struct PlayAnalyzer<F> {
    table: PlayTable<F>,
    faces: Vec<F>,
    die_ids: Vec<usize>,
}

impl<F: Face> PlayAnalyzer<F> {
    pub const COMBO_LABEL: &'static str = "ordered_rolls";
    pub const PERMUTATION_LABEL: &'static str = "rolls";

    /// Snapshot the most recent play of `game`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the game has not been played yet.
    pub fn new(game: &DiceGame<F>) -> DiceResult<Self> {
        let table = game.last_play().ok_or(ArgumentError::NoPlay)?.clone();
        let die_ids = table.die_ids();
        Ok(Self {
            table,
            faces: game.faces().to_vec(),
            die_ids,
        })
    }

    #[must_use]
    pub const fn table(&self) -> &PlayTable<F> {
        &self.table
    }

    #[must_use]
    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    #[must_use]
    pub fn die_ids(&self) -> &[usize] {
        &self.die_ids
    }

    /// Rolls where every die shows the same face.
    #[must_use]
    pub fn jackpot(&self) -> usize {
        self.table
            .rows()
            .iter()
            .filter(|row| row.iter().collect::<HashSet<_>>().len() == 1)
            .count()
    }

    /// How many dice showed each face on each roll, zero-filled for unrolled faces.
    #[must_use]
    pub fn face_counts_per_roll(&self) -> FaceCounts<F> {
        let column_of: HashMap<&F, usize> = self
            .faces
            .iter()
            .enumerate()
            .map(|(column, face)| (face, column))
            .collect();

        // Cross product of every roll with every face, all zero until joined.
        let mut counts = vec![vec![0_usize; self.faces.len()]; self.table.n_rolls()];

        // Left join of observed (roll, die, outcome) triples onto the grid.
        for cell in self.table.to_narrow() {
            if let Some(&column) = column_of.get(&cell.outcome) {
                counts[cell.roll][column] += 1;
            }
        }

        FaceCounts {
            faces: self.faces.clone(),
            counts,
        }
    }

    /// Order-independent outcome counts: each roll is sorted before grouping.
    #[must_use]
    pub fn combo_count(&self) -> OutcomeCounts<F> {
        OutcomeCounts::tally(
            Self::COMBO_LABEL,
            self.table.rows().iter().map(|row| {
                let mut sorted = row.clone();
                sorted.sort();
                sorted
            }),
        )
    }

    /// Order-dependent outcome counts: rolls are grouped in die order.
    #[must_use]
    pub fn permutation_count(&self) -> OutcomeCounts<F> {
        OutcomeCounts::tally(Self::PERMUTATION_LABEL, self.table.rows().iter().cloned())
    }
}

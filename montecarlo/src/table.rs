//! Play result tables in wide and narrow layouts.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{ArgumentError, DiceError};

/// Requested layout for [`crate::DiceGame::most_recent_play`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    #[default]
    Wide,
    Narrow,
}

impl FromStr for TableFormat {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wide" => Ok(Self::Wide),
            "narrow" => Ok(Self::Narrow),
            other => Err(ArgumentError::UnknownTableFormat {
                value: other.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wide => "wide",
            Self::Narrow => "narrow",
        })
    }
}

/// Wide play table: one row per roll, one column per die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayTable<F> {
    n_dice: usize,
    rows: Vec<Vec<F>>,
}

impl<F: Clone> PlayTable<F> {
    /// Build the wide table from per-die outcome columns of equal length.
    #[must_use]
    pub(crate) fn from_columns(columns: Vec<Vec<F>>) -> Self {
        let n_dice = columns.len();
        let n_rolls = columns.first().map_or(0, Vec::len);
        let rows = (0..n_rolls)
            .map(|roll| columns.iter().map(|column| column[roll].clone()).collect())
            .collect();
        Self { n_dice, rows }
    }

    /// Build a table from explicit rows. Every row must have `n_dice` cells.
    #[must_use]
    pub fn from_rows(n_dice: usize, rows: Vec<Vec<F>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == n_dice));
        Self { n_dice, rows }
    }

    #[must_use]
    pub fn n_rolls(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn n_dice(&self) -> usize {
        self.n_dice
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<F>] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, roll: usize) -> Option<&[F]> {
        self.rows.get(roll).map(Vec::as_slice)
    }

    /// Outcomes of one die across every roll.
    #[must_use]
    pub fn column(&self, die: usize) -> Option<Vec<F>> {
        (die < self.n_dice).then(|| self.rows.iter().map(|row| row[die].clone()).collect())
    }

    /// Die column identifiers in list order.
    #[must_use]
    pub fn die_ids(&self) -> Vec<usize> {
        (0..self.n_dice).collect()
    }

    /// Reshape into one row per (roll, die) cell, ordered by roll then die.
    #[must_use]
    pub fn to_narrow(&self) -> Vec<NarrowRow<F>> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(roll, row)| {
                row.iter().enumerate().map(move |(die, outcome)| NarrowRow {
                    roll,
                    die,
                    outcome: outcome.clone(),
                })
            })
            .collect()
    }
}

/// One (roll, die) cell of a play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrowRow<F> {
    pub roll: usize,
    pub die: usize,
    pub outcome: F,
}

/// Most recent play in the requested layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", content = "rows", rename_all = "snake_case")]
pub enum PlayView<'a, F> {
    Wide(&'a PlayTable<F>),
    Narrow(Vec<NarrowRow<F>>),
}

impl<F> PlayView<'_, F> {
    /// Number of rows in this layout.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Wide(table) => table.rows.len(),
            Self::Narrow(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

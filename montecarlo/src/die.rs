//! Weighted dice.

use log::{debug, trace};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::Serialize;
use std::collections::HashSet;

use crate::error::{ArgumentError, DiceError, DiceResult};
use crate::face::Face;
use crate::weight::Weight;

/// One row of [`WeightedDie::current_state`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceWeight<F> {
    pub face: F,
    pub weight: Weight,
}

/// A die with a fixed set of distinct faces, each carrying a mutable weight.
///
/// A face is drawn with probability `weight / sum(weights)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedDie<F> {
    faces: Vec<F>,
    weights: Vec<Weight>,
}

impl<F: Face> WeightedDie<F> {
    /// Create a die where every face has weight 1.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `faces` is empty or contains duplicates.
    pub fn new(faces: impl IntoIterator<Item = F>) -> DiceResult<Self> {
        let faces: Vec<F> = faces.into_iter().collect();
        if faces.is_empty() {
            return Err(ArgumentError::EmptyFaces.into());
        }
        let mut seen = HashSet::with_capacity(faces.len());
        if let Some(dup) = faces.iter().find(|face| !seen.insert(*face)) {
            return Err(ArgumentError::DuplicateFace {
                face: dup.to_string(),
            }
            .into());
        }
        let weights = vec![Weight::ONE; faces.len()];
        Ok(Self { faces, weights })
    }

    /// Faces in construction order.
    #[must_use]
    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    #[must_use]
    pub fn n_sides(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn weight_of(&self, face: &F) -> Option<Weight> {
        self.position(face).map(|idx| self.weights[idx])
    }

    /// Replace the weight of `face`.
    ///
    /// Accepts anything convertible into a [`Weight`]: integers, floats,
    /// numeric strings or an already validated weight.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for negative or non-numeric weights and
    /// `UnknownFace` when `face` is not on this die. The weight table is left
    /// untouched on failure.
    pub fn set_weight<W>(&mut self, face: &F, weight: W) -> DiceResult<()>
    where
        W: TryInto<Weight>,
        DiceError: From<W::Error>,
    {
        let weight = weight.try_into()?;
        let idx = self.position(face).ok_or_else(|| DiceError::UnknownFace {
            face: face.to_string(),
        })?;
        debug!("face {face} weight {} -> {weight}", self.weights[idx]);
        self.weights[idx] = weight;
        Ok(())
    }

    /// Roll the die `n` times using the thread-local generator.
    ///
    /// # Errors
    ///
    /// See [`WeightedDie::roll_with_rng`].
    pub fn roll(&self, n: usize) -> DiceResult<Vec<F>> {
        self.roll_with_rng(n, &mut rand::thread_rng())
    }

    /// Roll the die `n` times, drawing with replacement from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `n` is zero, every weight is zero or the
    /// weights sum to infinity.
    pub fn roll_with_rng<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> DiceResult<Vec<F>> {
        if n == 0 {
            return Err(ArgumentError::ZeroRolls.into());
        }
        let dist = self.distribution()?;
        let draws: Vec<F> = (0..n)
            .map(|_| self.faces[dist.sample(rng)].clone())
            .collect();
        trace!("rolled {n} times: {draws:?}");
        Ok(draws)
    }

    /// Snapshot of every face with its current weight.
    #[must_use]
    pub fn current_state(&self) -> Vec<FaceWeight<F>> {
        self.faces
            .iter()
            .zip(&self.weights)
            .map(|(face, weight)| FaceWeight {
                face: face.clone(),
                weight: *weight,
            })
            .collect()
    }

    /// True when both dice carry the same face values, in any order.
    #[must_use]
    pub fn same_faces(&self, other: &Self) -> bool {
        if self.faces.len() != other.faces.len() {
            return false;
        }
        let mut ours: Vec<&F> = self.faces.iter().collect();
        let mut theirs: Vec<&F> = other.faces.iter().collect();
        ours.sort();
        theirs.sort();
        ours == theirs
    }

    fn position(&self, face: &F) -> Option<usize> {
        self.faces.iter().position(|candidate| candidate == face)
    }

    fn distribution(&self) -> DiceResult<WeightedIndex<f64>> {
        if self.weights.iter().all(|weight| weight.is_zero()) {
            return Err(ArgumentError::AllWeightsZero.into());
        }
        let total: f64 = self.weights.iter().map(|weight| weight.get()).sum();
        if !total.is_finite() {
            return Err(ArgumentError::WeightSumOverflow.into());
        }
        WeightedIndex::new(self.weights.iter().map(|weight| weight.get())).map_err(|_| {
            ArgumentError::AllWeightsZero.into()
        })
    }
}

//! Validated supervised datasets, feature scaling, and the seeded split.
//!
//! A [`Dataset`] couples a feature matrix with strictly one-hot targets and
//! is immutable once constructed. Feature scaling is a [`Normalizer`] whose
//! per-column divisors are captured exactly once, on the combined data
//! before splitting, and reused verbatim for every partition.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{Error, Matrix, Result};

/// A supervised dataset: features (X) and one-hot targets (Y).
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Matrix,
    targets: Matrix,
}

impl Dataset {
    /// Build a dataset from a feature matrix and a one-hot target matrix.
    ///
    /// Validates that both matrices have the same number of rows and that
    /// every target row is strictly one-hot: each entry exactly 0.0 or 1.0,
    /// with exactly one 1 per row.
    pub fn from_matrices(features: Matrix, targets: Matrix) -> Result<Self> {
        if features.rows() != targets.rows() {
            return Err(Error::InvalidData(format!(
                "features have {} rows, targets have {}",
                features.rows(),
                targets.rows()
            )));
        }

        for r in 0..targets.rows() {
            let row = targets.row(r);
            let mut ones = 0_usize;
            for &v in row {
                if v == 1.0 {
                    ones += 1;
                } else if v != 0.0 {
                    return Err(Error::InvalidData(format!(
                        "target row {r} has entry {v}, expected 0 or 1"
                    )));
                }
            }
            if ones != 1 {
                return Err(Error::InvalidData(format!(
                    "target row {r} has {ones} ones, expected exactly 1"
                )));
            }
        }

        Ok(Self { features, targets })
    }

    /// Build a dataset from per-sample rows.
    pub fn from_rows(features: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<Self> {
        if features.len() != targets.len() {
            return Err(Error::InvalidData(format!(
                "features/targets length mismatch: {} vs {}",
                features.len(),
                targets.len()
            )));
        }
        Self::from_matrices(Matrix::from_rows(features)?, Matrix::from_rows(targets)?)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.rows() == 0
    }

    #[inline]
    pub fn feature_dim(&self) -> usize {
        self.features.cols()
    }

    #[inline]
    pub fn class_count(&self) -> usize {
        self.targets.cols()
    }

    #[inline]
    pub fn features(&self) -> &Matrix {
        &self.features
    }

    #[inline]
    pub fn targets(&self) -> &Matrix {
        &self.targets
    }

    /// The class index of the `row`-th sample (position of the 1 in its
    /// one-hot target).
    ///
    /// Panics if `row >= len`.
    pub fn label_of(&self, row: usize) -> usize {
        self.targets
            .row(row)
            .iter()
            .position(|&v| v == 1.0)
            .expect("target rows are validated one-hot")
    }

    /// All class labels, in row order.
    pub fn labels(&self) -> Vec<usize> {
        (0..self.len()).map(|r| self.label_of(r)).collect()
    }

    /// Partition into train/test by a seeded random sample.
    ///
    /// Row order is shuffled with `StdRng::seed_from_u64(seed)`, the first
    /// `train_fraction` of rows become the training partition, the rest the
    /// test partition. The same seed always yields the same split.
    pub fn split_with_seed(&self, train_fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(train_fraction.is_finite() && 0.0 < train_fraction && train_fraction < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "train_fraction must be in (0, 1), got {train_fraction}"
            )));
        }

        let mut indices: Vec<usize> = (0..self.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train_len = (self.len() as f64 * train_fraction).round() as usize;
        if train_len == 0 || train_len == self.len() {
            return Err(Error::InvalidConfig(format!(
                "split of {} rows at fraction {train_fraction} leaves a partition empty",
                self.len()
            )));
        }

        let gather = |idx: &[usize]| -> Result<Dataset> {
            let features: Vec<Vec<f64>> =
                idx.iter().map(|&i| self.features.row(i).to_vec()).collect();
            let targets: Vec<Vec<f64>> =
                idx.iter().map(|&i| self.targets.row(i).to_vec()).collect();
            Dataset::from_matrices(Matrix::from_rows(&features)?, Matrix::from_rows(&targets)?)
        };

        let train = gather(&indices[..train_len])?;
        let test = gather(&indices[train_len..])?;
        Ok((train, test))
    }
}

/// Per-column max scaling.
///
/// Each feature column is divided by its maximum observed value. The
/// divisors are captured once by [`Normalizer::fit`], which should run on the full
/// combined dataset before splitting, and never recomputed.
#[derive(Debug, Clone)]
pub struct Normalizer {
    divisors: Vec<f64>,
}

impl Normalizer {
    /// Capture each column's maximum as its divisor.
    ///
    /// Errors if any column maximum is zero, negative, or non-finite, since
    /// dividing by it would not scale into `[0, 1]`.
    pub fn fit(features: &Matrix) -> Result<Self> {
        let mut divisors = vec![f64::NEG_INFINITY; features.cols()];
        for r in 0..features.rows() {
            for (d, &v) in divisors.iter_mut().zip(features.row(r)) {
                if *d < v {
                    *d = v;
                }
            }
        }
        for (c, &d) in divisors.iter().enumerate() {
            if !(d.is_finite() && d > 0.0) {
                return Err(Error::InvalidData(format!(
                    "column {c} has max {d}, cannot be used as a divisor"
                )));
            }
        }
        Ok(Self { divisors })
    }

    #[inline]
    pub fn divisors(&self) -> &[f64] {
        &self.divisors
    }

    /// Divide each column by its captured divisor.
    ///
    /// Errors if `features` does not have one column per divisor.
    pub fn apply(&self, features: &Matrix) -> Result<Matrix> {
        if features.cols() != self.divisors.len() {
            return Err(Error::InvalidData(format!(
                "features have {} columns, normalizer has {} divisors",
                features.cols(),
                self.divisors.len()
            )));
        }

        let mut out = features.clone();
        for r in 0..features.rows() {
            for (c, d) in self.divisors.iter().enumerate() {
                out[(r, c)] /= d;
            }
        }
        Ok(out)
    }
}

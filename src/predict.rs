//! Turning network outputs into class decisions.
//!
//! The decision rule mirrors the output encoding: each entry of an output row
//! is rounded to the nearest integer, and a row is assigned to a class only
//! when exactly one column rounds to 1. Every other pattern (all zeros, or
//! several ones) is an ambiguous row and stays [`Prediction::Unclassified`]
//! rather than being forced into a class.
//!
//! Rounding uses `f64::round` (half away from zero); a row of exact 0.5s
//! therefore rounds to all ones, which is still unclassified.

use crate::{Error, Matrix, Mlp, Result};

/// The decision for one output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    /// Exactly one output column rounded to 1; its index is the class.
    Class(usize),
    /// Zero or more than one column rounded to 1.
    Unclassified,
}

impl Prediction {
    #[inline]
    pub fn class(self) -> Option<usize> {
        match self {
            Prediction::Class(c) => Some(c),
            Prediction::Unclassified => None,
        }
    }
}

/// Classify one output row by the rounding rule.
pub fn classify_row(row: &[f64]) -> Prediction {
    let mut hit = None;
    for (j, &v) in row.iter().enumerate() {
        if v.round() == 1.0 {
            match hit {
                None => hit = Some(j),
                Some(_) => return Prediction::Unclassified,
            }
        }
    }
    match hit {
        Some(j) => Prediction::Class(j),
        None => Prediction::Unclassified,
    }
}

/// Classify every row of an output matrix.
pub fn classify_rows(output: &Matrix) -> Vec<Prediction> {
    (0..output.rows())
        .map(|r| classify_row(output.row(r)))
        .collect()
}

impl Mlp {
    /// Run the forward pass on `features` and classify each row.
    ///
    /// `features` must be normalized with the same divisors as the training
    /// data.
    pub fn classify(&self, features: &Matrix) -> Result<Vec<Prediction>> {
        if features.cols() != self.input_dim() {
            return Err(Error::InvalidData(format!(
                "features have {} columns, model input_dim is {}",
                features.cols(),
                self.input_dim()
            )));
        }
        Ok(classify_rows(&self.forward(features).output))
    }
}

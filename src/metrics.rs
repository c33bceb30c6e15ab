//! Evaluation helpers.
//!
//! Metrics never participate in training; they score a finished model's
//! decisions against true class labels.

use crate::Prediction;

/// Fraction of rows whose predicted class matches the label.
///
/// Unclassified rows count as incorrect.
///
/// Shape contract: `predictions.len() == labels.len()` and both non-empty.
pub fn accuracy(predictions: &[Prediction], labels: &[usize]) -> f64 {
    assert_eq!(
        predictions.len(),
        labels.len(),
        "got {} predictions for {} labels",
        predictions.len(),
        labels.len()
    );
    assert!(!predictions.is_empty(), "cannot score zero predictions");

    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(p, &l)| p.class() == Some(l))
        .count();
    correct as f64 / predictions.len() as f64
}

/// Fraction of rows the rounding rule left without a class.
pub fn unclassified_rate(predictions: &[Prediction]) -> f64 {
    assert!(!predictions.is_empty(), "cannot score zero predictions");
    let unclassified = predictions
        .iter()
        .filter(|p| **p == Prediction::Unclassified)
        .count();
    unclassified as f64 / predictions.len() as f64
}

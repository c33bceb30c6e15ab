//! Sum-of-squared-error loss.
//!
//! The cost over a batch is `C = 0.5 * Σ (pred_ij - target_ij)^2`, summed
//! over every entry, not averaged. The 0.5 factor cancels against the power
//! rule so the gradient is simply `dC/d(pred) = pred - target`; both
//! conventions must be kept in sync or the gradient check breaks.

use crate::Matrix;

/// Sum-of-squared-error cost: `0.5 * Σ (pred - target)^2`.
///
/// Shape contract: `pred` and `target` have the same shape.
#[inline]
pub fn sse(pred: &Matrix, target: &Matrix) -> f64 {
    assert_eq!(
        (pred.rows(), pred.cols()),
        (target.rows(), target.cols()),
        "sse: pred is {}x{}, target is {}x{}",
        pred.rows(),
        pred.cols(),
        target.rows(),
        target.cols()
    );

    let mut sum_sq = 0.0_f64;
    for (&p, &t) in pred.as_slice().iter().zip(target.as_slice()) {
        let diff = p - t;
        sum_sq = diff.mul_add(diff, sum_sq);
    }
    0.5 * sum_sq
}

/// Cost + gradient w.r.t `pred` in one pass.
///
/// Returns the cost and the matrix `dC/d(pred) = pred - target`.
///
/// Shape contract: `pred` and `target` have the same shape.
#[inline]
pub fn sse_backward(pred: &Matrix, target: &Matrix) -> (f64, Matrix) {
    let d_pred = pred.sub(target);
    let mut sum_sq = 0.0_f64;
    for &d in d_pred.as_slice() {
        sum_sq = d.mul_add(d, sum_sq);
    }
    (0.5 * sum_sq, d_pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_known_value() {
        let pred = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.5, 0.5]]).unwrap();
        let target = Matrix::from_rows(&[vec![0.0, 0.0], vec![0.5, 1.0]]).unwrap();
        // 0.5 * (1 + 0 + 0 + 0.25) = 0.625
        assert!((sse(&pred, &target) - 0.625).abs() < 1e-12);
    }

    #[test]
    fn sse_is_zero_on_exact_match() {
        let pred = Matrix::from_rows(&[vec![0.25, 0.75]]).unwrap();
        assert_eq!(sse(&pred, &pred.clone()), 0.0);
    }

    #[test]
    fn backward_returns_residual_and_same_cost() {
        let pred = Matrix::from_rows(&[vec![0.9, 0.1, 0.2]]).unwrap();
        let target = Matrix::from_rows(&[vec![1.0, 0.0, 0.0]]).unwrap();

        let (cost, d_pred) = sse_backward(&pred, &target);
        assert!((cost - sse(&pred, &target)).abs() < 1e-12);
        assert!((d_pred[(0, 0)] - -0.1).abs() < 1e-12);
        assert!((d_pred[(0, 1)] - 0.1).abs() < 1e-12);
        assert!((d_pred[(0, 2)] - 0.2).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn sse_panics_on_shape_mismatch() {
        let pred = Matrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let target = Matrix::from_rows(&[vec![1.0, 0.0, 0.0]]).unwrap();
        let _ = sse(&pred, &target);
    }
}

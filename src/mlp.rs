//! The two-layer network: forward pass, backprop, and the descent update.

use crate::activation::{sigmoid, sigmoid_grad_from_output};
use crate::{Error, Matrix, Result};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A feedforward network with one hidden layer and sigmoid activations on
/// both layers.
///
/// Parameter layout:
/// - `w1` has shape `(input_dim, hidden_dim)`: entry `(i, j)` connects input
///   feature `i` to hidden unit `j`.
/// - `w2` has shape `(hidden_dim, output_dim)`.
/// - `b1` / `b2` are broadcast across all rows of a batch.
///
/// The four parameters are owned exclusively by this struct and only ever
/// mutated by [`Mlp::gradient_step`] (or direct `*_mut` access in tests).
#[derive(Debug, Clone)]
pub struct Mlp {
    w1: Matrix,
    b1: Vec<f64>,
    w2: Matrix,
    b2: Vec<f64>,
}

/// Activations cached by [`Mlp::forward`].
///
/// Only post-activation values are kept; the sigmoid derivative is computed
/// from its output, so pre-activation buffers are never needed for backprop.
#[derive(Debug, Clone)]
pub struct Forward {
    /// Hidden-layer activations, shape `(batch, hidden_dim)`.
    pub hidden: Matrix,
    /// Network output, shape `(batch, output_dim)`.
    pub output: Matrix,
}

/// Cost gradients for every parameter of an [`Mlp`], same shapes as the
/// parameters themselves.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub d_w1: Matrix,
    pub d_b1: Vec<f64>,
    pub d_w2: Matrix,
    pub d_b2: Vec<f64>,
}

impl Mlp {
    /// Create a network with all parameters drawn independently from a
    /// uniform `[0, 1)` distribution, using a deterministic seed.
    pub fn new_with_seed(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(input_dim, hidden_dim, output_dim, &mut rng)
    }

    /// Create a network with uniform `[0, 1)` parameters from the provided RNG.
    ///
    /// Draw order is fixed: all of `w1` (row-major), then `b1`, then all of
    /// `w2`, then `b2`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if input_dim == 0 || hidden_dim == 0 || output_dim == 0 {
            return Err(Error::InvalidConfig(
                "all layer dimensions must be > 0".to_owned(),
            ));
        }

        let mut draw = |n: usize| -> Vec<f64> { (0..n).map(|_| rng.gen::<f64>()).collect() };
        let w1 = Matrix::from_flat(draw(input_dim * hidden_dim), input_dim, hidden_dim)?;
        let b1 = draw(hidden_dim);
        let w2 = Matrix::from_flat(draw(hidden_dim * output_dim), hidden_dim, output_dim)?;
        let b2 = draw(output_dim);

        Ok(Self { w1, b1, w2, b2 })
    }

    /// Build a network from explicit parameters.
    ///
    /// Validates that the shapes agree: `w1` is `(input, hidden)`, `b1` has
    /// length `hidden`, `w2` is `(hidden, output)`, `b2` has length `output`.
    pub fn from_params(w1: Matrix, b1: Vec<f64>, w2: Matrix, b2: Vec<f64>) -> Result<Self> {
        if b1.len() != w1.cols() {
            return Err(Error::InvalidConfig(format!(
                "b1 len {} does not match w1 columns {}",
                b1.len(),
                w1.cols()
            )));
        }
        if w2.rows() != w1.cols() {
            return Err(Error::InvalidConfig(format!(
                "w2 rows {} do not match w1 columns {}",
                w2.rows(),
                w1.cols()
            )));
        }
        if b2.len() != w2.cols() {
            return Err(Error::InvalidConfig(format!(
                "b2 len {} does not match w2 columns {}",
                b2.len(),
                w2.cols()
            )));
        }
        Ok(Self { w1, b1, w2, b2 })
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.w1.rows()
    }

    #[inline]
    pub fn hidden_dim(&self) -> usize {
        self.w1.cols()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.w2.cols()
    }

    #[inline]
    pub fn w1(&self) -> &Matrix {
        &self.w1
    }

    #[inline]
    pub fn b1(&self) -> &[f64] {
        &self.b1
    }

    #[inline]
    pub fn w2(&self) -> &Matrix {
        &self.w2
    }

    #[inline]
    pub fn b2(&self) -> &[f64] {
        &self.b2
    }

    #[inline]
    pub fn w1_mut(&mut self) -> &mut Matrix {
        &mut self.w1
    }

    #[inline]
    pub fn b1_mut(&mut self) -> &mut [f64] {
        &mut self.b1
    }

    #[inline]
    pub fn w2_mut(&mut self) -> &mut Matrix {
        &mut self.w2
    }

    #[inline]
    pub fn b2_mut(&mut self) -> &mut [f64] {
        &mut self.b2
    }

    /// Forward pass over a whole batch.
    ///
    /// Computes `hidden = sigmoid(X·w1 + b1)` and
    /// `output = sigmoid(hidden·w2 + b2)`, with the bias vectors broadcast
    /// across rows. Pure: no state is modified.
    ///
    /// Shape contract: `x.cols() == self.input_dim()`.
    pub fn forward(&self, x: &Matrix) -> Forward {
        assert_eq!(
            x.cols(),
            self.input_dim(),
            "input has {} columns, model input_dim is {}",
            x.cols(),
            self.input_dim()
        );

        let hidden = x.matmul(&self.w1).add_row_broadcast(&self.b1).map(sigmoid);
        let output = hidden
            .matmul(&self.w2)
            .add_row_broadcast(&self.b2)
            .map(sigmoid);
        Forward { hidden, output }
    }

    /// Backward pass: exact reverse-mode gradients of the summed
    /// squared-error cost `0.5 * Σ (output - targets)^2`.
    ///
    /// With `σ'` computed from cached activations:
    /// - `δ_out = (output - targets) ⊙ output(1 - output)`
    /// - `d_w2 = hiddenᵗ · δ_out`, `d_b2 = column-sums(δ_out)`
    /// - `δ_hid = (δ_out · w2ᵗ) ⊙ hidden(1 - hidden)`
    /// - `d_w1 = xᵗ · δ_hid`, `d_b1 = column-sums(δ_hid)`
    ///
    /// Shape contract: `x` and `targets` have `fwd.hidden.rows()` rows,
    /// `x.cols() == input_dim`, `targets.cols() == output_dim`, and `fwd` was
    /// produced by [`Mlp::forward`] on `x` with the current parameters.
    pub fn backward(&self, x: &Matrix, targets: &Matrix, fwd: &Forward) -> Gradients {
        assert_eq!(
            x.cols(),
            self.input_dim(),
            "input has {} columns, model input_dim is {}",
            x.cols(),
            self.input_dim()
        );
        assert_eq!(
            (targets.rows(), targets.cols()),
            (fwd.output.rows(), fwd.output.cols()),
            "targets are {}x{}, output is {}x{}",
            targets.rows(),
            targets.cols(),
            fwd.output.rows(),
            fwd.output.cols()
        );
        assert_eq!(
            x.rows(),
            fwd.hidden.rows(),
            "input has {} rows, cached activations have {}",
            x.rows(),
            fwd.hidden.rows()
        );

        let delta_out = fwd
            .output
            .sub(targets)
            .hadamard(&fwd.output.map(sigmoid_grad_from_output));
        let d_w2 = fwd.hidden.t_matmul(&delta_out);
        let d_b2 = delta_out.col_sums();

        let delta_hid = delta_out
            .matmul_t(&self.w2)
            .hadamard(&fwd.hidden.map(sigmoid_grad_from_output));
        let d_w1 = x.t_matmul(&delta_hid);
        let d_b1 = delta_hid.col_sums();

        Gradients {
            d_w1,
            d_b1,
            d_w2,
            d_b2,
        }
    }

    /// Fixed-learning-rate descent update: `P ← P - lr * dC/dP` for all four
    /// parameters.
    pub fn gradient_step(&mut self, grads: &Gradients, lr: f64) {
        assert!(
            lr.is_finite() && lr > 0.0,
            "learning rate must be finite and > 0"
        );

        self.w1.sub_scaled_assign(&grads.d_w1, lr);
        self.w2.sub_scaled_assign(&grads.d_w2, lr);
        assert_eq!(self.b1.len(), grads.d_b1.len());
        assert_eq!(self.b2.len(), grads.d_b2.len());
        for (b, &g) in self.b1.iter_mut().zip(&grads.d_b1) {
            *b -= lr * g;
        }
        for (b, &g) in self.b2.iter_mut().zip(&grads.d_b2) {
            *b -= lr * g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss;

    fn fixture() -> (Mlp, Matrix, Matrix) {
        let mlp = Mlp::new_with_seed(4, 3, 3, 1).unwrap();
        let x = Matrix::from_rows(&[
            vec![0.6, 0.4, 0.2, 0.1],
            vec![0.7, 0.3, 0.6, 0.5],
            vec![0.8, 0.4, 0.9, 0.8],
        ])
        .unwrap();
        let y = Matrix::from_rows(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        (mlp, x, y)
    }

    fn assert_close(analytic: f64, numeric: f64, abs_tol: f64, rel_tol: f64) {
        let diff = (analytic - numeric).abs();
        let scale = analytic.abs().max(numeric.abs()).max(1.0);
        assert!(
            diff <= abs_tol || diff / scale <= rel_tol,
            "analytic={analytic} numeric={numeric} diff={diff}"
        );
    }

    #[test]
    fn seeded_init_is_deterministic_and_uniform() {
        let a = Mlp::new_with_seed(4, 3, 3, 1).unwrap();
        let b = Mlp::new_with_seed(4, 3, 3, 1).unwrap();
        assert_eq!(a.w1(), b.w1());
        assert_eq!(a.b1(), b.b1());
        assert_eq!(a.w2(), b.w2());
        assert_eq!(a.b2(), b.b2());

        for &v in a
            .w1()
            .as_slice()
            .iter()
            .chain(a.w2().as_slice())
            .chain(a.b1())
            .chain(a.b2())
        {
            assert!((0.0..1.0).contains(&v), "draw {v} outside [0, 1)");
        }
    }

    #[test]
    fn forward_produces_batch_by_layer_shapes() {
        let (mlp, x, _) = fixture();
        let fwd = mlp.forward(&x);
        assert_eq!((fwd.hidden.rows(), fwd.hidden.cols()), (3, 3));
        assert_eq!((fwd.output.rows(), fwd.output.cols()), (3, 3));

        for &v in fwd.output.as_slice() {
            assert!(v > 0.0 && v < 1.0, "sigmoid output {v} outside (0, 1)");
        }
    }

    #[test]
    fn gradients_match_parameter_shapes() {
        let (mlp, x, y) = fixture();
        let fwd = mlp.forward(&x);
        let grads = mlp.backward(&x, &y, &fwd);

        assert_eq!((grads.d_w1.rows(), grads.d_w1.cols()), (4, 3));
        assert_eq!(grads.d_b1.len(), 3);
        assert_eq!((grads.d_w2.rows(), grads.d_w2.cols()), (3, 3));
        assert_eq!(grads.d_b2.len(), 3);
    }

    #[test]
    fn backward_matches_central_difference_gradients() {
        let (mut mlp, x, y) = fixture();
        let fwd = mlp.forward(&x);
        let grads = mlp.backward(&x, &y, &fwd);

        let eps = 1e-4_f64;
        let abs_tol = 1e-7_f64;
        let rel_tol = 1e-4_f64;

        let cost = |mlp: &Mlp| loss::sse(&mlp.forward(&x).output, &y);

        // w1: every one of the input_dim * hidden_dim entries.
        for r in 0..mlp.input_dim() {
            for c in 0..mlp.hidden_dim() {
                let orig = mlp.w1()[(r, c)];
                mlp.w1_mut()[(r, c)] = orig + eps;
                let plus = cost(&mlp);
                mlp.w1_mut()[(r, c)] = orig - eps;
                let minus = cost(&mlp);
                mlp.w1_mut()[(r, c)] = orig;

                let numeric = (plus - minus) / (2.0 * eps);
                assert_close(grads.d_w1[(r, c)], numeric, abs_tol, rel_tol);
            }
        }

        // w2.
        for r in 0..mlp.hidden_dim() {
            for c in 0..mlp.output_dim() {
                let orig = mlp.w2()[(r, c)];
                mlp.w2_mut()[(r, c)] = orig + eps;
                let plus = cost(&mlp);
                mlp.w2_mut()[(r, c)] = orig - eps;
                let minus = cost(&mlp);
                mlp.w2_mut()[(r, c)] = orig;

                let numeric = (plus - minus) / (2.0 * eps);
                assert_close(grads.d_w2[(r, c)], numeric, abs_tol, rel_tol);
            }
        }

        // b1.
        for i in 0..mlp.hidden_dim() {
            let orig = mlp.b1()[i];
            mlp.b1_mut()[i] = orig + eps;
            let plus = cost(&mlp);
            mlp.b1_mut()[i] = orig - eps;
            let minus = cost(&mlp);
            mlp.b1_mut()[i] = orig;

            let numeric = (plus - minus) / (2.0 * eps);
            assert_close(grads.d_b1[i], numeric, abs_tol, rel_tol);
        }

        // b2.
        for i in 0..mlp.output_dim() {
            let orig = mlp.b2()[i];
            mlp.b2_mut()[i] = orig + eps;
            let plus = cost(&mlp);
            mlp.b2_mut()[i] = orig - eps;
            let minus = cost(&mlp);
            mlp.b2_mut()[i] = orig;

            let numeric = (plus - minus) / (2.0 * eps);
            assert_close(grads.d_b2[i], numeric, abs_tol, rel_tol);
        }
    }

    #[test]
    fn gradient_step_moves_parameters_against_the_gradient() {
        let (mut mlp, x, y) = fixture();
        let fwd = mlp.forward(&x);
        let before = loss::sse(&fwd.output, &y);

        let grads = mlp.backward(&x, &y, &fwd);
        mlp.gradient_step(&grads, 0.01);

        let after = loss::sse(&mlp.forward(&x).output, &y);
        assert!(after < before, "cost went from {before} to {after}");
    }

    #[test]
    fn from_params_validates_dimension_agreement() {
        let w1 = Matrix::zeros(4, 3);
        let w2 = Matrix::zeros(3, 3);
        assert!(Mlp::from_params(w1.clone(), vec![0.0; 3], w2.clone(), vec![0.0; 3]).is_ok());
        assert!(Mlp::from_params(w1.clone(), vec![0.0; 2], w2.clone(), vec![0.0; 3]).is_err());
        assert!(Mlp::from_params(w1.clone(), vec![0.0; 3], Matrix::zeros(2, 3), vec![0.0; 3]).is_err());
        assert!(Mlp::from_params(w1, vec![0.0; 3], w2, vec![0.0; 2]).is_err());
    }

    #[test]
    #[should_panic]
    fn forward_panics_on_input_width_mismatch() {
        let (mlp, _, _) = fixture();
        let bad = Matrix::from_rows(&[vec![0.1, 0.2, 0.3]]).unwrap();
        let _ = mlp.forward(&bad);
    }

    #[test]
    #[should_panic]
    fn gradient_step_rejects_non_positive_learning_rate() {
        let (mut mlp, x, y) = fixture();
        let fwd = mlp.forward(&x);
        let grads = mlp.backward(&x, &y, &fwd);
        mlp.gradient_step(&grads, 0.0);
    }
}

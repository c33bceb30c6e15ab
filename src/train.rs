//! Full-batch training loop.
//!
//! Training is an unconditional fixed-count iteration: forward, record the
//! cost, backward, update. There is no convergence detection and no early
//! stopping; the loop always runs `iterations` times. Each iteration depends
//! on the fully updated parameters of the previous one, so the loop is
//! strictly sequential.

use crate::{loss, Dataset, Error, Mlp, Result};

#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    /// Fixed number of descent iterations.
    pub iterations: usize,
    /// Fixed learning rate.
    pub lr: f64,
    /// Invoke the progress hook every this many iterations (0 = never).
    pub log_every: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            lr: 1e-2,
            log_every: 0,
        }
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Cost after the forward pass of each iteration, in order. Full-batch
    /// descent at a fixed rate trends downward but is not guaranteed to
    /// decrease monotonically.
    pub loss_history: Vec<f64>,
}

impl FitReport {
    #[inline]
    pub fn final_loss(&self) -> f64 {
        *self
            .loss_history
            .last()
            .expect("fit always runs at least one iteration")
    }
}

impl Mlp {
    /// Train on `train` with fixed-rate full-batch gradient descent.
    pub fn fit(&mut self, train: &Dataset, cfg: FitConfig) -> Result<FitReport> {
        self.fit_with_progress(train, cfg, |_, _| {})
    }

    /// Like [`Mlp::fit`], additionally invoking `progress(iteration, loss)`
    /// every `cfg.log_every` iterations.
    ///
    /// The hook is an observability convenience and never affects the update
    /// sequence.
    pub fn fit_with_progress<F>(
        &mut self,
        train: &Dataset,
        cfg: FitConfig,
        mut progress: F,
    ) -> Result<FitReport>
    where
        F: FnMut(usize, f64),
    {
        if train.feature_dim() != self.input_dim() {
            return Err(Error::InvalidData(format!(
                "train feature_dim {} does not match model input_dim {}",
                train.feature_dim(),
                self.input_dim()
            )));
        }
        if train.class_count() != self.output_dim() {
            return Err(Error::InvalidData(format!(
                "train class_count {} does not match model output_dim {}",
                train.class_count(),
                self.output_dim()
            )));
        }
        if cfg.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be > 0".to_owned()));
        }
        if !(cfg.lr.is_finite() && cfg.lr > 0.0) {
            return Err(Error::InvalidConfig("lr must be finite and > 0".to_owned()));
        }

        let x = train.features();
        let y = train.targets();
        let mut loss_history = Vec::with_capacity(cfg.iterations);

        for iter in 0..cfg.iterations {
            let fwd = self.forward(x);
            let cost = loss::sse(&fwd.output, y);
            loss_history.push(cost);

            if cfg.log_every > 0 && iter % cfg.log_every == 0 {
                progress(iter, cost);
            }

            let grads = self.backward(x, y, &fwd);
            self.gradient_step(&grads, cfg.lr);
        }

        Ok(FitReport { loss_history })
    }

    /// Forward-only inference: returns the `(rows, output_dim)` output matrix
    /// for a feature matrix normalized with the training divisors.
    pub fn predict(&self, features: &crate::Matrix) -> Result<crate::Matrix> {
        if features.cols() != self.input_dim() {
            return Err(Error::InvalidData(format!(
                "features have {} columns, model input_dim is {}",
                features.cols(),
                self.input_dim()
            )));
        }
        Ok(self.forward(features).output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matrix;

    fn tiny_dataset() -> Dataset {
        let features = Matrix::from_rows(&[
            vec![0.1, 0.2, 0.1, 0.1],
            vec![0.5, 0.5, 0.4, 0.5],
            vec![0.9, 0.8, 0.9, 0.9],
        ])
        .unwrap();
        let targets = Matrix::from_rows(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        Dataset::from_matrices(features, targets).unwrap()
    }

    #[test]
    fn fit_records_one_loss_per_iteration() {
        let train = tiny_dataset();
        let mut mlp = Mlp::new_with_seed(4, 3, 3, 1).unwrap();
        let report = mlp
            .fit(
                &train,
                FitConfig {
                    iterations: 50,
                    lr: 0.01,
                    log_every: 0,
                },
            )
            .unwrap();
        assert_eq!(report.loss_history.len(), 50);
        assert_eq!(report.final_loss(), *report.loss_history.last().unwrap());
    }

    #[test]
    fn loss_trends_downward_over_training() {
        let train = tiny_dataset();
        let mut mlp = Mlp::new_with_seed(4, 3, 3, 1).unwrap();
        let report = mlp
            .fit(
                &train,
                FitConfig {
                    iterations: 10_001,
                    lr: 0.01,
                    log_every: 0,
                },
            )
            .unwrap();
        assert!(
            report.loss_history[10_000] < report.loss_history[0],
            "loss did not decrease: {} -> {}",
            report.loss_history[0],
            report.loss_history[10_000]
        );
    }

    #[test]
    fn progress_hook_fires_every_k_iterations_without_affecting_updates() {
        let train = tiny_dataset();

        let mut observed = Vec::new();
        let mut with_hook = Mlp::new_with_seed(4, 3, 3, 7).unwrap();
        let cfg = FitConfig {
            iterations: 100,
            lr: 0.01,
            log_every: 25,
        };
        with_hook
            .fit_with_progress(&train, cfg, |iter, cost| observed.push((iter, cost)))
            .unwrap();
        assert_eq!(
            observed.iter().map(|&(i, _)| i).collect::<Vec<_>>(),
            vec![0, 25, 50, 75]
        );

        let mut silent = Mlp::new_with_seed(4, 3, 3, 7).unwrap();
        silent
            .fit(
                &train,
                FitConfig {
                    log_every: 0,
                    ..cfg
                },
            )
            .unwrap();
        assert_eq!(with_hook.w1(), silent.w1());
        assert_eq!(with_hook.w2(), silent.w2());
    }

    #[test]
    fn fit_rejects_mismatched_dataset_and_bad_config() {
        let train = tiny_dataset();

        let mut wrong_width = Mlp::new_with_seed(3, 3, 3, 1).unwrap();
        assert!(wrong_width.fit(&train, FitConfig::default()).is_err());

        let mut mlp = Mlp::new_with_seed(4, 3, 3, 1).unwrap();
        assert!(mlp
            .fit(
                &train,
                FitConfig {
                    iterations: 0,
                    lr: 0.01,
                    log_every: 0,
                },
            )
            .is_err());
        assert!(mlp
            .fit(
                &train,
                FitConfig {
                    iterations: 10,
                    lr: f64::NAN,
                    log_every: 0,
                },
            )
            .is_err());
    }
}

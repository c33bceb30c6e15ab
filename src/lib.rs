//! A from-scratch trainer for a single-hidden-layer sigmoid network.
//!
//! `iris-mlp` reimplements the classic hand-rolled iris classifier: explicit
//! matrix algebra for the forward pass, reverse-mode gradients for the
//! summed squared-error cost, and fixed-rate full-batch gradient descent for
//! a fixed number of iterations. It is designed to be easy to read while
//! keeping every shape explicit and every numeric step testable.
//!
//! # Design goals
//!
//! - Explicit algebra: one [`Matrix`] type, broadcasting only through a
//!   dedicated, length-checked routine.
//! - Clear contracts: shapes are validated at the API boundary.
//! - Deterministic runs: seeded parameter init and a seeded train/test split.
//!
//! # Panics vs `Result`
//!
//! This crate intentionally exposes two layers of API:
//!
//! - Low-level hot path (panics on misuse):
//!   [`Matrix`] arithmetic, [`Mlp::forward`], [`Mlp::backward`],
//!   [`Mlp::gradient_step`]. Shape mismatches are treated as programmer
//!   error and fail fast via `assert!` at the first offending operation.
//! - High-level convenience APIs (shape-checked, return [`Result`]):
//!   [`Mlp::fit`], [`Mlp::classify`], [`Dataset`] and [`Normalizer`]
//!   constructors, CSV loading.
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`; matrices are contiguous row-major buffers.
//! - For a batch of `N` samples with `I` features, `H` hidden units, and
//!   `O` classes: `X` is `(N, I)`, `w1` is `(I, H)`, `w2` is `(H, O)`, and
//!   every intermediate activation is `(N, H)` or `(N, O)`.
//! - Targets are strictly one-hot: each row has exactly one 1.
//!
//! # Quick start
//!
//! ```rust
//! use iris_mlp::{accuracy, Dataset, FitConfig, Mlp, Normalizer};
//!
//! # fn main() -> iris_mlp::Result<()> {
//! let xs = vec![
//!     vec![1.0, 9.0, 1.5, 0.4],
//!     vec![2.0, 8.0, 1.2, 0.3],
//!     vec![6.0, 3.0, 4.5, 1.4],
//!     vec![7.0, 3.2, 4.7, 1.5],
//!     vec![6.5, 3.0, 5.8, 2.2],
//!     vec![7.6, 3.0, 6.6, 2.1],
//! ];
//! let ys = vec![
//!     vec![1.0, 0.0, 0.0],
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.0, 1.0, 0.0],
//!     vec![0.0, 1.0, 0.0],
//!     vec![0.0, 0.0, 1.0],
//!     vec![0.0, 0.0, 1.0],
//! ];
//!
//! // Divisors come from the combined data, before any split.
//! let raw = Dataset::from_rows(&xs, &ys)?;
//! let normalizer = Normalizer::fit(raw.features())?;
//! let train = Dataset::from_matrices(
//!     normalizer.apply(raw.features())?,
//!     raw.targets().clone(),
//! )?;
//!
//! let mut mlp = Mlp::new_with_seed(4, 3, 3, 1)?;
//! let report = mlp.fit(
//!     &train,
//!     FitConfig {
//!         iterations: 500,
//!         lr: 0.05,
//!         log_every: 0,
//!     },
//! )?;
//! assert_eq!(report.loss_history.len(), 500);
//!
//! let predictions = mlp.classify(train.features())?;
//! let _train_accuracy = accuracy(&predictions, &train.labels());
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod data;
pub mod error;
pub mod iris;
pub mod loss;
pub(crate) mod matmul;
pub mod matrix;
pub mod metrics;
pub mod mlp;
pub mod predict;
pub mod train;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use data::{Dataset, Normalizer};
pub use error::{Error, Result};
pub use iris::{load_csv, species_of, Species};
pub use matrix::Matrix;
pub use metrics::{accuracy, unclassified_rate};
pub use mlp::{Forward, Gradients, Mlp};
pub use predict::{classify_row, classify_rows, Prediction};
pub use train::{FitConfig, FitReport};

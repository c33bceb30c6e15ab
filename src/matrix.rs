//! Dense row-major matrices.
//!
//! Everything the trainer touches is a `Matrix`: the feature block, the
//! one-hot targets, the weights, and every intermediate activation. Storage
//! is a single contiguous `Vec<f64>` in row-major order.
//!
//! # Panics vs `Result`
//!
//! Construction from untrusted shapes goes through validated `Result`
//! constructors. The arithmetic ops (`matmul`, `hadamard`, broadcasting, ...)
//! treat shape mismatches as programmer error and panic via `assert!` at the
//! first offending operation.

use crate::matmul::gemm_f64;
use crate::{Error, Result};

/// A dense matrix with row-major contiguous storage.
///
/// Invariant: `data.len() == rows * cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// An all-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from a flat row-major buffer.
    pub fn from_flat(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidData(
                "matrix dimensions must be > 0".to_owned(),
            ));
        }
        if data.len() != rows * cols {
            return Err(Error::InvalidData(format!(
                "buffer length {} does not match {rows}x{cols}",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from per-row vectors.
    ///
    /// This is a convenience constructor (it copies into contiguous storage).
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InvalidData("rows must not be empty".to_owned()));
        }
        let cols = rows[0].len();
        if cols == 0 {
            return Err(Error::InvalidData("rows must not be empty".to_owned()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::InvalidData(format!(
                    "row {i} has len {}, expected {cols}",
                    row.len()
                )));
            }
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    /// Returns the `r`-th row as a slice.
    ///
    /// Panics if `r >= rows`.
    pub fn row(&self, r: usize) -> &[f64] {
        assert!(r < self.rows, "row {r} out of bounds for {} rows", self.rows);
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Matrix product `self · rhs`.
    ///
    /// Shape contract: `self.cols == rhs.rows`; result is `(self.rows, rhs.cols)`.
    pub fn matmul(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, rhs.rows,
            "matmul: lhs is {}x{}, rhs is {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols
        );
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        gemm_f64(
            self.rows,
            rhs.cols,
            self.cols,
            &self.data,
            self.cols,
            1,
            &rhs.data,
            rhs.cols,
            1,
            &mut out.data,
            rhs.cols,
            1,
        );
        out
    }

    /// Matrix product `selfᵗ · rhs`, without materializing the transpose.
    ///
    /// Shape contract: `self.rows == rhs.rows`; result is `(self.cols, rhs.cols)`.
    pub fn t_matmul(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(
            self.rows, rhs.rows,
            "t_matmul: lhs is {}x{}, rhs is {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols
        );
        let mut out = Matrix::zeros(self.cols, rhs.cols);
        // Transposed lhs: swap its row/column strides.
        gemm_f64(
            self.cols,
            rhs.cols,
            self.rows,
            &self.data,
            1,
            self.cols,
            &rhs.data,
            rhs.cols,
            1,
            &mut out.data,
            rhs.cols,
            1,
        );
        out
    }

    /// Matrix product `self · rhsᵗ`, without materializing the transpose.
    ///
    /// Shape contract: `self.cols == rhs.cols`; result is `(self.rows, rhs.rows)`.
    pub fn matmul_t(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, rhs.cols,
            "matmul_t: lhs is {}x{}, rhs is {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols
        );
        let mut out = Matrix::zeros(self.rows, rhs.rows);
        gemm_f64(
            self.rows,
            rhs.rows,
            self.cols,
            &self.data,
            self.cols,
            1,
            &rhs.data,
            1,
            rhs.cols,
            &mut out.data,
            rhs.rows,
            1,
        );
        out
    }

    /// Adds a bias vector to every row.
    ///
    /// This is the only broadcasting the crate performs, and it is explicit:
    /// `bias.len()` must equal `self.cols`, no recycling of shorter vectors.
    pub fn add_row_broadcast(&self, bias: &[f64]) -> Matrix {
        assert_eq!(
            bias.len(),
            self.cols,
            "broadcast: bias len {} does not match {} columns",
            bias.len(),
            self.cols
        );
        let mut out = self.clone();
        for r in 0..out.rows {
            let row = &mut out.data[r * out.cols..(r + 1) * out.cols];
            for (v, &b) in row.iter_mut().zip(bias) {
                *v += b;
            }
        }
        out
    }

    /// Element-wise product.
    ///
    /// Shape contract: both operands have the same shape.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "hadamard: lhs is {}x{}, rhs is {}x{}",
            self.rows,
            self.cols,
            rhs.rows,
            rhs.cols
        );
        let mut out = self.clone();
        for (v, &r) in out.data.iter_mut().zip(&rhs.data) {
            *v *= r;
        }
        out
    }

    /// Element-wise difference `self - rhs`.
    ///
    /// Shape contract: both operands have the same shape.
    pub fn sub(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "sub: lhs is {}x{}, rhs is {}x{}",
            self.rows,
            self.cols,
            rhs.rows,
            rhs.cols
        );
        let mut out = self.clone();
        for (v, &r) in out.data.iter_mut().zip(&rhs.data) {
            *v -= r;
        }
        out
    }

    /// Applies `f` to every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Matrix {
        let mut out = self.clone();
        for v in &mut out.data {
            *v = f(*v);
        }
        out
    }

    /// Sums each column, collapsing the row dimension.
    pub fn col_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for r in 0..self.rows {
            let row = &self.data[r * self.cols..(r + 1) * self.cols];
            for (s, &v) in sums.iter_mut().zip(row) {
                *s += v;
            }
        }
        sums
    }

    /// In-place `self -= factor * rhs`, the descent update.
    ///
    /// Shape contract: both operands have the same shape.
    pub fn sub_scaled_assign(&mut self, rhs: &Matrix, factor: f64) {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "sub_scaled_assign: lhs is {}x{}, rhs is {}x{}",
            self.rows,
            self.cols,
            rhs.rows,
            rhs.cols
        );
        for (v, &g) in self.data.iter_mut().zip(&rhs.data) {
            *v -= factor * g;
        }
    }
}

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        assert!(
            r < self.rows && c < self.cols,
            "index ({r}, {c}) out of bounds for {}x{}",
            self.rows,
            self.cols
        );
        &self.data[r * self.cols + c]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        assert!(
            r < self.rows && c < self.cols,
            "index ({r}, {c}) out of bounds for {}x{}",
            self.rows,
            self.cols
        );
        &mut self.data[r * self.cols + c]
    }
}

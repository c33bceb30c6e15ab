//! Model serialization/deserialization (feature: `serde`).
//!
//! A versioned, stable on-disk format for trained parameters. The internal
//! `Mlp`/`Matrix` structs are never serialized directly, so the file format
//! survives internal representation changes. Deserialization validates
//! dimensions, parameter lengths, and that every value is finite.

use serde::{Deserialize, Serialize};

use std::path::Path;

use crate::{Error, Matrix, Mlp, Result};

pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedMlp {
    pub format_version: u32,
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    /// Row-major `(input_dim, hidden_dim)`.
    pub w1: Vec<f64>,
    pub b1: Vec<f64>,
    /// Row-major `(hidden_dim, output_dim)`.
    pub w2: Vec<f64>,
    pub b2: Vec<f64>,
}

impl SerializedMlp {
    pub fn from_mlp(mlp: &Mlp) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            input_dim: mlp.input_dim(),
            hidden_dim: mlp.hidden_dim(),
            output_dim: mlp.output_dim(),
            w1: mlp.w1().as_slice().to_vec(),
            b1: mlp.b1().to_vec(),
            w2: mlp.w2().as_slice().to_vec(),
            b2: mlp.b2().to_vec(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported model format_version {}; expected {MODEL_FORMAT_VERSION}",
                self.format_version
            )));
        }
        if self.input_dim == 0 || self.hidden_dim == 0 || self.output_dim == 0 {
            return Err(Error::InvalidData(
                "all model dimensions must be > 0".to_owned(),
            ));
        }
        let checks = [
            ("w1", self.w1.len(), self.input_dim * self.hidden_dim),
            ("b1", self.b1.len(), self.hidden_dim),
            ("w2", self.w2.len(), self.hidden_dim * self.output_dim),
            ("b2", self.b2.len(), self.output_dim),
        ];
        for (name, got, expected) in checks {
            if got != expected {
                return Err(Error::InvalidData(format!(
                    "{name} has {got} values, expected {expected}"
                )));
            }
        }
        for (name, values) in [
            ("w1", &self.w1),
            ("b1", &self.b1),
            ("w2", &self.w2),
            ("b2", &self.b2),
        ] {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "{name} contains a non-finite value"
                )));
            }
        }
        Ok(())
    }

    pub fn into_mlp(self) -> Result<Mlp> {
        self.validate()?;
        let w1 = Matrix::from_flat(self.w1, self.input_dim, self.hidden_dim)?;
        let w2 = Matrix::from_flat(self.w2, self.hidden_dim, self.output_dim)?;
        Mlp::from_params(w1, self.b1, w2, self.b2)
    }
}

impl Mlp {
    /// Write the model as JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let serialized = SerializedMlp::from_mlp(self);
        let json = serde_json::to_string_pretty(&serialized)
            .map_err(|e| Error::InvalidData(format!("serialize failed: {e}")))?;
        std::fs::write(path.as_ref(), json).map_err(|e| {
            Error::InvalidData(format!("write {} failed: {e}", path.as_ref().display()))
        })
    }

    /// Read and validate a model written by [`Mlp::save_json`].
    pub fn load_json(path: impl AsRef<Path>) -> Result<Mlp> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::InvalidData(format!("read {} failed: {e}", path.as_ref().display()))
        })?;
        let serialized: SerializedMlp = serde_json::from_str(&json)
            .map_err(|e| Error::InvalidData(format!("deserialize failed: {e}")))?;
        serialized.into_mlp()
    }
}

//! Iris species labels and CSV ingestion.
//!
//! The crate ships the classic 150-row measurement table as `data/iris.csv`
//! (sepal length/width, petal length/width, species). This module reads it
//! into a validated [`Dataset`] and maps between class indices and species
//! names, including the species-per-row view used to compare predictions
//! against an external reference trainer.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::{Dataset, Error, Prediction, Result};

/// The three iris species, with stable class indices matching the one-hot
/// column order: setosa = 0, versicolor = 1, virginica = 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    #[inline]
    pub fn class(self) -> usize {
        match self {
            Species::Setosa => 0,
            Species::Versicolor => 1,
            Species::Virginica => 2,
        }
    }

    #[inline]
    pub fn from_class(class: usize) -> Option<Species> {
        Species::ALL.get(class).copied()
    }

    /// One-hot target row for this species.
    pub fn one_hot(self) -> Vec<f64> {
        let mut row = vec![0.0; Species::ALL.len()];
        row[self.class()] = 1.0;
        row
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Setosa => "setosa",
            Species::Versicolor => "versicolor",
            Species::Virginica => "virginica",
        };
        write!(f, "{name}")
    }
}

/// Load an iris-style CSV: four numeric feature columns followed by a
/// species name.
///
/// Accepts bare (`setosa`) and prefixed (`Iris-setosa`) labels in any case.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| Error::InvalidData(format!("failed to open {}: {e}", path.display())))?;

    let mut species_map = HashMap::new();
    for s in Species::ALL {
        species_map.insert(s.to_string(), s);
    }

    let mut features = Vec::new();
    let mut targets = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::InvalidData(format!("csv parse error: {e}")))?;
        if record.len() != 5 {
            return Err(Error::InvalidData(format!(
                "row {line} has {} fields, expected 5",
                record.len()
            )));
        }

        let mut row = Vec::with_capacity(4);
        for field in record.iter().take(4) {
            let v: f64 = field.trim().parse().map_err(|_| {
                Error::InvalidData(format!("row {line}: {field:?} is not a number"))
            })?;
            row.push(v);
        }

        let raw = record[4].trim().trim_matches('"').to_lowercase();
        let name = raw.trim_start_matches("iris-");
        let species = species_map
            .get(name)
            .copied()
            .ok_or_else(|| Error::InvalidData(format!("row {line}: unknown species {raw:?}")))?;

        features.push(row);
        targets.push(species.one_hot());
    }

    if features.is_empty() {
        return Err(Error::InvalidData(format!(
            "no rows loaded from {}",
            path.display()
        )));
    }
    Dataset::from_rows(&features, &targets)
}

/// Map predictions to species, `None` for unclassified rows.
///
/// This is the species-per-row format used to cross-check against an
/// external reference trainer.
pub fn species_of(predictions: &[Prediction]) -> Vec<Option<Species>> {
    predictions
        .iter()
        .map(|p| p.class().and_then(Species::from_class))
        .collect()
}

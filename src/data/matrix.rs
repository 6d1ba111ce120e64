use std::collections::BTreeMap;

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};

/// A feature matrix keyed by entity (album) name.
///
/// Columns have a stable, shared meaning across rows; the column order is
/// fixed at construction. Missing entries are stored as `NaN` and must be
/// replaced with a fill constant (see [`FeatureMatrix::filled`]) before
/// fitting. Rows live in a `BTreeMap` so that iteration order, and with it
/// every downstream result, is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: BTreeMap<String, Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>) -> Self {
        FeatureMatrix {
            columns,
            rows: BTreeMap::new(),
        }
    }

    /// Inserts a row, validating its width against the column list.
    pub fn insert_row(&mut self, key: impl Into<String>, values: Vec<f64>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::FeatureCountMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.insert(key.into(), values);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row(&self, key: &str) -> Option<&[f64]> {
        self.rows.get(key).map(|r| r.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a copy with every `NaN` entry replaced by `fill`.
    pub fn filled(&self, fill: f64) -> FeatureMatrix {
        let rows = self
            .rows
            .iter()
            .map(|(k, row)| {
                let filled = row
                    .iter()
                    .map(|&v| if v.is_nan() { fill } else { v })
                    .collect();
                (k.clone(), filled)
            })
            .collect();
        FeatureMatrix {
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// The dependent variable: one real-valued rating per entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetVector {
    values: BTreeMap<String, f64>,
}

impl TargetVector {
    pub fn new() -> Self {
        TargetVector::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for TargetVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        TargetVector {
            values: iter.into_iter().collect(),
        }
    }
}

/// Restricts both inputs to their shared key set.
///
/// The cross-validation key set is the intersection of the keys present in
/// the feature matrix and the target vector; rows outside it are excluded
/// before evaluation begins. This runs in the pipeline, upstream of the
/// evaluator — the evaluator itself treats a missing feature row as a hard
/// `KeyMismatch` rather than dropping it.
pub fn intersect(features: &FeatureMatrix, target: &TargetVector) -> (FeatureMatrix, TargetVector) {
    let mut kept_features = FeatureMatrix::new(features.columns.to_vec());
    let mut kept_target = TargetVector::new();
    for (key, value) in target.iter() {
        if let Some(row) = features.row(key) {
            // Width already validated on the way into `features`.
            kept_features
                .insert_row(key, row.to_vec())
                .expect("row width preserved by construction");
            kept_target.insert(key, value);
        }
    }
    (kept_features, kept_target)
}

/// Converts keyed collections into the dense arrays models consume.
///
/// `keys` selects and orders the rows; every key must exist in both inputs.
pub fn to_arrays(
    features: &FeatureMatrix,
    target: &TargetVector,
    keys: &[&str],
) -> Result<(Array2<f64>, Array1<f64>)> {
    let width = features.columns.len();
    let mut x = Vec::with_capacity(keys.len() * width);
    let mut y = Vec::with_capacity(keys.len());
    for &key in keys {
        let row = features.row(key).ok_or_else(|| Error::KeyMismatch {
            entity: key.to_string(),
        })?;
        let value = target.get(key).ok_or_else(|| Error::KeyMismatch {
            entity: key.to_string(),
        })?;
        x.extend_from_slice(row);
        y.push(value);
    }
    let x = Array2::from_shape_vec((keys.len(), width), x)
        .expect("row count and width are consistent by construction");
    Ok((x, Array1::from_vec(y)))
}

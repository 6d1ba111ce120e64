use std::collections::BTreeMap;

use crate::data::matrix::{to_arrays, FeatureMatrix, TargetVector};
use crate::error::{Error, Result};
use crate::model::{FittedModel, Model};

/// Default fill for missing feature entries: a neutral rating, chosen over
/// zero so imputed peers do not read as strongly negative.
pub const DEFAULT_FILL_VALUE: f64 = 2.0;

/// Leave-one-out cross-validation over keyed entities.
///
/// For every key in the target vector, fits a fresh model on all other
/// entities and predicts the held-out one. Missing feature entries are
/// replaced by `fill_value` once, globally, before the fold loop — the
/// fill constant is fixed a priori rather than derived from the data, so
/// no target information leaks across folds. This matches the original
/// analysis and is a documented simplification, kept deliberately.
#[derive(Debug, Clone)]
pub struct LooEvaluator {
    fill_value: f64,
}

impl Default for LooEvaluator {
    fn default() -> Self {
        LooEvaluator {
            fill_value: DEFAULT_FILL_VALUE,
        }
    }
}

impl LooEvaluator {
    pub fn new(fill_value: f64) -> Self {
        LooEvaluator { fill_value }
    }

    /// Produces one out-of-fold prediction per target key.
    ///
    /// # Errors
    /// * `EmptyDataset` if the target vector is empty.
    /// * `KeyMismatch` if a target key has no feature row; rows are never
    ///   silently dropped.
    /// * `SingularFit` naming the held-out entity if a fold cannot be
    ///   fitted.
    pub fn evaluate<M: Model>(
        &self,
        features: &FeatureMatrix,
        target: &TargetVector,
        model: &M,
    ) -> Result<Predictions> {
        if target.is_empty() {
            return Err(Error::EmptyDataset);
        }
        for key in target.keys() {
            if !features.contains_key(key) {
                return Err(Error::KeyMismatch {
                    entity: key.to_string(),
                });
            }
        }

        // Single global fill, before any fold is formed.
        let filled = features.filled(self.fill_value);
        let keys: Vec<&str> = target.keys().collect();

        let mut predicted = BTreeMap::new();
        for (fold, &held_out) in keys.iter().enumerate() {
            let train_keys: Vec<&str> = keys
                .iter()
                .copied()
                .filter(|&k| k != held_out)
                .collect();
            let (train_x, train_y) = to_arrays(&filled, target, &train_keys)?;

            // Fitting constructs a fresh model per fold; nothing carries
            // over from the previous iteration.
            let fitted = model
                .fit(train_x.view(), train_y.view())
                .map_err(|e| Error::SingularFit {
                    context: format!("fold holding out '{held_out}'"),
                    detail: e.to_string(),
                })?;

            let row = filled
                .row(held_out)
                .expect("presence checked before the fold loop");
            let prediction = fitted.predict(row);
            log::debug!(
                "fold {}/{}: held out '{}', predicted {:.3}",
                fold + 1,
                keys.len(),
                held_out,
                prediction
            );
            predicted.insert(held_out.to_string(), prediction);
        }

        Ok(Predictions { values: predicted })
    }
}

/// Per-entity predicted values from one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions {
    values: BTreeMap<String, f64>,
}

impl Predictions {
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

    /// Entries sorted by descending predicted value, ties broken by key,
    /// for presentation.
    pub fn ranked(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> =
            self.values.iter().map(|(k, &v)| (k.clone(), v)).collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries
    }
}

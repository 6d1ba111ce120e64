use crate::data::matrix::TargetVector;
use crate::error::{Error, Result};

use super::loo::Predictions;

/// Scalar summary of how well predictions track ground truth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitQuality {
    /// Coefficient of determination, `1 - SS_res / SS_tot`. At most 1 for
    /// any sensible model, negative when the model is worse than
    /// predicting the mean.
    pub r_squared: f64,
    /// Root-mean-squared error, in target units. Always >= 0, zero exactly
    /// when predictions match the truth.
    pub rmse: f64,
}

/// Compares predictions against ground truth.
///
/// # Errors
/// * `KeyMismatch` unless the two key sets are exactly equal.
/// * `EmptyDataset` if there is nothing to compare.
/// * `DegenerateTarget` if the truth has zero variance; R-squared would be
///   a division by zero, and a silent NaN would poison every consumer.
pub fn fit_quality(predictions: &Predictions, truth: &TargetVector) -> Result<FitQuality> {
    if truth.is_empty() {
        return Err(Error::EmptyDataset);
    }
    for key in truth.keys() {
        if predictions.get(key).is_none() {
            return Err(Error::KeyMismatch {
                entity: key.to_string(),
            });
        }
    }
    for key in predictions.keys() {
        if truth.get(key).is_none() {
            return Err(Error::KeyMismatch {
                entity: key.to_string(),
            });
        }
    }

    let n = truth.len() as f64;
    let mean = truth.iter().map(|(_, v)| v).sum::<f64>() / n;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (key, actual) in truth.iter() {
        let predicted = predictions.get(key).expect("key sets verified equal");
        ss_res += (actual - predicted).powi(2);
        ss_tot += (actual - mean).powi(2);
    }

    if ss_tot == 0.0 {
        return Err(Error::DegenerateTarget);
    }

    Ok(FitQuality {
        r_squared: 1.0 - ss_res / ss_tot,
        rmse: (ss_res / n).sqrt(),
    })
}

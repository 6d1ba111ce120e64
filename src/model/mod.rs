pub mod mean;
pub mod ridge;

pub use mean::MeanBaseline;
pub use ridge::Ridge;

use ndarray::{ArrayView1, ArrayView2};
use thiserror::Error;

/// Failures internal to model fitting.
///
/// Callers (the evaluator, the full-dataset fit in the analysis run)
/// convert these into [`crate::error::Error::SingularFit`] together with
/// the fold context, so the user-visible message names the entity whose
/// fold failed.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("training set has no rows")]
    NoTrainingRows,

    #[error("normal equations are singular: {0}")]
    Singular(String),
}

/// A trainable regression model configuration.
///
/// Fitting constructs a fresh [`FittedModel`]; there is no mutable state
/// to reset between cross-validation folds, so per-fold freshness holds by
/// construction.
pub trait Model {
    type Fitted: FittedModel;

    fn fit(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Self::Fitted, FitError>;
}

/// A model fitted on one training set, able to predict single rows.
pub trait FittedModel {
    fn predict(&self, row: &[f64]) -> f64;

    /// Per-feature linear coefficients, when the model has them.
    ///
    /// Returns `None` for models without a linear form (the coefficient
    /// inspector turns that into `UnsupportedModel`).
    fn coefficients(&self) -> Option<&[f64]> {
        None
    }

    fn intercept(&self) -> f64 {
        0.0
    }
}

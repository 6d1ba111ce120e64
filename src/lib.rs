//! ratelab: leave-one-out analysis of a personal album-rating collection.
//!
//! Models one listener's ratings as a function of peer ratings and album
//! metadata (genre and release decade), using leave-one-out
//! cross-validated ridge regression. The interesting outputs are how much
//! of the taste is predictable (R-squared / RMSE against a mean baseline),
//! which features carry weight, and which albums the model gets most
//! wrong.

pub mod analysis;
pub mod data;
pub mod error;
pub mod eval;
pub mod model;

pub use analysis::{run_rating_analysis, AnalysisConfig, AnalysisOutcome};
pub use data::{FeatureMatrix, FeatureSchema, TargetVector};
pub use error::{Error, Result};
pub use eval::{fit_quality, FitQuality, LooEvaluator, Predictions};
pub use model::{MeanBaseline, Ridge};

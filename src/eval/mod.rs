pub mod coefficients;
pub mod loo;
pub mod metrics;

pub use coefficients::{inspect_coefficients, ranked_by_magnitude, FeatureWeight};
pub use loo::{LooEvaluator, Predictions, DEFAULT_FILL_VALUE};
pub use metrics::{fit_quality, FitQuality};

use thiserror::Error;

/// Errors produced by the analysis pipeline.
///
/// Every variant is a data-validation failure, not a transient fault:
/// nothing here is retried or locally recovered, since recovering would
/// silently corrupt the statistical result. Callers propagate with `?`
/// and the run aborts with a message naming the offending entity.
#[derive(Debug, Error)]
pub enum Error {
    /// A target key has no matching feature row, or two keyed collections
    /// that must share a key set do not.
    #[error("entity '{entity}' is present in one input but missing from the other")]
    KeyMismatch { entity: String },

    /// No usable rows remain.
    #[error("no entities to evaluate")]
    EmptyDataset,

    /// Ground truth has zero variance, so R-squared is undefined.
    #[error("ground truth has zero variance, r-squared is undefined")]
    DegenerateTarget,

    /// Model fitting failed. `context` names the held-out entity for a
    /// cross-validation fold, or "full fit" for a whole-dataset fit.
    #[error("model fit failed ({context}): {detail}")]
    SingularFit { context: String, detail: String },

    /// Coefficient inspection was requested on a fitted model that does
    /// not expose linear coefficients.
    #[error("fitted model does not expose linear coefficients")]
    UnsupportedModel,

    /// A row or coefficient vector has the wrong width for its schema.
    #[error("expected {expected} feature values, found {found}")]
    FeatureCountMismatch { expected: usize, found: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("plot rendering failed: {0}")]
    Plot(String),

    /// A cell in an input file could not be interpreted.
    #[error("invalid value '{value}' for {column} in row '{entity}': {reason}")]
    InvalidValue {
        entity: String,
        column: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

use crate::data::matrix::TargetVector;
use crate::error::{Error, Result};
use crate::eval::loo::Predictions;

/// One album where the model and the actual rating disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    pub album: String,
    pub actual: f64,
    pub predicted: f64,
}

impl Divergence {
    /// Positive when the album is rated above what the model expects —
    /// a personal favorite the peers and metadata do not explain.
    pub fn residual(&self) -> f64 {
        self.actual - self.predicted
    }
}

/// Ranks albums by absolute prediction error, largest first, keeping the
/// top `limit`. Ties break by album name so the report is deterministic.
///
/// # Errors
/// `KeyMismatch` unless predictions and truth share exactly the same key
/// set; `EmptyDataset` when there is nothing to rank.
pub fn rank_divergences(
    predictions: &Predictions,
    truth: &TargetVector,
    limit: usize,
) -> Result<Vec<Divergence>> {
    if truth.is_empty() {
        return Err(Error::EmptyDataset);
    }
    if predictions.len() != truth.len() {
        let entity = truth
            .keys()
            .find(|k| predictions.get(k).is_none())
            .or_else(|| predictions.keys().find(|k| truth.get(k).is_none()))
            .unwrap_or_default()
            .to_string();
        return Err(Error::KeyMismatch { entity });
    }

    let mut divergences = Vec::with_capacity(truth.len());
    for (album, actual) in truth.iter() {
        let predicted = predictions.get(album).ok_or_else(|| Error::KeyMismatch {
            entity: album.to_string(),
        })?;
        divergences.push(Divergence {
            album: album.to_string(),
            actual,
            predicted,
        });
    }
    divergences.sort_by(|a, b| {
        b.residual()
            .abs()
            .partial_cmp(&a.residual().abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.album.cmp(&b.album))
    });
    divergences.truncate(limit);
    Ok(divergences)
}

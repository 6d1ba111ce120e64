use ndarray::{ArrayView1, ArrayView2};

use super::{FitError, FittedModel, Model};

/// Baseline model that always predicts the training-target mean.
///
/// Useful as a floor for the ridge model's fit quality: an R-squared near
/// zero against this baseline means the peer ratings and metadata carry no
/// signal. Exposes no linear coefficients.
#[derive(Debug, Clone, Default)]
pub struct MeanBaseline;

impl MeanBaseline {
    pub fn new() -> Self {
        MeanBaseline
    }
}

impl Model for MeanBaseline {
    type Fitted = FittedMean;

    fn fit(&self, _x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<FittedMean, FitError> {
        if y.is_empty() {
            return Err(FitError::NoTrainingRows);
        }
        Ok(FittedMean {
            mean: y.sum() / y.len() as f64,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FittedMean {
    mean: f64,
}

impl FittedModel for FittedMean {
    fn predict(&self, _row: &[f64]) -> f64 {
        self.mean
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn predicts_training_mean_everywhere() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];
        let fitted = MeanBaseline::new().fit(x.view(), y.view()).unwrap();
        assert_eq!(fitted.predict(&[0.0]), 4.0);
        assert_eq!(fitted.predict(&[100.0]), 4.0);
        assert!(fitted.coefficients().is_none());
    }
}

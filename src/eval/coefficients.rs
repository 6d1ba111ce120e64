use crate::error::{Error, Result};
use crate::model::FittedModel;

/// One feature's linear weight in a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWeight {
    pub feature: String,
    pub weight: f64,
}

/// Projects a fitted model's linear coefficients onto feature names.
///
/// Read-only: nothing about the model is recomputed. Meant for a model fit
/// on the full dataset (no held-out entity), whose weights say which
/// raters, genres, and decades pull the rating up or down.
///
/// # Errors
/// * `UnsupportedModel` if the fitted model has no linear coefficients
///   (e.g. the mean baseline).
/// * `FeatureCountMismatch` if the name list disagrees with the
///   coefficient vector's length.
pub fn inspect_coefficients<F: FittedModel>(
    fitted: &F,
    columns: &[String],
) -> Result<Vec<FeatureWeight>> {
    let coefficients = fitted.coefficients().ok_or(Error::UnsupportedModel)?;
    if coefficients.len() != columns.len() {
        return Err(Error::FeatureCountMismatch {
            expected: columns.len(),
            found: coefficients.len(),
        });
    }
    Ok(columns
        .iter()
        .zip(coefficients.iter())
        .map(|(name, &weight)| FeatureWeight {
            feature: name.clone(),
            weight,
        })
        .collect())
}

/// Sorts weights by descending magnitude, keeping the sign; ties broken by
/// feature name so output order is deterministic.
pub fn ranked_by_magnitude(mut weights: Vec<FeatureWeight>) -> Vec<FeatureWeight> {
    weights.sort_by(|a, b| {
        b.weight
            .abs()
            .partial_cmp(&a.weight.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });
    weights
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{MeanBaseline, Model, Ridge};
    use ndarray::array;

    #[test]
    fn names_pair_with_coefficients_in_order() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let y = array![1.0, 2.0, 3.0];
        let fitted = Ridge::new(0.0)
            .with_intercept(false)
            .fit(x.view(), y.view())
            .unwrap();
        let columns = vec!["alpha_rater".to_string(), "genre_ambient".to_string()];
        let weights = inspect_coefficients(&fitted, &columns).unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].feature, "alpha_rater");
        assert!((weights[0].weight - 1.0).abs() < 1e-9);
        assert!((weights[1].weight - 2.0).abs() < 1e-9);
    }

    #[test]
    fn mean_baseline_is_unsupported() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0];
        let fitted = MeanBaseline::new().fit(x.view(), y.view()).unwrap();
        let err = inspect_coefficients(&fitted, &["f".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedModel));
    }

    #[test]
    fn wrong_name_count_is_rejected() {
        let x = array![[1.0, 2.0], [2.0, 1.0], [0.0, 1.0]];
        let y = array![1.0, 2.0, 3.0];
        let fitted = Ridge::new(0.5).fit(x.view(), y.view()).unwrap();
        let err = inspect_coefficients(&fitted, &["only_one".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            Error::FeatureCountMismatch {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn ranking_is_by_magnitude_with_sign_kept() {
        let weights = vec![
            FeatureWeight {
                feature: "small".to_string(),
                weight: 0.1,
            },
            FeatureWeight {
                feature: "big_negative".to_string(),
                weight: -2.0,
            },
            FeatureWeight {
                feature: "medium".to_string(),
                weight: 1.0,
            },
        ];
        let ranked = ranked_by_magnitude(weights);
        assert_eq!(ranked[0].feature, "big_negative");
        assert_eq!(ranked[0].weight, -2.0);
        assert_eq!(ranked[1].feature, "medium");
        assert_eq!(ranked[2].feature, "small");
    }
}

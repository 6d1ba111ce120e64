use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::{FitError, FittedModel, Model};

/// Pivot threshold scale for singularity detection in the solver.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Ridge regression with a fixed regularization strength.
///
/// Fits by the normal equations on mean-centered data,
/// `(Xᵀ X + αI) β = Xᵀ y`, solved with Gaussian elimination. The
/// regularization strength is a chosen hyperparameter, not tuned; with a
/// strictly positive `alpha` the system is always well-conditioned, while
/// `alpha = 0` gives plain least squares and may fail with
/// [`FitError::Singular`] on collinear features.
#[derive(Debug, Clone)]
pub struct Ridge {
    alpha: f64,
    fit_intercept: bool,
}

impl Ridge {
    /// Creates a ridge regression with the given regularization strength.
    ///
    /// `alpha` must be non-negative.
    pub fn new(alpha: f64) -> Self {
        Ridge {
            alpha,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Model for Ridge {
    type Fitted = FittedRidge;

    fn fit(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<FittedRidge, FitError> {
        let n = x.nrows();
        let p = x.ncols();
        if n == 0 {
            return Err(FitError::NoTrainingRows);
        }

        // Center features and target so the intercept drops out of the
        // solve and comes back as y_mean - beta . x_mean.
        let (x_mean, y_mean) = if self.fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).expect("n > 0 checked above");
            let y_mean = y.sum() / n as f64;
            (x_mean, y_mean)
        } else {
            (Array1::zeros(p), 0.0)
        };
        let x_centered = &x - &x_mean;
        let y_centered = &y - y_mean;

        let mut gram = x_centered.t().dot(&x_centered);
        for i in 0..p {
            gram[[i, i]] += self.alpha;
        }
        let rhs = x_centered.t().dot(&y_centered);

        let coefficients = solve(gram, rhs)?;
        let intercept = y_mean - coefficients.dot(&x_mean);

        Ok(FittedRidge {
            coefficients: coefficients.to_vec(),
            intercept,
        })
    }
}

/// A ridge model fitted on one training set.
#[derive(Debug, Clone)]
pub struct FittedRidge {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl FittedModel for FittedRidge {
    fn predict(&self, row: &[f64]) -> f64 {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row.iter())
            .map(|(c, v)| c * v)
            .sum();
        self.intercept + dot
    }

    fn coefficients(&self) -> Option<&[f64]> {
        Some(&self.coefficients)
    }

    fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Solves `a x = b` by Gaussian elimination with partial pivoting.
///
/// `a` is the (symmetric, p x p) regularized Gram matrix; the system is
/// small, so a dense solve is fine. A pivot below the tolerance means the
/// fold cannot be fitted and is reported as singular rather than producing
/// a garbage solution.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>, FitError> {
    let p = a.nrows();
    if p == 0 {
        return Ok(Array1::zeros(0));
    }

    let scale = a.iter().fold(0.0f64, |m, &v| m.max(v.abs())).max(1.0);
    let tolerance = PIVOT_TOLERANCE * scale;

    for col in 0..p {
        // Partial pivoting: bring the largest remaining entry up.
        let mut pivot_row = col;
        for row in (col + 1)..p {
            if a[[row, col]].abs() > a[[pivot_row, col]].abs() {
                pivot_row = row;
            }
        }
        if a[[pivot_row, col]].abs() < tolerance {
            return Err(FitError::Singular(format!(
                "pivot {:.3e} below tolerance at column {col}",
                a[[pivot_row, col]]
            )));
        }
        if pivot_row != col {
            for j in 0..p {
                a.swap([col, j], [pivot_row, j]);
            }
            b.swap(col, pivot_row);
        }

        // Eliminate below the pivot.
        for row in (col + 1)..p {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for j in col..p {
                a[[row, j]] -= factor * a[[col, j]];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut x = Array1::zeros(p);
    for col in (0..p).rev() {
        let mut sum = b[col];
        for j in (col + 1)..p {
            sum -= a[[col, j]] * x[j];
        }
        x[col] = sum / a[[col, col]];
    }
    Ok(x)
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn exact_fit_without_intercept() {
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let y = array![1.0, 2.0];
        let fitted = Ridge::new(0.0)
            .with_intercept(false)
            .fit(x.view(), y.view())
            .unwrap();
        let coefs = fitted.coefficients().unwrap();
        assert_close(coefs[0], 1.0);
        assert_close(coefs[1], 2.0);
        assert_close(fitted.predict(&[1.0, 1.0]), 3.0);
    }

    #[test]
    fn recovers_slope_and_intercept() {
        // y = 2x + 1, exactly.
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];
        let fitted = Ridge::new(0.0).fit(x.view(), y.view()).unwrap();
        assert_close(fitted.coefficients().unwrap()[0], 2.0);
        assert_close(fitted.intercept(), 1.0);
        assert_close(fitted.predict(&[10.0]), 21.0);
    }

    #[test]
    fn regularization_shrinks_coefficients() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];
        let free = Ridge::new(0.0).fit(x.view(), y.view()).unwrap();
        let shrunk = Ridge::new(10.0).fit(x.view(), y.view()).unwrap();
        assert!(shrunk.coefficients().unwrap()[0].abs() < free.coefficients().unwrap()[0].abs());
    }

    #[test]
    fn collinear_features_are_singular_without_regularization() {
        // Second column duplicates the first.
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let y = array![1.0, 2.0, 3.0];
        let err = Ridge::new(0.0).fit(x.view(), y.view()).unwrap_err();
        assert!(matches!(err, FitError::Singular(_)));

        // A positive alpha makes the same fit well-posed.
        assert!(Ridge::new(0.1).fit(x.view(), y.view()).is_ok());
    }

    #[test]
    fn empty_training_set_is_rejected() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        let err = Ridge::new(1.0).fit(x.view(), y.view()).unwrap_err();
        assert!(matches!(err, FitError::NoTrainingRows));
    }

    #[test]
    fn deterministic_across_runs() {
        let x = array![[1.0, 2.0], [3.0, 1.0], [0.5, 4.0], [2.0, 2.0]];
        let y = array![3.0, 4.0, 2.5, 3.5];
        let a = Ridge::new(0.5).fit(x.view(), y.view()).unwrap();
        let b = Ridge::new(0.5).fit(x.view(), y.view()).unwrap();
        assert_eq!(a.coefficients(), b.coefficients());
        assert_eq!(a.intercept().to_bits(), b.intercept().to_bits());
    }
}

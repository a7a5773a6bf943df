//! Ordinary Least Squares (OLS) linear regression
//!
//! The solve goes through an SVD-based least squares, which also copes
//! with rank-deficient designs (two terms that evaluate to the same column).
//! Coefficient inference needs `(X'X)^-1` and at least one residual degree
//! of freedom; when either is missing the estimates are still returned,
//! only without standard errors.

use ndarray::{Array1, Array2};
use ndarray_linalg::{Inverse, LeastSquaresSvd};
use statrs::distribution::{ContinuousCDF, StudentsT};

use canopy_core::CanopyError;

use crate::base::{Coefficient, ModelError, Result};
use crate::lm::LinearConfig;
use crate::lm::diagnostics::Diagnostics;

// ==================== Type Definitions ====================

/// Matrix type alias for 2D arrays
pub type Matrix = Array2<f64>;

/// Vector type alias for 1D arrays
pub type Vector = Array1<f64>;

// ==================== OLS Estimate ====================

/// Everything an OLS solve produces, on the scale the response was given in
#[derive(Debug, Clone)]
pub struct OlsEstimate {
    pub coefficients: Vector,
    pub standard_errors: Option<Vector>,
    pub t_statistics: Option<Vector>,
    pub p_values: Option<Vector>,
    pub ci_lower: Option<Vector>,
    pub ci_upper: Option<Vector>,
    pub fitted_values: Vector,
    pub residuals: Vector,
    pub rss: f64,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// `RSS / (n - k)`
    pub mse_resid: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub df_resid: usize,
}

impl OlsEstimate {
    pub fn n_obs(&self) -> usize {
        self.fitted_values.len()
    }

    /// Residual standard error
    pub fn rmse(&self) -> f64 {
        self.mse_resid.sqrt()
    }

    /// Coefficient table labelled by design-matrix column
    pub fn to_coefficients(&self, labels: &[String], intercept: Option<usize>) -> Vec<Coefficient> {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(i, &estimate)| {
                let name = labels.get(i).cloned().unwrap_or_else(|| format!("x{i}"));
                let mut coef = Coefficient::new(name, estimate);
                if let (Some(se), Some(t), Some(p), Some(lo), Some(hi)) = (
                    &self.standard_errors,
                    &self.t_statistics,
                    &self.p_values,
                    &self.ci_lower,
                    &self.ci_upper,
                ) {
                    coef = coef
                        .with_std_error(se[i])
                        .with_t_stat(t[i])
                        .with_p_value(p[i])
                        .with_ci(lo[i], hi[i]);
                }
                if intercept == Some(i) {
                    coef = coef.as_intercept();
                }
                coef
            })
            .collect()
    }
}

// ==================== Linear Regression Model ====================

/// OLS linear regression
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    config: LinearConfig,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn config(mut self, config: LinearConfig) -> Self {
        self.config = config;
        self
    }

    /// Fit `y` on the columns of `x`. `has_intercept` selects the centred
    /// (with intercept) or uncentred R².
    pub fn fit(&self, x: &Matrix, y: &Vector, has_intercept: bool) -> Result<OlsEstimate> {
        let n = x.nrows();
        let p = x.ncols();

        if y.len() != n {
            return Err(CanopyError::DimensionMismatch {
                expected: n,
                actual: y.len(),
            }
            .into());
        }
        if n == 0 || p == 0 {
            return Err(ModelError::numerical(
                "fit",
                format!("cannot fit a {n}x{p} design matrix"),
            ));
        }

        let coefficients = self.svd_solve(x, y)?;
        let fitted_values = x.dot(&coefficients);
        let residuals = y - &fitted_values;

        let rss = residuals.mapv(|r| r * r).sum();
        let tss = if has_intercept {
            let mean = y.mean().unwrap_or(0.0);
            y.mapv(|v| (v - mean).powi(2)).sum()
        } else {
            y.mapv(|v| v * v).sum()
        };
        let r_squared = 1.0 - rss / tss;

        let df_resid = n.saturating_sub(p);
        let df_total = (if has_intercept { n - 1 } else { n }) as f64;
        let adj_r_squared = 1.0 - df_total / df_resid as f64 * (1.0 - r_squared);
        let mse_resid = if df_resid > 0 {
            rss / df_resid as f64
        } else {
            f64::NAN
        };

        let log_likelihood = Diagnostics::log_likelihood(rss, n);
        let (aic, bic) = Diagnostics::information_criteria(log_likelihood, p, n);

        let mut estimate = OlsEstimate {
            coefficients,
            standard_errors: None,
            t_statistics: None,
            p_values: None,
            ci_lower: None,
            ci_upper: None,
            fitted_values,
            residuals,
            rss,
            r_squared,
            adj_r_squared,
            mse_resid,
            log_likelihood,
            aic,
            bic,
            df_resid,
        };

        if df_resid == 0 {
            log::warn!("no residual degrees of freedom, coefficient inference skipped");
            return Ok(estimate);
        }

        match self.standard_errors(x, mse_resid) {
            Ok(se) => {
                let (t, p_values, lower, upper) =
                    self.calculate_inference(&estimate.coefficients, &se, df_resid)?;
                estimate.standard_errors = Some(se);
                estimate.t_statistics = Some(t);
                estimate.p_values = Some(p_values);
                estimate.ci_lower = Some(lower);
                estimate.ci_upper = Some(upper);
            }
            Err(e) => log::warn!("coefficient inference skipped: {e}"),
        }

        Ok(estimate)
    }

    /// Solve using SVD-based least squares
    fn svd_solve(&self, x: &Matrix, y: &Vector) -> Result<Vector> {
        x.least_squares(y)
            .map_err(|e| ModelError::numerical("svd_solve", format!("SVD least squares failed: {e}")))
            .map(|ls| ls.solution)
    }

    /// Standard errors from `sqrt(diag(σ² (X'X)^-1))`
    fn standard_errors(&self, x: &Matrix, sigma2: f64) -> Result<Vector> {
        let xtx = x.t().dot(x);
        let xtx_inv = xtx
            .inv()
            .map_err(|e| ModelError::numerical("standard_errors", format!("failed to invert X'X: {e}")))?;

        let variances = xtx_inv.diag().mapv(|v| v * sigma2);
        if variances.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ModelError::numerical(
                "standard_errors",
                "X'X is numerically singular",
            ));
        }
        Ok(variances.mapv(f64::sqrt))
    }

    /// t statistics, two-sided p-values and confidence bounds
    fn calculate_inference(
        &self,
        coefficients: &Vector,
        std_errors: &Vector,
        df: usize,
    ) -> Result<(Vector, Vector, Vector, Vector)> {
        let t_dist = StudentsT::new(0.0, 1.0, df as f64).map_err(|e| {
            ModelError::numerical(
                "calculate_inference",
                format!("failed to create t-distribution: {e}"),
            )
        })?;

        let t_statistics: Vector = coefficients
            .iter()
            .zip(std_errors.iter())
            .map(|(&coef, &se)| coef / se)
            .collect();

        let p_values: Vector = t_statistics
            .iter()
            .map(|&t| (2.0 * (1.0 - t_dist.cdf(t.abs()))).clamp(0.0, 1.0))
            .collect();

        let alpha = 1.0 - self.config.confidence_level;
        let t_critical = t_dist.inverse_cdf(1.0 - alpha / 2.0);

        let ci_lower: Vector = coefficients
            .iter()
            .zip(std_errors.iter())
            .map(|(&coef, &se)| coef - t_critical * se)
            .collect();
        let ci_upper: Vector = coefficients
            .iter()
            .zip(std_errors.iter())
            .map(|(&coef, &se)| coef + t_critical * se)
            .collect();

        Ok((t_statistics, p_values, ci_lower, ci_upper))
    }
}

//! Fit diagnostics
//!
//! Residual-based statistics shared by the OLS fitter and the manual
//! evaluator, plus the back-transformation used for log-linear models.

use ndarray::Array1;

/// Diagnostic calculations on residual and prediction vectors
pub struct Diagnostics;

impl Diagnostics {
    /// Durbin-Watson statistic of residuals in their given order
    pub fn durbin_watson(residuals: &Array1<f64>) -> f64 {
        let sum_sq_diff: f64 = residuals
            .windows(2)
            .into_iter()
            .map(|w| (w[1] - w[0]).powi(2))
            .sum();
        let sum_sq: f64 = residuals.iter().map(|r| r * r).sum();
        sum_sq_diff / sum_sq
    }

    /// Meyer's correction for the bias of back-transformed log predictions
    pub fn bias_correction_factor(mse_resid: f64) -> f64 {
        (mse_resid / 2.0).exp()
    }

    /// `exp(fitted) · factor`
    pub fn back_transform(fitted_log: &Array1<f64>, factor: f64) -> Array1<f64> {
        fitted_log.mapv(|v| v.exp() * factor)
    }

    /// Root mean squared difference (divisor n)
    pub fn rmse(observed: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
        let n = observed.len() as f64;
        ((observed - predicted).mapv(|d| d * d).sum() / n).sqrt()
    }

    /// `rmse / mean · 100`, zero when the mean is exactly zero
    pub fn syx_percent(rmse: f64, observed_mean: f64) -> f64 {
        if observed_mean == 0.0 {
            0.0
        } else {
            rmse / observed_mean * 100.0
        }
    }

    /// Centred coefficient of determination of `predicted` against `observed`
    pub fn r_squared(observed: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
        let mean = observed.mean().unwrap_or(0.0);
        let ss_res = (observed - predicted).mapv(|d| d * d).sum();
        let ss_tot = observed.mapv(|o| (o - mean).powi(2)).sum();
        1.0 - ss_res / ss_tot
    }

    /// Gaussian log-likelihood of an OLS fit with residual sum of squares
    /// `rss` over `n` observations
    pub fn log_likelihood(rss: f64, n: usize) -> f64 {
        let n = n as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI * rss / n).ln() + 1.0)
    }

    /// `(AIC, BIC)` for `k` estimated coefficients
    pub fn information_criteria(log_likelihood: f64, k: usize, n: usize) -> (f64, f64) {
        let k = k as f64;
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * (n as f64).ln();
        (aic, bic)
    }
}

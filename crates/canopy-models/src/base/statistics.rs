//! Statistical structures for fit results

use serde::{Deserialize, Serialize};

use canopy_core::data::quantile;

/// Goodness-of-fit statistics of a fitted or manually evaluated model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitStatistics {
    /// Unadjusted R²
    pub r_squared: f64,
    /// Adjusted R²; plain R² for manual evaluations
    pub r2_adjusted: f64,
    /// Residual standard error, on the log scale for log models
    pub rmse: f64,
    /// Root mean squared error of the back-transformed predictions
    pub rmse_real: Option<f64>,
    /// Standard error of the estimate as a percentage of the observed mean,
    /// always on the real scale
    pub syx_percent: f64,
    pub log_likelihood: Option<f64>,
    pub aic: Option<f64>,
    pub bic: Option<f64>,
    pub durbin_watson: Option<f64>,
    /// Meyer's correction `exp(MSE / 2)`, log models only
    pub bias_correction_factor: Option<f64>,
    pub n_observations: usize,
    pub df_resid: Option<usize>,
}

/// Five-number summary plus mean of a residual vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualStatistics {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl ResidualStatistics {
    /// Summarise the finite residuals, `None` if there are none
    pub fn from_residuals(residuals: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = residuals.iter().copied().filter(|r| r.is_finite()).collect();
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        Some(Self {
            min: quantile(&finite, 0.0)?,
            q1: quantile(&finite, 0.25)?,
            median: quantile(&finite, 0.5)?,
            q3: quantile(&finite, 0.75)?,
            max: quantile(&finite, 1.0)?,
            mean,
        })
    }
}

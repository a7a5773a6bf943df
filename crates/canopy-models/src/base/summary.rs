//! Report-facing summaries of a fit

use serde::{Deserialize, Serialize};
use std::fmt;

use super::statistics::FitStatistics;

/// How a result's coefficients were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitMethod {
    /// Ordinary least squares on the screened data
    Ols,
    /// Coefficients supplied by the user, no fitting
    Manual,
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMethod::Ols => write!(f, "Ordinary Least Squares"),
            FitMethod::Manual => write!(f, "Manual coefficients"),
        }
    }
}

/// One line of the fixed metrics table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub metric: String,
    /// Formatted value
    pub value: String,
    pub interpretation: String,
}

impl MetricRow {
    fn new(metric: &str, value: String, interpretation: &str) -> Self {
        Self {
            metric: metric.to_string(),
            value,
            interpretation: interpretation.to_string(),
        }
    }

    /// The metrics table in report order. The Meyer factor row only appears
    /// when the statistics carry one.
    pub fn table(stats: &FitStatistics, is_log: bool) -> Vec<MetricRow> {
        let mut rows = vec![
            Self::new(
                "R² adjusted",
                format!("{:.4}", stats.r2_adjusted),
                "Share of the variance explained (0 to 1).",
            ),
            Self::new(
                "Syx %",
                format!("{:.2}%", stats.syx_percent),
                "Mean relative error.",
            ),
            Self::new(
                if is_log { "RMSE (log scale)" } else { "RMSE" },
                format!("{:.4}", stats.rmse),
                "Standard error on the fitting scale.",
            ),
        ];

        if let Some(fc) = stats.bias_correction_factor {
            rows.push(Self::new(
                "Meyer factor",
                format!("{fc:.6}"),
                "Correction for the logarithmic bias.",
            ));
        }

        rows.push(Self::new(
            "AIC",
            stats
                .aic
                .map_or_else(not_available, |aic| format!("{}", aic.trunc() as i64)),
            "Akaike information criterion (lower is better).",
        ));
        rows.push(Self::new(
            "Durbin-Watson",
            stats
                .durbin_watson
                .map_or_else(not_available, |dw| format!("{dw:.2}")),
            "Residual autocorrelation (ideal 1.5 to 2.5).",
        ));

        rows
    }
}

fn not_available() -> String {
    "n/a".to_string()
}

impl fmt::Display for MetricRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<18} {:>12}   {}", self.metric, self.value, self.interpretation)
    }
}

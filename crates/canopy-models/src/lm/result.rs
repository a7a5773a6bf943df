//! Fit result structure
//!
//! A [`FitResult`] is produced once per successful fit or manual
//! evaluation and never changes afterwards. It carries everything the
//! charting and reporting collaborators consume.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use canopy_core::AliasMap;
use canopy_core::formula::INTERCEPT_LABEL;

use crate::base::{Coefficient, FitMethod, FitStatistics, MetricRow, ResidualStatistics};

/// Name given to fits that were not named by the caller
pub const DEFAULT_MODEL_NAME: &str = "Sem Nome";

/// Name given to manual evaluations that were not named by the caller
pub const DEFAULT_MANUAL_NAME: &str = "Manual";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub method: FitMethod,
    pub name: String,
    /// Equation as typed
    pub equation_original: String,
    /// Equation with the estimated coefficients substituted
    pub equation_fitted: String,
    pub dependent_column_name: String,
    pub is_log: bool,
    /// Coefficient value by term label (placeholder name for manual results)
    pub coefficients: IndexMap<String, f64>,
    pub coefficient_table: Vec<Coefficient>,
    #[serde(flatten)]
    pub statistics: FitStatistics,
    /// Predictions on the fitting scale (log scale for log models)
    pub fitted_values: Vec<f64>,
    /// Observations on the fitting scale, index-aligned with `fitted_values`
    pub observed_values: Vec<f64>,
    /// Predictions on the real scale, bias-corrected for log fits
    pub predicted_real: Vec<f64>,
    pub observed_real: Vec<f64>,
    /// Labels of the dataset rows the result was computed on
    pub rows: Vec<usize>,
    pub alias_map_used: AliasMap,
}

impl FitResult {
    /// Rename the result
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Observed minus fitted, on the fitting scale
    pub fn residuals(&self) -> Vec<f64> {
        self.observed_values
            .iter()
            .zip(&self.fitted_values)
            .map(|(o, f)| o - f)
            .collect()
    }

    /// Fixed metrics table for reports
    pub fn metric_rows(&self) -> Vec<MetricRow> {
        MetricRow::table(&self.statistics, self.is_log)
    }

    pub fn n_observations(&self) -> usize {
        self.statistics.n_observations
    }
}

/// Render a fitted equation: the first part as a plain number, every later
/// part with its sign, and every non-intercept part as `value*(label)`.
pub fn fitted_equation(lhs: &str, coefficients: &IndexMap<String, f64>) -> String {
    let parts: Vec<String> = coefficients
        .iter()
        .enumerate()
        .map(|(i, (label, &value))| {
            let body = if label == INTERCEPT_LABEL {
                String::new()
            } else {
                format!("*({label})")
            };
            if i == 0 {
                format!("{value:.4}{body}")
            } else {
                let sign = if value >= 0.0 { '+' } else { '-' };
                format!("{sign} {:.4}{body}", value.abs())
            }
        })
        .collect();
    format!("{lhs} = {}", parts.join(" "))
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {} ({})", self.name, self.method)?;
        writeln!(f, "=============")?;
        writeln!(f, "Equation: {}", self.equation_fitted)?;
        writeln!(f, "Dependent column: {}", self.dependent_column_name)?;
        writeln!(f, "Observations: {}", self.statistics.n_observations)?;
        writeln!(f)?;

        writeln!(f, "Metrics:")?;
        for row in self.metric_rows() {
            writeln!(f, "  {row}")?;
        }
        writeln!(f)?;

        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<24} {:>12} {:>12} {:>12} {:>12}",
            "Term", "Estimate", "Std Error", "t-value", "p-value"
        )?;
        writeln!(
            f,
            "{:-<24} {:-<12} {:-<12} {:-<12} {:-<12}",
            "", "", "", "", ""
        )?;
        for coef in &self.coefficient_table {
            writeln!(
                f,
                "{:<24} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                coef.name,
                coef.estimate,
                coef.std_error.unwrap_or(f64::NAN),
                coef.t_stat.unwrap_or(f64::NAN),
                coef.p_value.unwrap_or(f64::NAN)
            )?;
        }

        if let Some(res) = ResidualStatistics::from_residuals(&self.residuals()) {
            writeln!(f)?;
            writeln!(f, "Residuals:")?;
            writeln!(
                f,
                "  min {:.4}  Q1 {:.4}  median {:.4}  Q3 {:.4}  max {:.4}",
                res.min, res.q1, res.median, res.q3, res.max
            )?;
        }

        Ok(())
    }
}

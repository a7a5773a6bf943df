//! Equation-driven linear regression
//!
//! [`fit_formula`] runs the whole automatic pipeline for one equation:
//! parse, resolve aliases, screen, build the design matrix, solve by OLS
//! and derive the diagnostics. For a log-linear equation (`ln(Y) = ...`)
//! the model is fitted on `ln(Y)` and the real-scale error metrics are
//! computed on the predictions back-transformed with Meyer's factor.

pub mod diagnostics;
pub mod ols;
pub mod result;

#[cfg(test)]
mod tests;

// Re-exports
pub use crate::base::FitMethod;
pub use diagnostics::Diagnostics;
pub use ols::{LinearRegression, OlsEstimate};
pub use result::{DEFAULT_MANUAL_NAME, DEFAULT_MODEL_NAME, FitResult, fitted_equation};

use indexmap::{IndexMap, IndexSet};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use canopy_core::config::ScreeningConfig;
use canopy_core::data::DataFrame;
use canopy_core::design::build_from_terms;
use canopy_core::screen::screen_with;
use canopy_core::{AliasMap, Formula};

use crate::base::{FitStatistics, Result};

/// Linear model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConfig {
    /// Confidence level for coefficient intervals
    pub confidence_level: f64,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

/// Fit an equation with the default screening configuration
pub fn fit_formula(frame: &DataFrame, equation: &str, aliases: &AliasMap) -> Result<FitResult> {
    fit_formula_with(
        frame,
        equation,
        aliases,
        &ScreeningConfig::default(),
        &LinearConfig::default(),
    )
}

/// Fit an equation over `frame`, binding its symbols through `aliases`
pub fn fit_formula_with(
    frame: &DataFrame,
    equation: &str,
    aliases: &AliasMap,
    screening: &ScreeningConfig,
    config: &LinearConfig,
) -> Result<FitResult> {
    let formula = Formula::parse(equation)?;

    let dependent_column = aliases.resolve(&formula.dependent, frame)?.to_string();
    let mut columns: IndexSet<&str> = IndexSet::new();
    columns.insert(dependent_column.as_str());
    for symbol in &formula.independent {
        columns.insert(aliases.resolve(symbol, frame)?);
    }
    let columns: Vec<&str> = columns.into_iter().collect();

    let screened = screen_with(frame, &columns, screening)?;
    let terms = formula.terms();
    let design = build_from_terms(&terms, aliases, &screened)?;

    let observed = screened.float_column(&dependent_column)?;
    let response = if formula.is_log {
        observed.mapv(f64::ln)
    } else {
        observed.clone()
    };
    let (design, y) = design.align(&response)?;
    let observed_real: Array1<f64> = design.positions.iter().map(|&i| observed[i]).collect();

    let estimate = LinearRegression::new()
        .config(config.clone())
        .fit(&design.matrix, &y, design.has_intercept)?;
    let n = estimate.n_obs();
    let rmse = estimate.rmse();

    let (predicted_real, rmse_real, bias_correction_factor) = if formula.is_log {
        let fc = Diagnostics::bias_correction_factor(estimate.mse_resid);
        let predicted = Diagnostics::back_transform(&estimate.fitted_values, fc);
        let rmse_real = Diagnostics::rmse(&observed_real, &predicted);
        (predicted, Some(rmse_real), Some(fc))
    } else {
        (estimate.fitted_values.clone(), None, None)
    };
    let syx_percent = Diagnostics::syx_percent(
        rmse_real.unwrap_or(rmse),
        observed_real.mean().unwrap_or(0.0),
    );

    let coefficients: IndexMap<String, f64> = design
        .labels
        .iter()
        .cloned()
        .zip(estimate.coefficients.iter().copied())
        .collect();
    let intercept = terms.iter().position(|t| t.is_intercept());

    let statistics = FitStatistics {
        r_squared: estimate.r_squared,
        r2_adjusted: estimate.adj_r_squared,
        rmse,
        rmse_real,
        syx_percent,
        log_likelihood: Some(estimate.log_likelihood),
        aic: Some(estimate.aic),
        bic: Some(estimate.bic),
        durbin_watson: Some(Diagnostics::durbin_watson(&estimate.residuals)),
        bias_correction_factor,
        n_observations: n,
        df_resid: Some(estimate.df_resid),
    };

    log::info!(
        "fitted '{}' on {} rows: adjusted R² {:.4}, Syx {:.2}%",
        formula.original,
        n,
        statistics.r2_adjusted,
        statistics.syx_percent
    );

    Ok(FitResult {
        method: FitMethod::Ols,
        name: DEFAULT_MODEL_NAME.to_string(),
        equation_original: formula.original.clone(),
        equation_fitted: fitted_equation(&formula.lhs_display(), &coefficients),
        dependent_column_name: dependent_column,
        is_log: formula.is_log,
        coefficient_table: estimate.to_coefficients(&design.labels, intercept),
        coefficients,
        statistics,
        fitted_values: estimate.fitted_values.to_vec(),
        observed_values: y.to_vec(),
        predicted_real: predicted_real.to_vec(),
        observed_real: observed_real.to_vec(),
        rows: design.rows,
        alias_map_used: aliases.clone(),
    })
}

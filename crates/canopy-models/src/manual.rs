//! Manual coefficient evaluation
//!
//! Published equations come with their coefficients. Evaluating one over a
//! dataset needs no fit: the whole right-hand side is computed with the
//! coefficients bound as constants, and the predictions are compared with
//! the observations using the same descriptive statistics as an
//! untransformed OLS fit.
//!
//! For a log equation the predictions are exponentiated once and NOT
//! multiplied by Meyer's factor, since there is no residual variance to
//! derive one from. Results record this with `method = Manual` and leave
//! `bias_correction_factor` empty.

use indexmap::IndexMap;
use ndarray::Array1;
use serde::Serialize;

use canopy_core::data::DataFrame;
use canopy_core::design::bind_symbols;
use canopy_core::formula::ExprParser;
use canopy_core::{AliasMap, CanopyError, Formula};

use crate::base::{Coefficient, FitMethod, FitStatistics, Result};
use crate::lm::diagnostics::Diagnostics;
use crate::lm::{DEFAULT_MANUAL_NAME, FitResult};

/// Predictions and metrics over the rows where both vectors are finite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualEvaluation {
    pub predicted: Array1<f64>,
    pub r_squared: f64,
    pub rmse: f64,
    pub syx_percent: f64,
    /// Positions of the compared rows within the input vectors
    pub used: Vec<usize>,
}

/// Evaluate a right-hand side with fixed coefficients over every row of
/// `frame`. Rows with a missing input yield a non-finite prediction.
pub fn predict(
    rhs_text: &str,
    aliases: &AliasMap,
    coefficients: &IndexMap<String, f64>,
    frame: &DataFrame,
) -> Result<Array1<f64>> {
    let rhs = ExprParser::parse(rhs_text).map_err(|e| e.in_term(rhs_text))?;
    let mut env = bind_symbols([&rhs], aliases, frame)?;
    for (name, &value) in coefficients {
        env.bind_scalar(name.as_str(), value);
    }

    let value = rhs.eval(&env).map_err(|e| e.in_term(rhs_text))?;
    Ok(value.into_vector(frame.nrows()))
}

/// Compare predictions with observations
pub fn evaluate(predicted: Array1<f64>, observed: &Array1<f64>) -> Result<ManualEvaluation> {
    if predicted.len() != observed.len() {
        return Err(CanopyError::DimensionMismatch {
            expected: observed.len(),
            actual: predicted.len(),
        }
        .into());
    }

    let used: Vec<usize> = (0..observed.len())
        .filter(|&i| observed[i].is_finite() && predicted[i].is_finite())
        .collect();
    if used.is_empty() {
        return Err(CanopyError::InsufficientData {
            stage: "when comparing predictions with observations",
            remaining: 0,
            required: 1,
        }
        .into());
    }

    let obs: Array1<f64> = used.iter().map(|&i| observed[i]).collect();
    let pred: Array1<f64> = used.iter().map(|&i| predicted[i]).collect();
    let rmse = Diagnostics::rmse(&obs, &pred);

    Ok(ManualEvaluation {
        r_squared: Diagnostics::r_squared(&obs, &pred),
        syx_percent: Diagnostics::syx_percent(rmse, obs.mean().unwrap_or(0.0)),
        rmse,
        predicted,
        used,
    })
}

/// Evaluate a full equation with user-supplied coefficients over the
/// unscreened dataset
pub fn evaluate_manual(
    frame: &DataFrame,
    equation: &str,
    aliases: &AliasMap,
    coefficients: &IndexMap<String, f64>,
) -> Result<FitResult> {
    let formula = Formula::parse(equation)?;
    let dependent_column = aliases.resolve(&formula.dependent, frame)?.to_string();
    let observed = frame.float_column(&dependent_column)?;

    let mut predicted = predict(&formula.rhs_text, aliases, coefficients, frame)?;
    if formula.is_log {
        predicted.mapv_inplace(f64::exp);
    }

    let evaluation = evaluate(predicted, &observed)?;
    let n = evaluation.used.len();
    let observed_used: Vec<f64> = evaluation.used.iter().map(|&i| observed[i]).collect();
    let predicted_used: Vec<f64> = evaluation
        .used
        .iter()
        .map(|&i| evaluation.predicted[i])
        .collect();

    log::info!(
        "evaluated '{}' with fixed coefficients on {} rows: R² {:.4}, Syx {:.2}%",
        equation,
        n,
        evaluation.r_squared,
        evaluation.syx_percent
    );

    let statistics = FitStatistics {
        r_squared: evaluation.r_squared,
        r2_adjusted: evaluation.r_squared,
        rmse: evaluation.rmse,
        rmse_real: None,
        syx_percent: evaluation.syx_percent,
        log_likelihood: None,
        aic: None,
        bic: None,
        durbin_watson: None,
        bias_correction_factor: None,
        n_observations: n,
        df_resid: None,
    };

    Ok(FitResult {
        method: FitMethod::Manual,
        name: DEFAULT_MANUAL_NAME.to_string(),
        equation_original: equation.to_string(),
        equation_fitted: format!("Manual: {equation}"),
        dependent_column_name: dependent_column,
        is_log: formula.is_log,
        coefficient_table: coefficients
            .iter()
            .map(|(name, &value)| Coefficient::new(name.as_str(), value))
            .collect(),
        coefficients: coefficients.clone(),
        statistics,
        fitted_values: predicted_used.clone(),
        observed_values: observed_used.clone(),
        predicted_real: predicted_used,
        observed_real: observed_used,
        rows: evaluation.used.iter().map(|&i| frame.index()[i]).collect(),
        alias_map_used: aliases.clone(),
    })
}

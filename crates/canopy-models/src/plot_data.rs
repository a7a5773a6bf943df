//! Chart-ready series for a fit result
//!
//! Renderers draw three charts from a result: observed against predicted
//! with a 1:1 reference line, residual percent against predicted with a
//! zero line, and, when a diameter-like alias exists, a trend chart against
//! that variable. This module computes the data; drawing is left to them.

use serde::Serialize;

use canopy_core::data::DataFrame;
use canopy_core::{AliasMap, CanopyError};

use crate::base::Result;
use crate::lm::FitResult;

/// Column-name fragments that mark a diameter-like variable
const DIAMETER_HINTS: &[&str] = &["dap", "dbh", "diam"];

/// Values of the trend variable for the fitted rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub alias: String,
    pub column: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticSeries {
    /// Real-scale observations
    pub observed: Vec<f64>,
    /// Real-scale predictions
    pub predicted: Vec<f64>,
    /// `(min, max)` over both vectors, the extent of the 1:1 line
    pub identity_line: (f64, f64),
    /// `(predicted - observed) / observed · 100`
    pub residual_percent: Vec<f64>,
    /// Reference level of the residual chart
    pub residual_reference: f64,
    pub trend: Option<TrendSeries>,
}

impl DiagnosticSeries {
    /// Build the series of `result`. `frame` is the working dataset the
    /// result was computed from; trend values are taken from its rows that
    /// the result used.
    pub fn build(result: &FitResult, frame: &DataFrame, aliases: &AliasMap) -> Result<Self> {
        let observed = result.observed_real.clone();
        let predicted = result.predicted_real.clone();

        let identity_line = observed
            .iter()
            .chain(&predicted)
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        let residual_percent = observed
            .iter()
            .zip(&predicted)
            .map(|(o, p)| (p - o) / o * 100.0)
            .collect();

        let trend = match trend_alias(aliases) {
            Some((alias, column)) if frame.has_column(column) => {
                let values = frame
                    .filter_labels(&result.rows)?
                    .float_column(column)?
                    .to_vec();
                if values.len() != observed.len() {
                    return Err(CanopyError::DimensionMismatch {
                        expected: observed.len(),
                        actual: values.len(),
                    }
                    .into());
                }
                Some(TrendSeries {
                    alias: alias.to_string(),
                    column: column.to_string(),
                    values,
                })
            }
            _ => None,
        };

        Ok(Self {
            observed,
            predicted,
            identity_line,
            residual_percent,
            residual_reference: 0.0,
            trend,
        })
    }
}

/// First alias bound to a diameter-like column
fn trend_alias(aliases: &AliasMap) -> Option<(&str, &str)> {
    aliases.iter().find(|(_, column)| {
        let lower = column.to_lowercase();
        DIAMETER_HINTS.iter().any(|hint| lower.contains(hint))
    })
}

//! Model fitting for Canopy
//!
//! Ordinary least squares over the design matrices built by `canopy-core`,
//! with the diagnostics foresters read off an allometric fit (adjusted R²,
//! Syx%, AIC/BIC, Durbin-Watson, Meyer's bias correction for log models),
//! a manual evaluator for published coefficients, chart-ready series and
//! the session that ties a dataset, its aliases and the fitted models
//! together.

pub mod base;
pub mod error;
pub mod lm;
pub mod manual;
pub mod plot_data;
pub mod session;

pub use base::{Coefficient, FitStatistics, Result};
pub use error::ModelError;
pub use lm::{FitMethod, FitResult, LinearConfig, LinearRegression, fit_formula, fit_formula_with};
pub use manual::{ManualEvaluation, evaluate_manual};
pub use plot_data::DiagnosticSeries;
pub use session::Session;

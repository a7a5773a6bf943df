//! Coefficient definition

use serde::{Deserialize, Serialize};

/// Coefficient estimate with its inference, when a fit provides one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Term label (`const` for the intercept) or placeholder name for
    /// manually supplied values
    pub name: String,
    pub estimate: f64,
    pub std_error: Option<f64>,
    pub t_stat: Option<f64>,
    pub p_value: Option<f64>,
    /// Lower bound of the confidence interval at the configured level
    pub ci_lower: Option<f64>,
    /// Upper bound of the confidence interval at the configured level
    pub ci_upper: Option<f64>,
    pub is_intercept: bool,
}

impl Coefficient {
    pub fn new(name: impl Into<String>, estimate: f64) -> Self {
        Self {
            name: name.into(),
            estimate,
            std_error: None,
            t_stat: None,
            p_value: None,
            ci_lower: None,
            ci_upper: None,
            is_intercept: false,
        }
    }

    pub fn with_std_error(mut self, se: f64) -> Self {
        self.std_error = Some(se);
        self
    }

    pub fn with_t_stat(mut self, t: f64) -> Self {
        self.t_stat = Some(t);
        self
    }

    pub fn with_p_value(mut self, p: f64) -> Self {
        self.p_value = Some(p);
        self
    }

    pub fn with_ci(mut self, lower: f64, upper: f64) -> Self {
        self.ci_lower = Some(lower);
        self.ci_upper = Some(upper);
        self
    }

    /// Mark as intercept
    pub fn as_intercept(mut self) -> Self {
        self.is_intercept = true;
        self
    }
}

//! Advisory data-quality audit
//!
//! The audit only reports; it never changes the dataset and has no
//! influence on screening or fitting.

use serde::Serialize;

use super::*;

/// Number of non-missing values a column needs before outliers are checked
const MIN_VALUES_FOR_OUTLIERS: usize = 10;
const OUTLIER_IQR_FACTOR: f64 = 3.0;

/// A single audit observation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Cells that are empty or could not be read as numbers
    MissingValues { column: String, count: usize },
    /// Zero or negative measurements
    NonPositive { column: String, count: usize },
    /// Largest value above `Q3 + 3·IQR`
    SuspectMaximum { column: String, value: f64 },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::MissingValues { column, count } => write!(
                f,
                "column '{column}': {count} empty or invalid cell(s)"
            ),
            Finding::NonPositive { column, count } => write!(
                f,
                "column '{column}': {count} zero or negative value(s), impossible for physical measurements"
            ),
            Finding::SuspectMaximum { column, value } => write!(
                f,
                "column '{column}': suspect value {value:.2}, far above the typical range"
            ),
        }
    }
}

/// Findings grouped by severity
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    /// Problems that will cost rows in any fit
    pub critical: Vec<Finding>,
    /// Suspicious but possibly legitimate values
    pub warning: Vec<Finding>,
}

impl AuditReport {
    /// True when nothing was found
    pub fn is_clean(&self) -> bool {
        self.critical.is_empty() && self.warning.is_empty()
    }
}

/// Inspect every numeric column of a dataset
pub fn audit(frame: &DataFrame) -> AuditReport {
    let mut report = AuditReport::default();

    for (name, series) in frame.iter() {
        let Series::Float(values) = series else {
            continue;
        };

        let missing = series.missing_count();
        if missing > 0 {
            report.critical.push(Finding::MissingValues {
                column: name.to_string(),
                count: missing,
            });
        }

        let non_positive = values.iter().filter(|&&v| v <= 0.0).count();
        if non_positive > 0 {
            report.critical.push(Finding::NonPositive {
                column: name.to_string(),
                count: non_positive,
            });
        }

        let valid = series.valid_values();
        if valid.len() > MIN_VALUES_FOR_OUTLIERS {
            if let (Some(q1), Some(q3)) = (quantile(&valid, 0.25), quantile(&valid, 0.75)) {
                let iqr = q3 - q1;
                let upper = q3 + OUTLIER_IQR_FACTOR * iqr;
                let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if iqr > 0.0 && max > upper {
                    report.warning.push(Finding::SuspectMaximum {
                        column: name.to_string(),
                        value: max,
                    });
                }
            }
        }
    }

    if !report.is_clean() {
        log::debug!(
            "audit: {} critical, {} warning finding(s)",
            report.critical.len(),
            report.warning.len()
        );
    }
    report
}

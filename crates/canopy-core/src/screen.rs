//! Row screening before a fit
//!
//! Two stages run over the columns an equation uses:
//!
//! 1. **Physical validity.** Each column is coerced to numbers and every
//!    value `<= 0` is treated as missing; rows missing any column are dropped.
//! 2. **Gross outliers.** While at least `min_rows_for_outliers` rows remain,
//!    bounds `[Q1 - k·IQR, Q3 + k·IQR]` are computed for every column from the
//!    current rows (columns with a zero IQR are skipped) and rows outside any
//!    bound are dropped together. Sweeps repeat until one removes nothing.
//!    Every sweep after the first recomputes the bounds from the rows that
//!    survived, so it can narrow them and drop rows that were inside the
//!    first sweep's bounds. Screening an already screened dataset is a
//!    no-op.
//!
//! The input dataset is never modified. Row labels survive screening.

use crate::config::ScreeningConfig;
use crate::data::{DataFrame, Series, quantile};
use crate::error::{CanopyError, Result};

/// Screen with the default configuration
pub fn screen<S: AsRef<str>>(frame: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    screen_with(frame, columns, &ScreeningConfig::default())
}

/// Screen `frame` on the given columns
pub fn screen_with<S: AsRef<str>>(
    frame: &DataFrame,
    columns: &[S],
    config: &ScreeningConfig,
) -> Result<DataFrame> {
    let columns: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    let initial = frame.nrows();

    let mut screened = frame.clone();
    for &name in &columns {
        let values = frame
            .float_column(name)?
            .mapv(|v| if v > 0.0 { v } else { f64::NAN });
        screened.replace_column(name, Series::Float(values))?;
    }

    let valid: Vec<bool> = (0..screened.nrows())
        .map(|row| {
            columns
                .iter()
                .all(|name| !screened.get_column(name).is_some_and(|s| s.is_missing(row)))
        })
        .collect();
    screened = screened.filter(&valid)?;

    let after_positivity = screened.nrows();
    if after_positivity < initial {
        log::warn!(
            "screening: {} row(s) dropped for missing or non-positive values",
            initial - after_positivity
        );
    }

    while screened.nrows() >= config.min_rows_for_outliers {
        let mut keep = vec![true; screened.nrows()];

        for &name in &columns {
            let values = screened.float_column(name)?.to_vec();
            let Some((lower, upper)) = outlier_bounds(&values, config.iqr_factor) else {
                continue;
            };
            for (flag, &v) in keep.iter_mut().zip(values.iter()) {
                if v < lower || v > upper {
                    *flag = false;
                }
            }
        }

        if keep.iter().all(|&k| k) {
            break;
        }
        screened = screened.filter(&keep)?;
    }

    if screened.nrows() < after_positivity {
        log::warn!(
            "screening: {} row(s) dropped as gross outliers",
            after_positivity - screened.nrows()
        );
    }

    if screened.nrows() < config.min_rows {
        return Err(CanopyError::InsufficientData {
            stage: "after screening",
            remaining: screened.nrows(),
            required: config.min_rows,
        });
    }

    log::debug!("screening kept {} of {} rows", screened.nrows(), initial);
    Ok(screened)
}

/// Inclusive outlier bounds, or `None` when the IQR is zero
pub fn outlier_bounds(values: &[f64], factor: f64) -> Option<(f64, f64)> {
    let q1 = quantile(values, 0.25)?;
    let q3 = quantile(values, 0.75)?;
    let iqr = q3 - q1;
    if iqr > 0.0 {
        Some((q1 - factor * iqr, q3 + factor * iqr))
    } else {
        None
    }
}

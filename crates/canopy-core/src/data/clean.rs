//! Normalisation of raw spreadsheet tables into a [`DataFrame`]
//!
//! Cleaning never fails on malformed cells: anything that cannot be
//! interpreted becomes a missing value. The steps, in order:
//!
//! 1. replace a header that looks like data with the first data row
//! 2. de-duplicate column names (`Name`, `Name_2`, `Name_3`, ...)
//! 3. trim text, then drop all-missing columns and all-missing rows
//! 4. resolve each column's type (datetime columns are nulled, numeric
//!    columns lose infinities, text columns are coerced to numbers when
//!    enough cells parse)

use std::collections::HashMap;

use crate::config::CleaningConfig;

use super::*;

/// Clean a raw table with the default configuration
pub fn clean(raw: &RawTable) -> DataFrame {
    clean_with(raw, &CleaningConfig::default())
}

/// Clean a raw table
pub fn clean_with(raw: &RawTable, config: &CleaningConfig) -> DataFrame {
    let width = raw
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(raw.ncols()))
        .max()
        .unwrap_or(0);

    let mut headers: Vec<String> = (0..width)
        .map(|i| match raw.headers.get(i) {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => unnamed(i),
        })
        .collect();
    let mut first_row = 0;

    if !looks_like_header(&headers) && raw.nrows() > 0 {
        log::warn!("header row looks like data; promoting the first data row to header");
        headers = (0..width)
            .map(|i| match raw.cell(0, i) {
                RawCell::Missing => unnamed(i),
                cell => {
                    let name = cell.to_string();
                    let name = name.trim();
                    if name.is_empty() { unnamed(i) } else { name.to_string() }
                }
            })
            .collect();
        first_row = 1;
    }

    let headers = unique_names(&headers);

    let mut columns: Vec<(String, Vec<RawCell>)> = headers
        .into_iter()
        .enumerate()
        .map(|(col, name)| {
            let cells = (first_row..raw.nrows())
                .map(|row| trim_cell(raw.cell(row, col)))
                .collect();
            (name, cells)
        })
        .collect();

    let before = columns.len();
    columns.retain(|(_, cells)| cells.iter().any(|c| !c.is_missing()));
    if columns.len() < before {
        log::debug!("dropped {} empty column(s)", before - columns.len());
    }

    let nrows = raw.nrows().saturating_sub(first_row);
    let keep: Vec<usize> = (0..nrows)
        .filter(|&row| columns.iter().any(|(_, cells)| !cells[row].is_missing()))
        .collect();
    if keep.len() < nrows {
        log::debug!("dropped {} empty row(s)", nrows - keep.len());
    }

    let mut frame = DataFrame::new();
    for (name, cells) in columns {
        let cells: Vec<RawCell> = keep.iter().map(|&row| cells[row].clone()).collect();
        let series = resolve_column(&name, &cells, config);
        // names are unique after `unique_names`, lengths are equal by construction
        match frame.with_column(name, series) {
            Ok(next) => frame = next,
            Err(e) => {
                log::error!("cleaner produced an inconsistent column: {e}");
                return DataFrame::new();
            }
        }
    }

    log::debug!(
        "cleaned table: {} rows, {} columns",
        frame.nrows(),
        frame.ncols()
    );
    frame
}

fn unnamed(position: usize) -> String {
    format!("Unnamed: {position}")
}

/// Whether the given names read like a real header line
fn looks_like_header(names: &[String]) -> bool {
    let auto_generated = |name: &String| {
        let name = name.trim();
        name.is_empty() || name.to_lowercase().starts_with("unnamed")
    };
    if names.iter().all(auto_generated) {
        return false;
    }

    let numeric = names
        .iter()
        .filter(|name| name.trim().replace(',', ".").parse::<f64>().is_ok())
        .count();
    if numeric as f64 > names.len() as f64 * 0.5 {
        return false;
    }

    names.iter().any(|name| name.chars().any(char::is_alphabetic))
}

/// Suffix repeated names with a running counter per trimmed base name
fn unique_names(names: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            let base = name.trim().to_string();
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 { base } else { format!("{base}_{count}") }
        })
        .collect()
}

fn trim_cell(cell: &RawCell) -> RawCell {
    match cell {
        RawCell::Text(s) => RawCell::from_text(s.trim()),
        RawCell::DateTime(s) if s.trim().is_empty() => RawCell::Missing,
        other => other.clone(),
    }
}

fn resolve_column(name: &str, cells: &[RawCell], config: &CleaningConfig) -> Series {
    let present: Vec<&RawCell> = cells.iter().filter(|c| !c.is_missing()).collect();

    if present.iter().all(|c| matches!(c, RawCell::DateTime(_))) {
        log::warn!("column '{name}' holds dates; its values are discarded");
        return Series::missing(cells.len());
    }

    if present.iter().all(|c| matches!(c, RawCell::Number(_))) {
        return Series::float(
            cells
                .iter()
                .map(|c| match c {
                    RawCell::Number(v) if v.is_finite() => *v,
                    _ => f64::NAN,
                })
                .collect::<Vec<_>>(),
        );
    }

    let text: TextArray = cells
        .iter()
        .map(|c| if c.is_missing() { None } else { Some(c.to_string()) })
        .collect();

    let decimal_comma = text.iter().flatten().any(|s| s.contains(','));
    let converted: FloatArray = text
        .iter()
        .map(|cell| {
            cell.as_deref()
                .and_then(|s| {
                    if decimal_comma {
                        super::series::parse_number(&s.replace('.', "").replace(',', "."))
                    } else {
                        super::series::parse_number(s)
                    }
                })
                .unwrap_or(f64::NAN)
        })
        .collect();

    let parsed = converted.iter().filter(|v| !v.is_nan()).count();
    let ratio = if present.is_empty() {
        0.0
    } else {
        parsed as f64 / present.len() as f64
    };

    if ratio >= config.numeric_ratio {
        if parsed < present.len() {
            log::debug!(
                "column '{name}': {} of {} cells did not parse as numbers",
                present.len() - parsed,
                present.len()
            );
        }
        Series::Float(converted)
    } else {
        Series::text_opt(text)
    }
}

//! Series data structure for holding one column of a dataset
//!
//! A Series is either numeric (missing values are `NaN`) or textual
//! (missing values are `None`).

use super::*;

/// A typed, one-dimensional column of data
#[derive(Clone, Debug, PartialEq)]
pub enum Series {
    /// Floating point numbers, `NaN` marks a missing cell
    Float(FloatArray),
    /// Free text, `None` marks a missing cell
    Text(TextArray),
}

impl Series {
    /// Create a new Float series
    pub fn float(data: impl Into<FloatArray>) -> Self {
        Series::Float(data.into())
    }

    /// Create a new Text series with no missing cells
    pub fn text<S: Into<String>>(data: impl IntoIterator<Item = S>) -> Self {
        Series::Text(data.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Create a Text series that may contain missing cells
    pub fn text_opt(data: TextArray) -> Self {
        Series::Text(data)
    }

    /// Create a numeric series where every cell is missing
    pub fn missing(len: usize) -> Self {
        Series::Float(FloatArray::from_elem(len, f64::NAN))
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        match self {
            Series::Float(arr) => arr.len(),
            Series::Text(arr) => arr.len(),
        }
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name of the series
    pub fn dtype(&self) -> &'static str {
        match self {
            Series::Float(_) => "float64",
            Series::Text(_) => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Series::Float(_))
    }

    /// Get a value at index
    pub fn get(&self, idx: usize) -> Option<SeriesValue> {
        if idx >= self.len() {
            return None;
        }

        let value = match self {
            Series::Float(arr) if arr[idx].is_nan() => SeriesValue::Missing,
            Series::Float(arr) => SeriesValue::Float(arr[idx]),
            Series::Text(arr) => match &arr[idx] {
                Some(s) => SeriesValue::Text(s.clone()),
                None => SeriesValue::Missing,
            },
        };
        Some(value)
    }

    /// Whether the cell at `idx` is missing
    pub fn is_missing(&self, idx: usize) -> bool {
        match self {
            Series::Float(arr) => arr.get(idx).is_none_or(|v| v.is_nan()),
            Series::Text(arr) => arr.get(idx).is_none_or(|v| v.is_none()),
        }
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_missing(i)).count()
    }

    /// Whether every cell is missing
    pub fn is_all_missing(&self) -> bool {
        self.missing_count() == self.len()
    }

    /// Filter the series with a boolean mask
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.len()),
                actual: format!("mask length {}", mask.len()),
            });
        }

        match self {
            Series::Float(arr) => {
                let filtered: FloatArray = arr
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, keep)| **keep)
                    .map(|(&val, _)| val)
                    .collect();
                Ok(Series::Float(filtered))
            }
            Series::Text(arr) => {
                let filtered: TextArray = arr
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, keep)| **keep)
                    .map(|(val, _)| val.clone())
                    .collect();
                Ok(Series::Text(filtered))
            }
        }
    }

    /// Coerce to a numeric array. Text cells that do not parse as a finite
    /// number become `NaN`; numeric infinities also become `NaN`.
    pub fn to_float(&self) -> FloatArray {
        match self {
            Series::Float(arr) => arr.mapv(|v| if v.is_finite() { v } else { f64::NAN }),
            Series::Text(arr) => arr
                .iter()
                .map(|cell| cell.as_deref().and_then(parse_number).unwrap_or(f64::NAN))
                .collect(),
        }
    }

    /// Non-missing numeric values, in row order
    pub fn valid_values(&self) -> Vec<f64> {
        match self {
            Series::Float(arr) => arr.iter().copied().filter(|v| !v.is_nan()).collect(),
            Series::Text(_) => Vec::new(),
        }
    }

    /// Compute basic statistics for numeric series, ignoring missing cells
    pub fn describe(&self) -> SeriesStats {
        match self {
            Series::Float(_) => {
                let values = self.valid_values();
                if values.is_empty() {
                    return SeriesStats::empty();
                }

                let arr = FloatArray::from(values.clone());
                SeriesStats {
                    count: arr.len(),
                    mean: arr.mean().unwrap_or(f64::NAN),
                    std: if arr.len() > 1 { arr.std(1.0) } else { f64::NAN },
                    min: arr.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
                    q25: quantile(&values, 0.25).unwrap_or(f64::NAN),
                    q50: quantile(&values, 0.5).unwrap_or(f64::NAN),
                    q75: quantile(&values, 0.75).unwrap_or(f64::NAN),
                    max: arr.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
                }
            }
            Series::Text(arr) => SeriesStats {
                count: arr.iter().filter(|v| v.is_some()).count(),
                ..SeriesStats::empty()
            },
        }
    }
}

/// Parse a trimmed cell as a finite number
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Quantile with linear interpolation between order statistics.
///
/// Returns `None` for an empty slice. `NaN` values must be removed first.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let index = (sorted.len() as f64 - 1.0) * q;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        Some(sorted[lower])
    } else {
        let weight = index - lower as f64;
        Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
    }
}

/// Statistical summary of a series
#[derive(Debug, Clone)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl SeriesStats {
    pub(crate) fn empty() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            q50: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Enum for type-safe value access
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Float(f64),
    Text(String),
    Missing,
}

impl std::fmt::Display for SeriesValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesValue::Float(v) => write!(f, "{}", v),
            SeriesValue::Text(v) => write!(f, "{}", v),
            SeriesValue::Missing => write!(f, "NA"),
        }
    }
}

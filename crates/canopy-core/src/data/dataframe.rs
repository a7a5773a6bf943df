//! DataFrame implementation for tabular data
//!
//! A DataFrame is an ordered set of uniquely named columns sharing one row
//! count. Every row carries a label (its position in the originally loaded
//! table) which survives filtering, so two filtered frames derived from the
//! same data can be aligned by label.

use super::*;

use indexmap::IndexMap;

/// Main DataFrame structure
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrame {
    pub(crate) columns: IndexMap<String, Series>,
    pub(crate) index: Vec<usize>,
    pub(crate) nrows: usize,
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
            index: Vec::new(),
            nrows: 0,
        }
    }

    /// Create DataFrame from columns
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        let mut builder = DataFrameBuilder::new();

        for (name, series) in columns.into_iter() {
            builder = builder.with_column(name, series)?;
        }

        builder.build()
    }

    /// Get the shape of the DataFrame (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.columns.len())
    }

    /// Get the number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Get the number of columns
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Row labels, one per row
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Get a reference to a column
    pub fn get_column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Check if column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterate over `(name, series)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A column coerced to numbers (see [`Series::to_float`])
    pub fn float_column(&self, name: &str) -> Result<FloatArray> {
        self.columns
            .get(name)
            .map(Series::to_float)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Select specific columns
    pub fn select<I, S>(&self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = DataFrameBuilder::new().with_index(self.index.clone());

        for name in names.into_iter() {
            let name = name.as_ref();
            match self.columns.get(name) {
                Some(series) => {
                    builder = builder.with_column(name, series.clone())?;
                }
                None => {
                    return Err(DataError::ColumnNotFound(name.to_string()));
                }
            }
        }

        builder.build()
    }

    /// Filter rows with a boolean mask, keeping row labels
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.nrows),
                actual: format!("mask length {}", mask.len()),
            });
        }

        let mut columns = IndexMap::with_capacity(self.columns.len());
        for (name, series) in &self.columns {
            columns.insert(name.clone(), series.filter(mask)?);
        }

        let index: Vec<usize> = self
            .index
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(&label, _)| label)
            .collect();

        Ok(Self {
            nrows: index.len(),
            columns,
            index,
        })
    }

    /// Keep only the rows whose label is in `labels`
    pub fn filter_labels(&self, labels: &[usize]) -> Result<Self> {
        let wanted: std::collections::HashSet<usize> = labels.iter().copied().collect();
        let mask: Vec<bool> = self.index.iter().map(|l| wanted.contains(l)).collect();
        self.filter(&mask)
    }

    /// Add a new column
    pub fn with_column<S: Into<String>>(mut self, name: S, series: Series) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        if !self.columns.is_empty() && series.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", series.len()),
            });
        }

        if self.columns.is_empty() {
            self.nrows = series.len();
            self.index = (0..self.nrows).collect();
        }

        self.columns.insert(name, series);
        Ok(self)
    }

    /// Replace the contents of an existing column, keeping its position
    pub fn replace_column(&mut self, name: &str, series: Series) -> Result<()> {
        if series.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", series.len()),
            });
        }

        match self.columns.get_mut(name) {
            Some(slot) => {
                *slot = series;
                Ok(())
            }
            None => Err(DataError::ColumnNotFound(name.to_string())),
        }
    }

    /// Names of the numeric columns, in column order
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, s)| s.is_numeric())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Get a value from a cell
    pub fn value(&self, row: usize, col: &str) -> Result<SeriesValue> {
        let series = self
            .columns
            .get(col)
            .ok_or_else(|| DataError::ColumnNotFound(col.to_string()))?;
        series.get(row).ok_or(DataError::IndexOutOfBounds {
            index: row,
            len: self.nrows,
        })
    }
}

impl std::fmt::Display for DataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataFrame({} rows × {} cols)", self.nrows, self.ncols())
    }
}

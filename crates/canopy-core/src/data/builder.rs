//! Builder pattern for constructing DataFrames

use indexmap::IndexMap;

use super::*;

/// Builder for creating DataFrames
#[derive(Default)]
pub struct DataFrameBuilder {
    columns: IndexMap<String, Series>,
    nrows: Option<usize>,
    index: Option<Vec<usize>>,
}

impl DataFrameBuilder {
    /// Create a new DataFrameBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column to the DataFrame
    pub fn with_column<S: Into<String>>(mut self, name: S, series: Series) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        // Check dimension consistency
        match self.nrows {
            Some(n) if series.len() != n => {
                return Err(DataError::DimensionMismatch {
                    expected: format!("{} rows", n),
                    actual: format!("{} rows", series.len()),
                });
            }
            None => {
                self.nrows = Some(series.len());
            }
            _ => {}
        }

        self.columns.insert(name, series);
        Ok(self)
    }

    /// Set explicit row labels
    pub fn with_index(mut self, index: Vec<usize>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the DataFrame
    pub fn build(self) -> Result<DataFrame> {
        let nrows = match (self.nrows, &self.index) {
            (Some(n), _) => n,
            (None, Some(index)) if self.columns.is_empty() => index.len(),
            (None, _) => 0,
        };

        let index = match self.index {
            Some(index) if index.len() == nrows => index,
            Some(index) => {
                return Err(DataError::DimensionMismatch {
                    expected: format!("index of {} labels", nrows),
                    actual: format!("{} labels", index.len()),
                });
            }
            None => (0..nrows).collect(),
        };

        Ok(DataFrame {
            columns: self.columns,
            index,
            nrows,
        })
    }
}

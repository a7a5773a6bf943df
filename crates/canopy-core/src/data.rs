//! Tabular data structures for Canopy
//!
//! This module holds the cleaned dataset model (`DataFrame` of `Series`),
//! the raw spreadsheet representation handed over by file readers, and the
//! routines that turn one into the other.

mod audit;
mod builder;
mod clean;
mod dataframe;
pub mod io;
mod raw;
mod series;

#[cfg(test)]
mod tests;

// Re-exports
pub use audit::{AuditReport, Finding, audit};
pub use builder::DataFrameBuilder;
pub use clean::{clean, clean_with};
pub use dataframe::DataFrame;
pub use raw::{RawCell, RawTable};
pub use series::{Series, SeriesStats, SeriesValue, quantile};

// Type aliases for common use cases
pub type FloatArray = ndarray::Array1<f64>;
pub type TextArray = Vec<Option<String>>;
pub type Matrix = ndarray::Array2<f64>;

/// Error types specific to data operations
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Index out of bounds: index {index}, length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Failed to read tabular input: {0}")]
    Read(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;

//! Types shared by every fitting method
//!
//! A fit, automatic or manual, is described by its coefficient table, its
//! summary statistics and the fixed metrics table that reports are built
//! from.

pub use coefficient::Coefficient;
pub use statistics::{FitStatistics, ResidualStatistics};
pub use summary::{FitMethod, MetricRow};

pub use crate::error::ModelError;

pub mod coefficient;
pub mod statistics;
pub mod summary;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

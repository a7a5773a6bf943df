//! Model-related error types

use thiserror::Error;

use canopy_core::data::DataError;
use canopy_core::error::{CanopyError, ErrorKind};

/// Model-related errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// A pipeline stage before the solve failed
    #[error(transparent)]
    Pipeline(#[from] CanopyError),

    /// Numerical computation error
    #[error("Numerical error: {message} (operation: {operation})")]
    NumericalError {
        /// Error message
        message: String,
        /// Operation that failed
        operation: String,
    },

    /// A session operation needs a dataset first
    #[error("No dataset loaded")]
    NoDataset,

    /// A session operation needs a current result first
    #[error("No current result to save")]
    NoResult,
}

impl ModelError {
    pub(crate) fn numerical(operation: &str, message: impl Into<String>) -> Self {
        ModelError::NumericalError {
            message: message.into(),
            operation: operation.to_string(),
        }
    }

    /// Pipeline error kind, if this error came from a pipeline stage
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ModelError::Pipeline(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<DataError> for ModelError {
    fn from(e: DataError) -> Self {
        ModelError::Pipeline(CanopyError::Data(e))
    }
}

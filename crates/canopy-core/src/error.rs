use crate::data::DataError;

/// Pipeline error taxonomy shared by every stage
#[derive(thiserror::Error, Debug)]
pub enum CanopyError {
    /// The equation text does not have the `[ln(]Y[)] = EXPR` shape
    #[error("Format error: {0}")]
    Format(String),

    /// A formula symbol has no alias, or the alias points at a missing column
    #[error("Alias '{alias}' could not be resolved: {reason}")]
    AliasResolution { alias: String, reason: String },

    /// A right-hand-side term could not be evaluated
    #[error("Error evaluating term '{term}': {message}")]
    TermEvaluation { term: String, message: String },

    #[error("Insufficient data: {remaining} valid rows remain {stage}, at least {required} required")]
    InsufficientData {
        stage: &'static str,
        remaining: usize,
        required: usize,
    },

    #[error("Dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Kind of a [`CanopyError`], for callers that branch on the failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    AliasResolution,
    TermEvaluation,
    InsufficientData,
    DimensionMismatch,
    Data,
}

impl CanopyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CanopyError::Format(_) => ErrorKind::Format,
            CanopyError::AliasResolution { .. } => ErrorKind::AliasResolution,
            CanopyError::TermEvaluation { .. } => ErrorKind::TermEvaluation,
            CanopyError::InsufficientData { .. } => ErrorKind::InsufficientData,
            CanopyError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            CanopyError::Data(_) => ErrorKind::Data,
        }
    }

    pub fn alias(alias: impl Into<String>, reason: impl Into<String>) -> Self {
        CanopyError::AliasResolution {
            alias: alias.into(),
            reason: reason.into(),
        }
    }

    pub fn term(term: impl Into<String>, message: impl Into<String>) -> Self {
        CanopyError::TermEvaluation {
            term: term.into(),
            message: message.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, CanopyError>;

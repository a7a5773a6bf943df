//! Formula-specific error types
//!
//! These errors describe problems inside a right-hand-side expression. The
//! pipeline reports them as [`CanopyError::TermEvaluation`] tagged with the
//! text of the offending term.

use thiserror::Error;

use crate::error::CanopyError;

/// Errors that can occur while parsing or evaluating an expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Syntax errors in the expression text
    #[error("Syntax error at position {position}: {message}")]
    Syntax {
        position: usize,
        message: String,
        context: Option<String>,
    },

    /// A function outside the supported vocabulary
    #[error("Unknown function '{name}' at position {position} (supported: ln, log, exp, sqrt)")]
    UnknownFunction { name: String, position: usize },

    /// A symbol with no value bound during evaluation
    #[error("Unknown symbol '{name}'")]
    UnknownSymbol { name: String },

    /// Two vector operands of different lengths
    #[error("Dimension mismatch: {left} values against {right} values")]
    LengthMismatch { left: usize, right: usize },
}

/// Result type alias for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

impl FormulaError {
    /// Create a syntax error
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        FormulaError::Syntax {
            position,
            message: message.into(),
            context: None,
        }
    }

    /// Create a syntax error with context
    pub fn syntax_with_context(
        position: usize,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        FormulaError::Syntax {
            position,
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Report this error against the term whose text is `term`
    pub fn in_term(self, term: impl Into<String>) -> CanopyError {
        CanopyError::term(term, self.to_string())
    }
}

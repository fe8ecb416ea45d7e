//! Evaluator error types.

use thiserror::Error;

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// Syntax error, wrong function arity, or a non-finite result.
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// A construct outside the allow-list (names, attributes, assignment, ...).
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("division by zero")]
    DivisionByZero,
}

impl EvaluationError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidExpression(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }
}

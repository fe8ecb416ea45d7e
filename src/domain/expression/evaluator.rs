//! Entry point for safe arithmetic evaluation.

use super::{parser, EvaluationError, Number};

/// Parses and evaluates an arithmetic expression.
///
/// Only numbers, parentheses, the operators `+ - * / // % ^ **`, the
/// constants `pi` and `e`, and a fixed set of math functions are accepted.
/// Anything else is rejected before evaluation starts.
///
/// # Errors
///
/// - `InvalidExpression` for syntax errors, wrong arity, or non-finite results
/// - `UnsupportedOperation` for names, attribute access, assignment, etc.
/// - `DivisionByZero` when a divisor evaluates to zero
pub fn evaluate(expression: &str) -> Result<Number, EvaluationError> {
    parser::parse(expression)?.evaluate()
}

//! Expression module - safe arithmetic evaluation for the calculator tool.
//!
//! Input text is tokenized, parsed into a closed syntax tree ([`Expr`]) and
//! walked. Only enumerated operators, constants and functions exist in the
//! tree, so nothing outside that set can ever run.
//!
//! # Example
//!
//! ```
//! use tool_agent::domain::expression::{evaluate, Number};
//!
//! assert_eq!(evaluate("(10 + 5) * 2 - 3").unwrap(), Number::Integer(27));
//! assert!(evaluate("__import__('os')").is_err());
//! ```

mod ast;
mod errors;
mod evaluator;
mod lexer;
mod number;
mod parser;

pub use ast::{BinaryOp, Constant, Expr, Function, UnaryOp};
pub use errors::EvaluationError;
pub use evaluator::evaluate;
pub use number::Number;
pub use parser::{parse, MAX_EXPRESSION_LEN};

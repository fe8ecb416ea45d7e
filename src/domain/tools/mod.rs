//! Tool domain types.
//!
//! ## Key Types
//!
//! - [`ToolSpec`] - Name, description and JSON schema exported to the model
//! - [`ParameterSchema`] - Typed parameter declarations and validation
//! - [`ToolArguments`] - Arguments that passed validation
//! - [`ToolInvocationRequest`] - One tool call requested by the model
//! - [`ToolResult`] - Uniform, immutable outcome of an invocation

mod errors;
mod parameter_schema;
mod tool_arguments;
mod tool_invocation;
mod tool_result;
mod tool_spec;

pub use errors::{RegistryError, ToolExecutionError, ValidationError};
pub use parameter_schema::{ParameterSchema, ParameterSpec, ParameterType};
pub use tool_arguments::ToolArguments;
pub use tool_invocation::ToolInvocationRequest;
pub use tool_result::{ToolResult, ToolStatus};
pub use tool_spec::ToolSpec;

//! Tool Port - Interface for capabilities the model can call.
//!
//! A tool has a stable name, a description forwarded verbatim to the model,
//! a typed parameter schema, and an async execution routine.
//!
//! # Design
//!
//! - Tools hold only read-only configuration; no per-call state
//! - `execute` receives arguments that already passed schema validation
//! - Timeouts, retries and error capture belong to the executor, not the tool
//! - Adding a tool never requires touching the registry
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct Echo { schema: ParameterSchema }
//!
//! #[async_trait]
//! impl Tool for Echo {
//!     fn name(&self) -> &str { "echo" }
//!     fn description(&self) -> &str { "Repeat the input" }
//!     fn parameter_schema(&self) -> &ParameterSchema { &self.schema }
//!
//!     async fn execute(&self, args: &ToolArguments) -> Result<String, ToolExecutionError> {
//!         Ok(args.require_str("text")?.to_string())
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::tools::{ParameterSchema, ToolArguments, ToolExecutionError, ToolSpec};

/// Port for a callable capability.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique dispatch key.
    fn name(&self) -> &str;

    /// Natural-language description the model uses to choose tools.
    fn description(&self) -> &str;

    /// Declared parameters; used both for export and validation.
    fn parameter_schema(&self) -> &ParameterSchema;

    /// Runs the tool with validated arguments and returns its formatted output.
    ///
    /// May suspend on network I/O. Error messages must not contain secrets.
    async fn execute(&self, arguments: &ToolArguments) -> Result<String, ToolExecutionError>;

    /// How long a successful result may be reused for identical arguments.
    ///
    /// `None` (the default) disables caching.
    fn cache_ttl(&self) -> Option<Duration> {
        None
    }

    /// Model-facing description of this tool.
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            self.name(),
            self.description(),
            self.parameter_schema().to_json(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::{ParameterSpec, ParameterType};
    use serde_json::json;

    struct Echo {
        schema: ParameterSchema,
    }

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Repeat the input"
        }

        fn parameter_schema(&self) -> &ParameterSchema {
            &self.schema
        }

        async fn execute(&self, arguments: &ToolArguments) -> Result<String, ToolExecutionError> {
            Ok(arguments.require_str("text")?.to_string())
        }
    }

    fn echo() -> Echo {
        Echo {
            schema: ParameterSchema::new().with(ParameterSpec::required(
                "text",
                ParameterType::String,
                "Text to repeat",
            )),
        }
    }

    #[test]
    fn spec_combines_identity_and_schema() {
        let spec = echo().spec();
        assert_eq!(spec.name(), "echo");
        assert_eq!(spec.description(), "Repeat the input");
        assert_eq!(spec.parameters()["required"], json!(["text"]));
    }

    #[test]
    fn cache_ttl_defaults_to_none() {
        assert_eq!(echo().cache_ttl(), None);
    }

    #[tokio::test]
    async fn execute_reads_validated_arguments() {
        let tool = echo();
        let arguments = tool
            .parameter_schema()
            .validate_value(&json!({"text": " hi "}))
            .unwrap();
        assert_eq!(tool.execute(&arguments).await.unwrap(), "hi");
    }

    #[test]
    fn tool_trait_is_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn Tool>();
    }
}

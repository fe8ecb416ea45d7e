//! Tool Registry - the set of tools exposed to the model.
//!
//! Built once at startup and then shared as `Arc<ToolRegistry>`. Mutation
//! needs `&mut self`, so once the registry is behind an `Arc` it is
//! read-only and concurrent `resolve`/`list_all` calls need no locking.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! registry.register(Arc::new(CalculatorTool::new()))?;
//! let registry = Arc::new(registry);
//!
//! let tool = registry.resolve("calculate")?;
//! let schemas = registry.export_schemas();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::tools::{RegistryError, ToolSpec};
use crate::ports::Tool;

/// Registry of available tools, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    ///
    /// # Errors
    ///
    /// `DuplicateToolName` if a tool with the same name is already present.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateToolName(name));
        }
        tracing::debug!(tool = %name, "tool registered");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, RegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    /// Looks up a tool by name.
    ///
    /// # Errors
    ///
    /// `ToolNotFound` if no tool has that name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>, RegistryError> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.tools[i]))
            .ok_or_else(|| RegistryError::ToolNotFound(name.to_string()))
    }

    /// All tools, in registration order.
    pub fn list_all(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Model-facing specs for every tool, in registration order.
    pub fn export_schemas(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|tool| tool.spec()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

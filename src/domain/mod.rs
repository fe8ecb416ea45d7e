//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamps)
//! - `expression` - Safe arithmetic evaluation
//! - `tools` - Tool specs, parameter schemas, invocation requests and results
//! - `agent` - Per-message turn state for the orchestrator

pub mod agent;
pub mod expression;
pub mod foundation;
pub mod tools;

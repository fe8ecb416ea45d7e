//! Validated argument map handed to a tool.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::ToolExecutionError;

/// Arguments that passed schema validation.
///
/// Only [`ParameterSchema::validate`](super::ParameterSchema::validate)
/// produces values of this type outside tests, so a tool can rely on
/// declared types being correct.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolArguments(BTreeMap<String, Value>);

impl ToolArguments {
    pub(crate) fn new(values: BTreeMap<String, Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    /// Returns a string parameter or an `InvalidArgument` error naming it.
    pub fn require_str(&self, name: &str) -> Result<&str, ToolExecutionError> {
        self.get_str(name).ok_or_else(|| {
            ToolExecutionError::invalid_argument(format!("parameter '{}' is required", name))
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical text used to key cached results.
    ///
    /// Keys are already sorted and string values are trimmed. Case is kept:
    /// tools may echo their arguments, so `"PARIS"` and `"paris"` can
    /// produce different outputs and must not share an entry.
    pub fn normalized_key(&self) -> String {
        let normalized: BTreeMap<&str, Value> = self
            .0
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => Value::String(s.trim().to_string()),
                    other => other.clone(),
                };
                (name.as_str(), value)
            })
            .collect();
        serde_json::to_string(&normalized).unwrap_or_default()
    }
}

impl FromIterator<(String, Value)> for ToolArguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

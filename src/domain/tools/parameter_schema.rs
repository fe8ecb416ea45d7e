//! Typed parameter schema for a tool.
//!
//! A [`ParameterSchema`] is both the contract exported to the model's
//! function-calling interface and the validator that turns untrusted
//! model arguments into [`ToolArguments`].

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::{ToolArguments, ValidationError};

/// JSON type of a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declaration of one accepted parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    kind: ParameterType,
    description: String,
    required: bool,
    default: Option<Value>,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl ParameterSpec {
    /// Declares a parameter the caller must supply.
    pub fn required(
        name: impl Into<String>,
        kind: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
            default: None,
            minimum: None,
            maximum: None,
        }
    }

    /// Declares a parameter the caller may omit.
    pub fn optional(
        name: impl Into<String>,
        kind: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    /// Value substituted when an optional parameter is omitted.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Inclusive numeric bounds.
    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterType {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn to_json(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(self.kind.as_str()));
        property.insert("description".to_string(), json!(self.description));
        if let Some(default) = &self.default {
            property.insert("default".to_string(), default.clone());
        }
        if let Some(minimum) = self.minimum {
            property.insert("minimum".to_string(), bound_to_json(minimum));
        }
        if let Some(maximum) = self.maximum {
            property.insert("maximum".to_string(), bound_to_json(maximum));
        }
        Value::Object(property)
    }

    /// Checks one present, non-null value and returns its normalised form,
    /// or `None` when an optional string is blank.
    fn check(&self, value: &Value) -> Result<Option<Value>, ValidationError> {
        let checked = match (self.kind, value) {
            (ParameterType::String, Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    if self.required {
                        return Err(ValidationError::EmptyParameter(self.name.clone()));
                    }
                    return Ok(None);
                }
                Value::String(trimmed.to_string())
            }
            (ParameterType::Integer, Value::Number(n)) => {
                let integer = n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                });
                match integer {
                    Some(i) => json!(i),
                    None => return Err(self.invalid_type()),
                }
            }
            (ParameterType::Number, Value::Number(_)) => value.clone(),
            (ParameterType::Boolean, Value::Bool(_)) => value.clone(),
            _ => return Err(self.invalid_type()),
        };

        if let Some(n) = checked.as_f64() {
            self.check_range(n)?;
        }
        Ok(Some(checked))
    }

    fn check_range(&self, n: f64) -> Result<(), ValidationError> {
        let below = self.minimum.is_some_and(|min| n < min);
        let above = self.maximum.is_some_and(|max| n > max);
        if !below && !above {
            return Ok(());
        }
        let bounds = match (self.minimum, self.maximum) {
            (Some(min), Some(max)) => format!(
                "between {} and {}",
                bound_to_json(min),
                bound_to_json(max)
            ),
            (Some(min), None) => format!("at least {}", bound_to_json(min)),
            (None, max) => format!("at most {}", bound_to_json(max.unwrap_or_default())),
        };
        Err(ValidationError::OutOfRange {
            name: self.name.clone(),
            bounds,
        })
    }

    fn invalid_type(&self) -> ValidationError {
        ValidationError::InvalidType {
            name: self.name.clone(),
            expected: self.kind,
        }
    }
}

fn bound_to_json(bound: f64) -> Value {
    if bound.fract() == 0.0 && bound.abs() < i64::MAX as f64 {
        json!(bound as i64)
    } else {
        json!(bound)
    }
}

/// Ordered set of parameter declarations for one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    parameters: Vec<ParameterSpec>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter declaration.
    pub fn with(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names that must be present, in declaration order.
    pub fn required_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Validates untrusted arguments against this schema.
    ///
    /// Unknown keys and wrong types are rejected, strings are trimmed,
    /// `null` counts as absent, and defaults fill omitted optional values.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<ToolArguments, ValidationError> {
        if let Some(unknown) = raw.keys().find(|key| self.get(key).is_none()) {
            return Err(ValidationError::UnknownParameter(unknown.clone()));
        }

        let mut values = BTreeMap::new();
        for parameter in &self.parameters {
            let checked = match raw.get(&parameter.name).filter(|v| !v.is_null()) {
                Some(value) => parameter.check(value)?,
                None => None,
            };
            match checked.or_else(|| parameter.default.clone()) {
                Some(value) => {
                    values.insert(parameter.name.clone(), value);
                }
                None if parameter.required => {
                    return Err(ValidationError::MissingParameter(parameter.name.clone()));
                }
                None => {}
            }
        }
        Ok(ToolArguments::new(values))
    }

    /// Validates a JSON value that should be an object.
    pub fn validate_value(&self, raw: &Value) -> Result<ToolArguments, ValidationError> {
        match raw {
            Value::Object(map) => self.validate(map),
            Value::Null => self.validate(&Map::new()),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    /// Renders the function-calling schema:
    /// `{"type": "object", "properties": {..}, "required": [..]}`.
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_json()))
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
        })
    }
}

impl Serialize for ParameterSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

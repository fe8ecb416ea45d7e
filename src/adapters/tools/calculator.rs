//! Calculator tool backed by the safe expression evaluator.

use async_trait::async_trait;

use crate::domain::expression::{evaluate, Number};
use crate::domain::tools::{
    ParameterSchema, ParameterSpec, ParameterType, ToolArguments, ToolExecutionError,
};
use crate::ports::Tool;

pub const CALCULATOR_TOOL_NAME: &str = "calculate";

/// Evaluates arithmetic expressions.
///
/// Pure and stateless; safe to call concurrently.
#[derive(Debug, Clone)]
pub struct CalculatorTool {
    schema: ParameterSchema,
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            schema: ParameterSchema::new().with(ParameterSpec::required(
                "expression",
                ParameterType::String,
                "Mathematical expression to evaluate (e.g., '2 + 2', '10 * 5', 'sqrt(16)')",
            )),
        }
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        CALCULATOR_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Perform mathematical calculations including basic arithmetic, functions, and scientific operations"
    }

    fn parameter_schema(&self) -> &ParameterSchema {
        &self.schema
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String, ToolExecutionError> {
        let expression = arguments.require_str("expression")?;

        match evaluate(expression) {
            Ok(value) => {
                let formatted = format_number(value);
                tracing::debug!(expression, result = %formatted, "calculation completed");
                Ok(format!("{} = {}", expression, formatted))
            }
            Err(err) => Err(ToolExecutionError::invalid_argument(format!(
                "Error calculating '{}': {}",
                expression, err
            ))),
        }
    }
}

/// Renders a result for humans.
///
/// Whole values print without a fractional part. Everything else gets up
/// to 10 significant digits with trailing zeros removed, switching to
/// exponent notation below 1e-4 or from 1e10.
pub fn format_number(value: Number) -> String {
    let x = match value {
        Number::Integer(i) => return i.to_string(),
        Number::Float(x) => x,
    };

    if x == 0.0 {
        return "0".to_string();
    }
    if x.fract() == 0.0 {
        return format!("{:.0}", x);
    }

    const SIGNIFICANT: usize = 10;
    let scientific = format!("{:.*e}", SIGNIFICANT - 1, x);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if exponent < -4 || exponent >= SIGNIFICANT as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        );
    }

    let decimals = (SIGNIFICANT as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, x)).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

//! Syntax tree for allow-listed arithmetic.
//!
//! Every node maps to a pure numeric operation. There is no node for a
//! free name, an attribute, or a call to anything outside [`Function`],
//! so a tree that exists can always be evaluated without side effects.

use super::{EvaluationError, Number};

/// Named constants that may appear in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Self::Pi),
            "e" => Some(Self::E),
            _ => None,
        }
    }

    pub fn value(self) -> Number {
        match self {
            Self::Pi => Number::Float(std::f64::consts::PI),
            Self::E => Number::Float(std::f64::consts::E),
        }
    }
}

/// Functions that may be called from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Abs,
    Log,
    Log10,
    Exp,
    Ceil,
    Floor,
    Round,
    Min,
    Max,
}

impl Function {
    pub fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "sqrt" => Self::Sqrt,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "abs" => Self::Abs,
            "log" => Self::Log,
            "log10" => Self::Log10,
            "exp" => Self::Exp,
            "ceil" => Self::Ceil,
            "floor" => Self::Floor,
            "round" => Self::Round,
            "min" => Self::Min,
            "max" => Self::Max,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Abs => "abs",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Exp => "exp",
            Self::Ceil => "ceil",
            Self::Floor => "floor",
            Self::Round => "round",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Accepted argument count as `(min, max)`; `None` means unbounded.
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Log | Self::Round => (1, Some(2)),
            Self::Min | Self::Max => (1, None),
            _ => (1, Some(1)),
        }
    }

    pub(crate) fn check_arity(self, count: usize) -> Result<(), EvaluationError> {
        let (min, max) = self.arity();
        let within = count >= min && max.map_or(true, |max| count <= max);
        if within {
            return Ok(());
        }
        let expected = match max {
            Some(max) if max == min => format!("{}", min),
            Some(max) => format!("{} to {}", min, max),
            None => format!("at least {}", min),
        };
        Err(EvaluationError::invalid(format!(
            "{}() takes {} argument(s), got {}",
            self.name(),
            expected,
            count
        )))
    }

    fn apply(self, args: &[Number]) -> Result<Number, EvaluationError> {
        let x = args[0];
        let value = match self {
            Self::Sqrt => {
                if x.as_f64() < 0.0 {
                    return Err(EvaluationError::invalid(
                        "math domain error: sqrt of a negative number",
                    ));
                }
                Number::Float(x.as_f64().sqrt())
            }
            Self::Sin => Number::Float(x.as_f64().sin()),
            Self::Cos => Number::Float(x.as_f64().cos()),
            Self::Tan => Number::Float(x.as_f64().tan()),
            Self::Exp => Number::Float(x.as_f64().exp()),
            Self::Abs => match x {
                Number::Integer(i) => i
                    .checked_abs()
                    .map(Number::Integer)
                    .unwrap_or(Number::Float((i as f64).abs())),
                Number::Float(f) => Number::Float(f.abs()),
            },
            Self::Log => {
                let ln = positive_log(self, x)?;
                match args.get(1) {
                    None => Number::Float(ln),
                    Some(base) => {
                        let base_ln = positive_log(self, *base)?;
                        if base_ln == 0.0 {
                            return Err(EvaluationError::DivisionByZero);
                        }
                        Number::Float(ln / base_ln)
                    }
                }
            }
            Self::Log10 => {
                positive_log(self, x)?;
                Number::Float(x.as_f64().log10())
            }
            Self::Ceil => match x {
                Number::Integer(_) => x,
                Number::Float(f) => Number::integral_from_f64(f.ceil()),
            },
            Self::Floor => match x {
                Number::Integer(_) => x,
                Number::Float(f) => Number::integral_from_f64(f.floor()),
            },
            Self::Round => match (x, args.get(1)) {
                (Number::Integer(_), None) => x,
                (Number::Float(f), None) => Number::integral_from_f64(f.round()),
                (_, Some(Number::Integer(digits))) => {
                    let digits = i32::try_from(*digits)
                        .map_err(|_| EvaluationError::invalid("round() digits out of range"))?;
                    let scale = 10f64.powi(digits);
                    let scaled = x.as_f64() * scale;
                    if scale == 0.0 {
                        match x {
                            Number::Integer(_) => Number::Integer(0),
                            Number::Float(_) => Number::Float(0.0),
                        }
                    } else if !scaled.is_finite() {
                        // Already exact at this precision.
                        x
                    } else {
                        Number::Float(scaled.round() / scale)
                    }
                }
                (_, Some(Number::Float(_))) => {
                    return Err(EvaluationError::invalid(
                        "round() digits must be an integer",
                    ))
                }
            },
            Self::Min => pick(args, |candidate, best| candidate < best),
            Self::Max => pick(args, |candidate, best| candidate > best),
        };
        value.finite()
    }
}

fn positive_log(function: Function, x: Number) -> Result<f64, EvaluationError> {
    if x.as_f64() <= 0.0 {
        return Err(EvaluationError::invalid(format!(
            "math domain error: {}() needs a positive argument",
            function.name()
        )));
    }
    Ok(x.as_f64().ln())
}

fn pick(args: &[Number], better: impl Fn(f64, f64) -> bool) -> Number {
    let mut best = args[0];
    for candidate in &args[1..] {
        if better(candidate.as_f64(), best.as_f64()) {
            best = *candidate;
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Number),
    Constant(Constant),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

impl Expr {
    /// Walks the tree and computes its value.
    pub fn evaluate(&self) -> Result<Number, EvaluationError> {
        let value = match self {
            Self::Literal(n) => *n,
            Self::Constant(c) => c.value(),
            Self::Unary(UnaryOp::Plus, operand) => operand.evaluate()?,
            Self::Unary(UnaryOp::Minus, operand) => operand.evaluate()?.neg(),
            Self::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.evaluate()?, rhs.evaluate()?);
                match op {
                    BinaryOp::Add => a.add(b),
                    BinaryOp::Sub => a.sub(b),
                    BinaryOp::Mul => a.mul(b),
                    BinaryOp::Div => a.div(b)?,
                    BinaryOp::FloorDiv => a.floor_div(b)?,
                    BinaryOp::Mod => a.rem(b)?,
                    BinaryOp::Pow => a.pow(b)?,
                }
            }
            Self::Call(function, args) => {
                function.check_arity(args.len())?;
                let values = args
                    .iter()
                    .map(Expr::evaluate)
                    .collect::<Result<Vec<_>, _>>()?;
                function.apply(&values)?
            }
        };
        value.finite()
    }
}

//! Numeric value produced by the evaluator.
//!
//! Integer arithmetic is checked; an operation that would overflow `i64`
//! is carried out in `f64` instead. True division always yields a float.

use serde::{Serialize, Serializer};
use std::fmt;

use super::EvaluationError;

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns the value as a float.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Returns true for the `Integer` variant.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// Returns true when the value has no fractional part.
    pub fn is_integral(&self) -> bool {
        match self {
            Self::Integer(_) => true,
            Self::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Self::Integer(i) => i == 0,
            Self::Float(f) => f == 0.0,
        }
    }

    /// Rejects NaN and infinities.
    pub(crate) fn finite(self) -> Result<Self, EvaluationError> {
        match self {
            Self::Float(f) if !f.is_finite() => Err(EvaluationError::invalid(
                "result is not a finite number",
            )),
            other => Ok(other),
        }
    }

    /// Converts a float with no fractional part to an integer when it fits.
    pub(crate) fn integral_from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Self::Integer(value as i64)
        } else {
            Self::Float(value)
        }
    }

    pub(crate) fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_add(b)
                .map(Self::Integer)
                .unwrap_or(Self::Float(a as f64 + b as f64)),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }

    pub(crate) fn sub(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_sub(b)
                .map(Self::Integer)
                .unwrap_or(Self::Float(a as f64 - b as f64)),
            (a, b) => Self::Float(a.as_f64() - b.as_f64()),
        }
    }

    pub(crate) fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_mul(b)
                .map(Self::Integer)
                .unwrap_or(Self::Float(a as f64 * b as f64)),
            (a, b) => Self::Float(a.as_f64() * b.as_f64()),
        }
    }

    pub(crate) fn div(self, rhs: Self) -> Result<Self, EvaluationError> {
        if rhs.is_zero() {
            return Err(EvaluationError::DivisionByZero);
        }
        Ok(Self::Float(self.as_f64() / rhs.as_f64()))
    }

    /// Division rounded toward negative infinity.
    pub(crate) fn floor_div(self, rhs: Self) -> Result<Self, EvaluationError> {
        if rhs.is_zero() {
            return Err(EvaluationError::DivisionByZero);
        }
        Ok(match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => match (a.checked_div(b), a.checked_rem(b)) {
                (Some(q), Some(r)) if r != 0 && ((r < 0) != (b < 0)) => Self::Integer(q - 1),
                (Some(q), Some(_)) => Self::Integer(q),
                _ => Self::Float((a as f64 / b as f64).floor()),
            },
            (a, b) => Self::Float((a.as_f64() / b.as_f64()).floor()),
        })
    }

    /// Remainder carrying the sign of the divisor.
    pub(crate) fn rem(self, rhs: Self) -> Result<Self, EvaluationError> {
        if rhs.is_zero() {
            return Err(EvaluationError::DivisionByZero);
        }
        Ok(match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => match a.checked_rem(b) {
                Some(r) if r != 0 && ((r < 0) != (b < 0)) => Self::Integer(r + b),
                Some(r) => Self::Integer(r),
                None => Self::Integer(0),
            },
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                let r = a % b;
                if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                    Self::Float(r + b)
                } else {
                    Self::Float(r)
                }
            }
        })
    }

    pub(crate) fn pow(self, rhs: Self) -> Result<Self, EvaluationError> {
        if self.is_zero() && rhs.as_f64() < 0.0 {
            return Err(EvaluationError::DivisionByZero);
        }
        Ok(match (self, rhs) {
            (Self::Integer(base), Self::Integer(exp)) if exp >= 0 => u32::try_from(exp)
                .ok()
                .and_then(|e| base.checked_pow(e))
                .map(Self::Integer)
                .unwrap_or_else(|| Self::Float((base as f64).powf(exp as f64))),
            (a, b) => Self::Float(a.as_f64().powf(b.as_f64())),
        })
    }

    pub(crate) fn neg(self) -> Self {
        match self {
            Self::Integer(i) => i
                .checked_neg()
                .map(Self::Integer)
                .unwrap_or(Self::Float(-(i as f64))),
            Self::Float(f) => Self::Float(-f),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Number::{Float, Integer};

    #[test]
    fn integer_addition_stays_integer() {
        assert_eq!(Integer(2).add(Integer(3)), Integer(5));
    }

    #[test]
    fn integer_overflow_falls_back_to_float() {
        assert!(matches!(Integer(i64::MAX).add(Integer(1)), Float(_)));
        assert!(matches!(Integer(i64::MAX).mul(Integer(2)), Float(_)));
        assert!(matches!(Integer(i64::MIN).neg(), Float(_)));
    }

    #[test]
    fn mixed_operands_produce_float() {
        assert_eq!(Integer(1).add(Float(0.5)), Float(1.5));
    }

    #[test]
    fn division_is_always_float() {
        assert_eq!(Integer(6).div(Integer(3)).unwrap(), Float(2.0));
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(Integer(1).div(Integer(0)), Err(EvaluationError::DivisionByZero));
        assert_eq!(Float(1.0).div(Float(0.0)), Err(EvaluationError::DivisionByZero));
        assert_eq!(Integer(1).rem(Integer(0)), Err(EvaluationError::DivisionByZero));
        assert_eq!(
            Integer(1).floor_div(Integer(0)),
            Err(EvaluationError::DivisionByZero)
        );
    }

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        assert_eq!(Integer(7).floor_div(Integer(2)).unwrap(), Integer(3));
        assert_eq!(Integer(-7).floor_div(Integer(2)).unwrap(), Integer(-4));
        assert_eq!(Float(7.5).floor_div(Integer(2)).unwrap(), Float(3.0));
    }

    #[test]
    fn remainder_follows_divisor_sign() {
        assert_eq!(Integer(7).rem(Integer(3)).unwrap(), Integer(1));
        assert_eq!(Integer(-7).rem(Integer(3)).unwrap(), Integer(2));
        assert_eq!(Integer(7).rem(Integer(-3)).unwrap(), Integer(-2));
    }

    #[test]
    fn integer_power_is_exact() {
        assert_eq!(Integer(2).pow(Integer(10)).unwrap(), Integer(1024));
    }

    #[test]
    fn negative_exponent_gives_float() {
        assert_eq!(Integer(2).pow(Integer(-1)).unwrap(), Float(0.5));
    }

    #[test]
    fn zero_to_negative_power_is_division_by_zero() {
        assert_eq!(
            Integer(0).pow(Integer(-1)),
            Err(EvaluationError::DivisionByZero)
        );
    }

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert!(Float(f64::NAN).finite().is_err());
        assert!(Float(f64::INFINITY).finite().is_err());
        assert!(Float(1.5).finite().is_ok());
    }

    #[test]
    fn integral_from_f64_converts_whole_numbers() {
        assert_eq!(Number::integral_from_f64(4.0), Integer(4));
        assert_eq!(Number::integral_from_f64(4.5), Float(4.5));
        assert!(matches!(Number::integral_from_f64(1e300), Float(_)));
    }

    #[test]
    fn serializes_as_json_number() {
        assert_eq!(serde_json::to_string(&Integer(4)).unwrap(), "4");
        assert_eq!(serde_json::to_string(&Float(2.5)).unwrap(), "2.5");
    }
}

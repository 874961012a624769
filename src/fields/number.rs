//! Numeric coercion with value bounds.

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::value::Value;
use async_trait::async_trait;

/// Parser coercing to `i64`.
///
/// Accepts integer values, integral floats, and trimmed decimal strings.
#[derive(Debug, Default)]
pub struct IntParser {
	min: Option<i64>,
	max: Option<i64>,
}

/// Create an integer parser.
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, int};
///
/// assert_eq!(int().parse(&Value::from(" 42 ")).unwrap(), Value::Int(42));
/// assert!(int().parse(&Value::from("4.5")).is_err());
/// ```
pub fn int() -> IntParser {
	IntParser::default()
}

impl IntParser {
	/// Require the value to be at least `min`.
	pub fn with_min(mut self, min: i64) -> Self {
		self.min = Some(min);
		self
	}

	/// Require the value to be at most `max`.
	pub fn with_max(mut self, max: i64) -> Self {
		self.max = Some(max);
		self
	}
}

fn coerce_int(value: &Value) -> Option<i64> {
	match value {
		Value::Int(value) => Some(*value),
		Value::Float(value) if value.fract() == 0.0 && value.is_finite() => {
			(*value >= i64::MIN as f64 && *value <= i64::MAX as f64).then(|| *value as i64)
		}
		Value::String(text) => text.trim().parse().ok(),
		Value::Bytes(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
		_ => None,
	}
}

#[async_trait]
impl Parser for IntParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		let Some(value) = value else {
			return Err(ParseError::invalid(path, "This field is required"));
		};
		let Some(parsed) = coerce_int(value) else {
			return Err(ParseError::invalid(
				path,
				"Value cannot be converted to an integer",
			));
		};
		if let Some(min) = self.min
			&& parsed < min
		{
			return Err(ParseError::invalid(
				path,
				format!("Ensure this value is greater than or equal to {min}"),
			));
		}
		if let Some(max) = self.max
			&& parsed > max
		{
			return Err(ParseError::invalid(
				path,
				format!("Ensure this value is less than or equal to {max}"),
			));
		}
		Ok(Value::Int(parsed))
	}
}

/// Parser coercing to `f64`.
#[derive(Debug, Default)]
pub struct FloatParser {
	min: Option<f64>,
	max: Option<f64>,
}

/// Create a float parser.
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, float};
///
/// assert_eq!(float().parse(&Value::from("2.5")).unwrap(), Value::Float(2.5));
/// ```
pub fn float() -> FloatParser {
	FloatParser::default()
}

impl FloatParser {
	/// Require the value to be at least `min`.
	pub fn with_min(mut self, min: f64) -> Self {
		self.min = Some(min);
		self
	}

	/// Require the value to be at most `max`.
	pub fn with_max(mut self, max: f64) -> Self {
		self.max = Some(max);
		self
	}
}

fn coerce_float(value: &Value) -> Option<f64> {
	match value {
		Value::Int(value) => Some(*value as f64),
		Value::Float(value) => Some(*value),
		Value::String(text) => text.trim().parse().ok(),
		Value::Bytes(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
		_ => None,
	}
}

#[async_trait]
impl Parser for FloatParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		let Some(value) = value else {
			return Err(ParseError::invalid(path, "This field is required"));
		};
		let Some(parsed) = coerce_float(value) else {
			return Err(ParseError::invalid(
				path,
				"Value cannot be converted to a number",
			));
		};
		if let Some(min) = self.min
			&& parsed < min
		{
			return Err(ParseError::invalid(
				path,
				format!("Ensure this value is greater than or equal to {min}"),
			));
		}
		if let Some(max) = self.max
			&& parsed > max
		{
			return Err(ParseError::invalid(
				path,
				format!("Ensure this value is less than or equal to {max}"),
			));
		}
		Ok(Value::Float(parsed))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Value::Int(5), Some(5))]
	#[case(Value::Float(5.0), Some(5))]
	#[case(Value::Float(5.5), None)]
	#[case(Value::from("12"), Some(12))]
	#[case(Value::from(" 12 "), Some(12))]
	#[case(Value::from("twelve"), None)]
	#[case(Value::Null, None)]
	fn test_int_coercion(#[case] input: Value, #[case] expected: Option<i64>) {
		// Act
		let result = int().parse(&input);

		// Assert
		match expected {
			Some(value) => assert_eq!(result.unwrap(), Value::Int(value)),
			None => assert!(result.unwrap_err().is_validation()),
		}
	}

	#[rstest]
	fn test_int_bounds() {
		// Arrange
		let parser = int().with_min(1).with_max(10);

		// Act & Assert
		assert!(parser.parse(&Value::Int(1)).is_ok());
		assert!(parser.parse(&Value::Int(10)).is_ok());
		assert!(parser.parse(&Value::Int(0)).is_err());
		assert!(parser.parse(&Value::Int(11)).is_err());
	}

	#[rstest]
	fn test_int_missing_value_is_required() {
		// Act
		let err = int().parse_value(None, "root.age").unwrap_err();

		// Assert
		assert_eq!(err.to_string(), "root.age: This field is required");
	}

	#[rstest]
	#[case(Value::Int(2), Some(2.0))]
	#[case(Value::Float(0.25), Some(0.25))]
	#[case(Value::from("0.5"), Some(0.5))]
	#[case(Value::from("abc"), None)]
	fn test_float_coercion(#[case] input: Value, #[case] expected: Option<f64>) {
		// Act
		let result = float().parse(&input);

		// Assert
		match expected {
			Some(value) => assert_eq!(result.unwrap(), Value::Float(value)),
			None => assert!(result.unwrap_err().is_validation()),
		}
	}
}

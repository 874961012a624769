//! Boolean coercion.

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::value::Value;
use async_trait::async_trait;

/// Parser accepting booleans and the usual form-data literals.
#[derive(Debug, Default)]
pub struct BooleanParser;

/// Create a boolean parser.
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, boolean};
///
/// assert_eq!(boolean().parse(&Value::from("on")).unwrap(), Value::Bool(true));
/// assert_eq!(boolean().parse(&Value::from("0")).unwrap(), Value::Bool(false));
/// ```
pub fn boolean() -> BooleanParser {
	BooleanParser
}

fn coerce_bool(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(value) => Some(*value),
		Value::Int(0) => Some(false),
		Value::Int(1) => Some(true),
		Value::String(text) => coerce_literal(text),
		Value::Bytes(bytes) => coerce_literal(std::str::from_utf8(bytes).ok()?),
		_ => None,
	}
}

fn coerce_literal(text: &str) -> Option<bool> {
	match text.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "on" => Some(true),
		"false" | "0" | "off" => Some(false),
		_ => None,
	}
}

#[async_trait]
impl Parser for BooleanParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		let Some(value) = value else {
			return Err(ParseError::invalid(path, "This field is required"));
		};
		coerce_bool(value).map(Value::Bool).ok_or_else(|| {
			ParseError::invalid(path, "Value cannot be converted to a boolean")
		})
	}
}

//! Literal choice validation.

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::value::Value;
use async_trait::async_trait;

/// Accepts only values strictly equal to one of the configured literals.
pub struct OneOfParser {
	choices: Vec<Value>,
}

/// Create a choice parser.
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, one_of};
///
/// let parser = one_of(["asc", "desc"]);
/// assert!(parser.parse(&Value::from("asc")).is_ok());
/// assert!(parser.parse(&Value::from("sideways")).is_err());
/// ```
pub fn one_of<T: Into<Value>>(choices: impl IntoIterator<Item = T>) -> OneOfParser {
	OneOfParser {
		choices: choices.into_iter().map(Into::into).collect(),
	}
}

#[async_trait]
impl Parser for OneOfParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		if let Some(value) = value
			&& self.choices.iter().any(|choice| choice == value)
		{
			return Ok(value.clone());
		}
		Err(ParseError::invalid(
			path,
			"Value is not one of the permitted choices",
		))
	}
}

//! String coercion with length and format constraints.

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::value::Value;
use async_trait::async_trait;
use regex::Regex;

/// Parser accepting strings and UTF-8 byte payloads.
#[derive(Debug, Default)]
pub struct StringParser {
	min: Option<usize>,
	max: Option<usize>,
	pattern: Option<Regex>,
	email: bool,
}

/// Create a string parser.
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, string};
///
/// let parsed = string().parse(&Value::from("alice")).unwrap();
/// assert_eq!(parsed.as_str(), Some("alice"));
/// ```
pub fn string() -> StringParser {
	StringParser::default()
}

impl StringParser {
	/// Require at least `min` characters.
	pub fn with_min(mut self, min: usize) -> Self {
		self.min = Some(min);
		self
	}

	/// Require at most `max` characters.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::{Parser, Value, string};
	///
	/// let parser = string().with_max(3);
	/// assert!(parser.parse(&Value::from("abcd")).is_err());
	/// ```
	pub fn with_max(mut self, max: usize) -> Self {
		self.max = Some(max);
		self
	}

	/// Require the value to match `pattern`.
	pub fn with_pattern(mut self, pattern: Regex) -> Self {
		self.pattern = Some(pattern);
		self
	}

	/// Require the value to look like an e-mail address.
	pub fn email(mut self) -> Self {
		self.email = true;
		self
	}
}

fn is_email(value: &str) -> bool {
	let parts: Vec<&str> = value.split('@').collect();
	parts.len() == 2
		&& !parts[0].is_empty()
		&& !parts[1].is_empty()
		&& parts[1].contains('.')
}

#[async_trait]
impl Parser for StringParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		let text = match value {
			None => return Err(ParseError::invalid(path, "This field is required")),
			Some(Value::String(text)) => text.clone(),
			Some(Value::Bytes(bytes)) => std::str::from_utf8(bytes)
				.map_err(|_| ParseError::invalid(path, "Value is not valid UTF-8"))?
				.to_string(),
			Some(other) => {
				return Err(ParseError::invalid(
					path,
					format!("Value of kind {} must be a string", other.kind()),
				));
			}
		};

		// Character counts, not byte counts, for multi-byte input.
		let count = text.chars().count();
		if let Some(min) = self.min
			&& count < min
		{
			return Err(ParseError::invalid(
				path,
				format!("Ensure this value has at least {min} characters (it has {count})"),
			));
		}
		if let Some(max) = self.max
			&& count > max
		{
			return Err(ParseError::invalid(
				path,
				format!("Ensure this value has at most {max} characters (it has {count})"),
			));
		}
		if let Some(pattern) = &self.pattern
			&& !pattern.is_match(&text)
		{
			return Err(ParseError::invalid(
				path,
				format!("Value does not match the required pattern {}", pattern.as_str()),
			));
		}
		if self.email && !is_email(&text) {
			return Err(ParseError::invalid(path, "Enter a valid e-mail address"));
		}

		Ok(Value::String(text))
	}
}

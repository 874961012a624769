//! First-match-wins alternatives.

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::value::Value;
use async_trait::async_trait;

/// Tries each alternative in order on the same input.
///
/// The first success wins. When every alternative fails, one aggregated
/// error lists each attempt's failure in order. A fatal (I/O or framing)
/// failure from an alternative propagates immediately instead of being
/// swallowed into the aggregate.
pub struct AlternativesParser {
	options: Vec<Box<dyn Parser>>,
}

/// Create an empty alternatives parser; add options with
/// [`or`](AlternativesParser::or).
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, alternatives, int, string};
///
/// let parser = alternatives().or(int()).or(string());
/// assert_eq!(parser.parse(&Value::Int(5)).unwrap(), Value::Int(5));
/// assert_eq!(parser.parse(&Value::from("abc")).unwrap(), Value::from("abc"));
/// ```
pub fn alternatives() -> AlternativesParser {
	AlternativesParser {
		options: Vec::new(),
	}
}

impl AlternativesParser {
	/// Append an alternative.
	pub fn or(mut self, parser: impl Parser + 'static) -> Self {
		self.options.push(Box::new(parser));
		self
	}
}

#[async_trait]
impl Parser for AlternativesParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		let mut failures = Vec::with_capacity(self.options.len());
		for option in &self.options {
			match option.parse_value(value, path) {
				Ok(parsed) => return Ok(parsed),
				Err(failure) if failure.is_validation() => failures.push(failure),
				Err(fatal) => return Err(fatal),
			}
		}
		if failures.is_empty() {
			return Err(ParseError::invalid(
				path,
				"Value matched none of the alternatives",
			));
		}
		Err(ParseError::aggregate(failures))
	}
}

//! Sequence parsing with scalar wrapping.

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::path;
use crate::value::Value;
use async_trait::async_trait;

/// Applies an element parser to every entry of a sequential input.
///
/// Length bounds are reported as length errors on the sequence itself, never
/// per element. Element failures are collected and tagged `path[i]`.
///
/// Coercion rule carried over from the engine's historical behavior: a
/// non-sequential input, or a sequence with any failing element, is re-parsed
/// as a one-element sequence wrapping the original input, and the wrapped
/// attempt's outcome replaces the per-element failures. Length-only failures
/// do not trigger the wrapped attempt.
pub struct ArrayParser {
	element: Box<dyn Parser>,
	min: Option<usize>,
	max: Option<usize>,
}

/// Create an array parser over `element`.
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, array, int};
///
/// let parser = array(int());
///
/// // A scalar is accepted as a one-element sequence.
/// let parsed = parser.parse(&Value::Int(5)).unwrap();
/// assert_eq!(parsed.as_array(), Some([Value::Int(5)].as_slice()));
/// ```
pub fn array(element: impl Parser + 'static) -> ArrayParser {
	ArrayParser {
		element: Box::new(element),
		min: None,
		max: None,
	}
}

impl ArrayParser {
	/// Require at least `min` elements.
	pub fn with_min(mut self, min: usize) -> Self {
		self.min = Some(min);
		self
	}

	/// Require at most `max` elements.
	pub fn with_max(mut self, max: usize) -> Self {
		self.max = Some(max);
		self
	}

	fn length_failures(&self, len: usize, path: &str) -> Vec<ParseError> {
		let mut failures = Vec::new();
		if let Some(min) = self.min
			&& len < min
		{
			failures.push(ParseError::invalid(
				path,
				format!("Ensure this value has at least {min} elements (it has {len})"),
			));
		}
		if let Some(max) = self.max
			&& len > max
		{
			failures.push(ParseError::invalid(
				path,
				format!("Ensure this value has at most {max} elements (it has {len})"),
			));
		}
		failures
	}

	/// Parse `items` with full aggregation: length failures first, then every
	/// element failure in order.
	fn parse_items(&self, items: &[Value], path: &str) -> ParseResult<Value> {
		let mut failures = self.length_failures(items.len(), path);
		let mut parsed = Vec::with_capacity(items.len());
		for (index, item) in items.iter().enumerate() {
			match self.element.parse_value(Some(item), &path::index(path, index)) {
				Ok(value) => parsed.push(value),
				Err(failure) if failure.is_validation() => failures.push(failure),
				Err(fatal) => return Err(fatal),
			}
		}
		if failures.is_empty() {
			Ok(Value::Array(parsed))
		} else {
			Err(ParseError::aggregate(failures))
		}
	}
}

#[async_trait]
impl Parser for ArrayParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		if let Some(Value::Array(items)) = value {
			let length_failures = self.length_failures(items.len(), path);
			let mut element_failed = false;
			let mut parsed = Vec::with_capacity(items.len());
			for (index, item) in items.iter().enumerate() {
				match self.element.parse_value(Some(item), &path::index(path, index)) {
					Ok(value) => parsed.push(value),
					Err(failure) if failure.is_validation() => element_failed = true,
					Err(fatal) => return Err(fatal),
				}
			}
			if !element_failed {
				return if length_failures.is_empty() {
					Ok(Value::Array(parsed))
				} else {
					Err(ParseError::aggregate(length_failures))
				};
			}
			// Fall through: the whole input is retried as [input] below.
		}
		let wrapped = [value.cloned().unwrap_or(Value::Null)];
		self.parse_items(&wrapped, path)
	}
}

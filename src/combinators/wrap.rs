//! Adapters over a single inner parser.
//!
//! Constructed through the [`Parser`] combination helpers (`optional`,
//! `nullable`, `default_value`, `map`). Each adapter delegates its stream
//! path to the inner parser so incremental overrides keep working through
//! the wrapper.

use crate::error::ParseResult;
use crate::parser::Parser;
use crate::stream::Body;
use crate::value::Value;
use async_trait::async_trait;

/// Tolerates absent and null input; see [`Parser::optional`].
pub struct Optional {
	inner: Box<dyn Parser>,
}

impl Optional {
	pub(crate) fn new(inner: impl Parser + 'static) -> Self {
		Self {
			inner: Box::new(inner),
		}
	}
}

#[async_trait]
impl Parser for Optional {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		match value {
			None | Some(Value::Null) => Ok(Value::Null),
			Some(value) => self.inner.parse_value(Some(value), path),
		}
	}

	async fn parse_stream(&self, body: Body, path: &str) -> ParseResult<Value> {
		self.inner.parse_stream(body, path).await
	}
}

/// Passes explicit null through; see [`Parser::nullable`].
pub struct Nullable {
	inner: Box<dyn Parser>,
}

impl Nullable {
	pub(crate) fn new(inner: impl Parser + 'static) -> Self {
		Self {
			inner: Box::new(inner),
		}
	}
}

#[async_trait]
impl Parser for Nullable {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		match value {
			Some(Value::Null) => Ok(Value::Null),
			other => self.inner.parse_value(other, path),
		}
	}

	async fn parse_stream(&self, body: Body, path: &str) -> ParseResult<Value> {
		self.inner.parse_stream(body, path).await
	}
}

/// Substitutes a default for absent or null input; see
/// [`Parser::default_value`].
pub struct DefaultValue {
	inner: Box<dyn Parser>,
	default: Value,
}

impl DefaultValue {
	pub(crate) fn new(inner: impl Parser + 'static, default: Value) -> Self {
		Self {
			inner: Box::new(inner),
			default,
		}
	}
}

#[async_trait]
impl Parser for DefaultValue {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		match value {
			None | Some(Value::Null) => Ok(self.default.clone()),
			Some(value) => self.inner.parse_value(Some(value), path),
		}
	}

	async fn parse_stream(&self, body: Body, path: &str) -> ParseResult<Value> {
		self.inner.parse_stream(body, path).await
	}
}

type TransformFn = Box<dyn Fn(Value) -> ParseResult<Value> + Send + Sync>;

/// Applies a transform to the successful result; see [`Parser::map`].
pub struct Map {
	inner: Box<dyn Parser>,
	transform: TransformFn,
}

impl Map {
	pub(crate) fn new(
		inner: impl Parser + 'static,
		transform: impl Fn(Value) -> ParseResult<Value> + Send + Sync + 'static,
	) -> Self {
		Self {
			inner: Box::new(inner),
			transform: Box::new(transform),
		}
	}
}

#[async_trait]
impl Parser for Map {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		self.inner.parse_value(value, path).and_then(&self.transform)
	}

	async fn parse_stream(&self, body: Body, path: &str) -> ParseResult<Value> {
		let value = self.inner.parse_stream(body, path).await?;
		(self.transform)(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ParseError;
	use crate::fields::{int, string};

	#[test]
	fn test_optional_treats_null_like_absent() {
		// Arrange
		let parser = int().optional();

		// Act & Assert
		assert_eq!(parser.parse_value(None, "root").unwrap(), Value::Null);
		assert_eq!(parser.parse(&Value::Null).unwrap(), Value::Null);
		assert_eq!(parser.parse(&Value::Int(3)).unwrap(), Value::Int(3));
	}

	#[test]
	fn test_nullable_still_requires_a_present_entry() {
		// Arrange
		let parser = int().nullable();

		// Act & Assert
		assert_eq!(parser.parse(&Value::Null).unwrap(), Value::Null);
		assert!(parser.parse_value(None, "root").is_err());
	}

	#[test]
	fn test_default_value_substitutes_for_absent_and_null() {
		// Arrange
		let parser = string().default_value("anonymous");

		// Act & Assert
		assert_eq!(
			parser.parse_value(None, "root").unwrap(),
			Value::from("anonymous")
		);
		assert_eq!(parser.parse(&Value::Null).unwrap(), Value::from("anonymous"));
		assert_eq!(parser.parse(&Value::from("bob")).unwrap(), Value::from("bob"));
	}

	#[test]
	fn test_map_transforms_success_and_propagates_failure() {
		// Arrange
		let parser = int().map(|value| {
			Ok(Value::Int(value.as_i64().unwrap_or_default() + 1))
		});

		// Act & Assert
		assert_eq!(parser.parse(&Value::Int(1)).unwrap(), Value::Int(2));
		assert!(parser.parse(&Value::from("not a number")).is_err());
	}

	#[test]
	fn test_map_transform_may_fail() {
		// Arrange
		let parser = int().map(|value| {
			if value.as_i64() == Some(0) {
				Err(ParseError::invalid("root", "Zero is not allowed"))
			} else {
				Ok(value)
			}
		});

		// Act & Assert
		assert!(parser.parse(&Value::Int(0)).is_err());
		assert!(parser.parse(&Value::Int(5)).is_ok());
	}
}

//! The parser contract.
//!
//! A parser pairs a synchronous value transform with a derived streaming
//! transform. The streaming transform defaults to "fully buffer, then apply
//! the value transform to the bytes"; parsers that can do better (files,
//! objects over multipart bodies) override it.
//!
//! Parsers are immutable, stateless values: one boxed parser may be shared
//! across any number of invocations and concurrent sessions.

use crate::combinators::{DefaultValue, Map, Nullable, Optional};
use crate::error::ParseResult;
use crate::path;
use crate::stream::{Body, buffer};
use crate::value::Value;
use async_trait::async_trait;

/// A composable value transformer.
#[async_trait]
pub trait Parser: Send + Sync {
	/// Transform an already-materialized value.
	///
	/// `value` is `None` when the input entry is absent (an "undefined"
	/// placeholder, as opposed to an explicit `Value::Null`). `path` tags
	/// any failure with the accessor that produced it.
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value>;

	/// Transform a streaming body.
	///
	/// By default the stream is drained into one contiguous byte payload and
	/// handed to [`parse_value`](Self::parse_value).
	async fn parse_stream(&self, body: Body, path: &str) -> ParseResult<Value> {
		let bytes = buffer(body.into_stream()).await?;
		self.parse_value(Some(&Value::Bytes(bytes)), path)
	}

	/// Parse a materialized value rooted at [`path::ROOT`].
	///
	/// # Examples
	///
	/// ```
	/// use nuages::{Parser, Value, int};
	///
	/// assert_eq!(int().parse(&Value::from("42")).unwrap(), Value::Int(42));
	/// ```
	fn parse(&self, value: &Value) -> ParseResult<Value> {
		self.parse_value(Some(value), path::ROOT)
	}

	/// Parse a streaming body rooted at [`path::ROOT`].
	async fn parse_body(&self, body: Body) -> ParseResult<Value> {
		self.parse_stream(body, path::ROOT).await
	}

	/// Tolerate an absent or null input, producing `Value::Null`.
	fn optional(self) -> Optional
	where
		Self: Sized + 'static,
	{
		Optional::new(self)
	}

	/// Pass an explicit null through; absent input is still handed to the
	/// underlying parser.
	fn nullable(self) -> Nullable
	where
		Self: Sized + 'static,
	{
		Nullable::new(self)
	}

	/// Substitute `default` for an absent or null input.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::{Parser, Value, int};
	///
	/// let parser = int().default_value(7i64);
	/// assert_eq!(parser.parse(&Value::Null).unwrap(), Value::Int(7));
	/// ```
	fn default_value(self, default: impl Into<Value>) -> DefaultValue
	where
		Self: Sized + 'static,
	{
		DefaultValue::new(self, default.into())
	}

	/// Apply `transform` to the successful result; failures propagate
	/// unchanged.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::{Parser, Value, int};
	///
	/// let parser = int().map(|value| {
	///     let doubled = value.as_i64().unwrap_or_default() * 2;
	///     Ok(Value::Int(doubled))
	/// });
	/// assert_eq!(parser.parse(&Value::Int(21)).unwrap(), Value::Int(42));
	/// ```
	fn map<F>(self, transform: F) -> Map
	where
		Self: Sized + 'static,
		F: Fn(Value) -> ParseResult<Value> + Send + Sync + 'static,
	{
		Map::new(self, transform)
	}
}

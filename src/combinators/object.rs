//! Shape-driven object parsing.

use crate::error::{ParseError, ParseResult};
use crate::multipart::{self, BoundarySniffer};
use crate::parser::Parser;
use crate::path;
use crate::stream::{Body, buffer};
use crate::upload::SpoolConfig;
use crate::value::Value;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Parses a structured mapping against an ordered list of `(key, parser)`
/// pairs.
///
/// Every declared key is visited and every validation failure collected; one
/// aggregated error is raised only after all keys are processed. Input that
/// is not itself a mapping gets one fallback: its byte/string payload is
/// decoded as JSON and object parsing retried on the result.
///
/// The stream path ingests `multipart/form-data` bodies, sniffing the
/// boundary from the leading bytes when no content type declares one, and
/// falls back to the buffered sync path for non-multipart bodies.
pub struct ObjectParser {
	shape: Vec<(String, Box<dyn Parser>)>,
	ignore_unknown: bool,
	spool: SpoolConfig,
}

/// Create an empty object parser; declare keys with
/// [`field`](ObjectParser::field).
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, int, object, string};
///
/// let parser = object()
///     .field("name", string())
///     .field("age", int());
///
/// let input = Value::from(serde_json::json!({"name": "alice", "age": "30"}));
/// let parsed = parser.parse(&input).unwrap();
/// assert_eq!(parsed.get("age"), Some(&Value::Int(30)));
/// ```
pub fn object() -> ObjectParser {
	ObjectParser {
		shape: Vec::new(),
		ignore_unknown: true,
		spool: SpoolConfig::default(),
	}
}

impl ObjectParser {
	/// Declare a key and the parser applied to its value. Keys are evaluated
	/// in declaration order.
	pub fn field(mut self, name: impl Into<String>, parser: impl Parser + 'static) -> Self {
		self.shape.push((name.into(), Box::new(parser)));
		self
	}

	/// Treat keys outside the declared shape as failures instead of ignoring
	/// them.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::{Parser, Value, int, object};
	///
	/// let parser = object().field("a", int()).deny_unknown();
	/// let input = Value::from(serde_json::json!({"a": 1, "b": 2}));
	/// assert!(parser.parse(&input).is_err());
	/// ```
	pub fn deny_unknown(mut self) -> Self {
		self.ignore_unknown = false;
		self
	}

	/// Set the in-memory ceiling for files accumulated by the stream path.
	pub fn with_max_memory(mut self, max_memory: usize) -> Self {
		self.spool.max_memory = max_memory;
		self
	}

	/// Set the directory spooled file content is written to.
	pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
		self.spool.temp_dir = Some(temp_dir.into());
		self
	}

	fn parse_entries(
		&self,
		entries: &BTreeMap<String, Value>,
		path: &str,
	) -> ParseResult<Value> {
		let mut failures = Vec::new();
		let mut parsed = BTreeMap::new();
		for (name, parser) in &self.shape {
			let child = path::key(path, name);
			match parser.parse_value(entries.get(name), &child) {
				Ok(value) => {
					parsed.insert(name.clone(), value);
				}
				Err(failure) if failure.is_validation() => failures.push(failure),
				Err(fatal) => return Err(fatal),
			}
		}
		if !self.ignore_unknown {
			for name in entries.keys() {
				if !self.shape.iter().any(|(declared, _)| declared == name) {
					failures.push(ParseError::invalid(
						&path::key(path, name),
						"Unknown field is not permitted",
					));
				}
			}
		}
		if failures.is_empty() {
			Ok(Value::Object(parsed))
		} else {
			Err(ParseError::aggregate(failures))
		}
	}

	fn parse_json_payload(&self, payload: &[u8], path: &str) -> ParseResult<Value> {
		let decoded: serde_json::Value = serde_json::from_slice(payload).map_err(|_| {
			ParseError::invalid(path, "Value cannot be converted to an object")
		})?;
		match Value::from(decoded) {
			Value::Object(entries) => self.parse_entries(&entries, path),
			_ => Err(ParseError::invalid(
				path,
				"Value cannot be converted to an object",
			)),
		}
	}
}

#[async_trait]
impl Parser for ObjectParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		match value {
			Some(Value::Object(entries)) => self.parse_entries(entries, path),
			Some(Value::Bytes(payload)) => self.parse_json_payload(payload, path),
			Some(Value::String(payload)) => self.parse_json_payload(payload.as_bytes(), path),
			_ => Err(ParseError::invalid(
				path,
				"Value cannot be converted to an object",
			)),
		}
	}

	async fn parse_stream(&self, body: Body, path: &str) -> ParseResult<Value> {
		let (content_type, stream) = body.into_parts();
		let declared = content_type
			.as_deref()
			.and_then(|header| multer::parse_boundary(header).ok());
		let (boundary, stream) = match declared {
			Some(boundary) => (boundary, stream),
			None => {
				let mut sniffer = BoundarySniffer::new(stream);
				match sniffer.sniff().await {
					Ok(boundary) => (boundary, sniffer.into_stream()),
					Err(fatal @ ParseError::Io(_)) => return Err(fatal),
					Err(_) => {
						// Not a multipart body. Every sniffed byte is
						// replayed ahead of the rest, so the buffered sync
						// path sees the complete payload.
						let payload = buffer(sniffer.into_stream()).await?;
						return self.parse_value(Some(&Value::Bytes(payload)), path);
					}
				}
			}
		};
		let fields = multipart::ingest(stream, boundary, &self.spool).await?;
		self.parse_value(Some(&fields.into_value()), path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fields::{int, string};

	fn sample_shape() -> ObjectParser {
		object().field("a", int()).field("b", string())
	}

	#[test]
	fn test_every_failing_key_is_reported() {
		// Arrange
		let parser = sample_shape();
		let input = Value::from(serde_json::json!({"a": "x", "b": {}}));

		// Act
		let err = parser.parse(&input).unwrap_err();

		// Assert: both paths appear in the one aggregated error
		let message = err.to_string();
		assert!(message.contains("root.a"));
		assert!(message.contains("root.b"));
	}

	#[test]
	fn test_missing_key_is_parsed_as_absent() {
		// Arrange
		let parser = sample_shape();
		let input = Value::from(serde_json::json!({"a": 1}));

		// Act
		let err = parser.parse(&input).unwrap_err();

		// Assert
		assert!(err.to_string().contains("root.b: This field is required"));
	}

	#[test]
	fn test_successful_parse_is_idempotent() {
		// Arrange
		let parser = sample_shape();
		let input = Value::from(serde_json::json!({"a": 3, "b": "text"}));

		// Act
		let once = parser.parse(&input).unwrap();
		let twice = parser.parse(&once).unwrap();

		// Assert
		assert_eq!(once, twice);
	}

	#[test]
	fn test_unknown_keys_ignored_by_default() {
		// Arrange
		let parser = sample_shape();
		let input = Value::from(serde_json::json!({"a": 1, "b": "x", "extra": true}));

		// Act
		let parsed = parser.parse(&input).unwrap();

		// Assert: the result carries declared keys only
		assert!(parsed.get("extra").is_none());
		assert_eq!(parsed.get("a"), Some(&Value::Int(1)));
	}

	#[test]
	fn test_deny_unknown_reports_each_unknown_key() {
		// Arrange
		let parser = sample_shape().deny_unknown();
		let input =
			Value::from(serde_json::json!({"a": 1, "b": "x", "c": 1, "d": 2}));

		// Act
		let err = parser.parse(&input).unwrap_err();

		// Assert
		let message = err.to_string();
		assert!(message.contains("root.c"));
		assert!(message.contains("root.d"));
	}

	#[test]
	fn test_json_payload_fallback() {
		// Arrange
		let parser = sample_shape();
		let input = Value::from(r#"{"a": 2, "b": "ok"}"#);

		// Act
		let parsed = parser.parse(&input).unwrap();

		// Assert
		assert_eq!(parsed.get("a"), Some(&Value::Int(2)));
	}

	#[test]
	fn test_non_object_json_payload_is_rejected() {
		// Arrange
		let parser = sample_shape();

		// Act
		let err = parser.parse(&Value::from("[1, 2, 3]")).unwrap_err();

		// Assert
		assert!(
			err.to_string()
				.contains("cannot be converted to an object")
		);
	}

	#[test]
	fn test_non_mapping_input_is_rejected() {
		// Arrange
		let parser = sample_shape();

		// Act & Assert
		assert!(parser.parse(&Value::Int(5)).is_err());
		assert!(parser.parse_value(None, "root").is_err());
	}

	#[test]
	fn test_nested_object_paths() {
		// Arrange
		let parser = object().field("profile", object().field("age", int()));
		let input = Value::from(serde_json::json!({"profile": {"age": "old"}}));

		// Act
		let err = parser.parse(&input).unwrap_err();

		// Assert
		assert!(err.to_string().contains("root.profile.age"));
	}
}

//! The dynamic value model.
//!
//! Parsers transform loosely-typed [`Value`]s into strictly-validated ones.
//! `Value` mirrors the JSON data model, extended with raw byte payloads and
//! accumulated file uploads so multipart bodies and JSON bodies flow through
//! the same combinators.

use crate::upload::FileUpload;
use bytes::Bytes;
use std::collections::BTreeMap;

/// A loosely-typed input or strictly-validated output value.
///
/// An *absent* ("undefined") entry is modeled as `Option<&Value>::None` at
/// the parser contract, not as a `Value` variant; `Value::Null` is an
/// explicit null.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Bytes(Bytes),
	Array(Vec<Value>),
	Object(BTreeMap<String, Value>),
	File(FileUpload),
}

impl Value {
	/// Short name of the value's kind, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "boolean",
			Self::Int(_) => "integer",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::Bytes(_) => "bytes",
			Self::Array(_) => "array",
			Self::Object(_) => "object",
			Self::File(_) => "file",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int(value) => Some(*value as f64),
			Self::Float(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(values) => Some(values),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
		match self {
			Self::Object(entries) => Some(entries),
			_ => None,
		}
	}

	pub fn as_file(&self) -> Option<&FileUpload> {
		match self {
			Self::File(upload) => Some(upload),
			_ => None,
		}
	}

	/// Member of an object value, if this is an object containing `key`.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::Value;
	///
	/// let value = Value::from(serde_json::json!({"name": "alice"}));
	/// assert_eq!(value.get("name").and_then(Value::as_str), Some("alice"));
	/// assert!(value.get("missing").is_none());
	/// ```
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_object().and_then(|entries| entries.get(key))
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Bytes> for Value {
	fn from(value: Bytes) -> Self {
		Self::Bytes(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(values: Vec<Value>) -> Self {
		Self::Array(values)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(value) => Self::Bool(value),
			serde_json::Value::Number(number) => match number.as_i64() {
				Some(value) => Self::Int(value),
				None => Self::Float(number.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(value) => Self::String(value),
			serde_json::Value::Array(values) => {
				Self::Array(values.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(entries) => Self::Object(
				entries
					.into_iter()
					.map(|(key, value)| (key, Value::from(value)))
					.collect(),
			),
		}
	}
}

/// One field-map entry: a single value until the same name recurs.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEntry {
	Single(Value),
	Many(Vec<Value>),
}

/// Accumulation target of multipart ingestion.
///
/// Maps field names to their values; a name seen a second time upgrades its
/// entry from a single value to an ordered sequence, preserving arrival
/// order.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
	entries: BTreeMap<String, FieldEntry>,
}

impl FieldMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Install `value` under `name`, upgrading to a sequence on the second
	/// occurrence of the name.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::{FieldMap, Value};
	///
	/// let mut fields = FieldMap::new();
	/// fields.insert("tag", Value::from("a"));
	/// fields.insert("tag", Value::from("b"));
	///
	/// let value = fields.into_value();
	/// let tags = value.get("tag").and_then(Value::as_array).unwrap();
	/// assert_eq!(tags.len(), 2);
	/// ```
	pub fn insert(&mut self, name: impl Into<String>, value: Value) {
		let name = name.into();
		match self.entries.remove(&name) {
			None => {
				self.entries.insert(name, FieldEntry::Single(value));
			}
			Some(FieldEntry::Single(first)) => {
				self.entries.insert(name, FieldEntry::Many(vec![first, value]));
			}
			Some(FieldEntry::Many(mut values)) => {
				values.push(value);
				self.entries.insert(name, FieldEntry::Many(values));
			}
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<&FieldEntry> {
		self.entries.get(name)
	}

	/// Convert into an object value; sequence entries become arrays.
	pub fn into_value(self) -> Value {
		Value::Object(
			self.entries
				.into_iter()
				.map(|(name, entry)| {
					let value = match entry {
						FieldEntry::Single(value) => value,
						FieldEntry::Many(values) => Value::Array(values),
					};
					(name, value)
				})
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_field_map_single_value_stays_scalar() {
		// Arrange
		let mut fields = FieldMap::new();

		// Act
		fields.insert("name", Value::from("alice"));

		// Assert
		assert_eq!(
			fields.get("name"),
			Some(&FieldEntry::Single(Value::from("alice")))
		);
	}

	#[test]
	fn test_field_map_upgrades_on_second_insert() {
		// Arrange
		let mut fields = FieldMap::new();

		// Act
		fields.insert("tag", Value::from("first"));
		fields.insert("tag", Value::from("second"));
		fields.insert("tag", Value::from("third"));

		// Assert: arrival order is preserved through the upgrade
		let value = fields.into_value();
		let tags = value.get("tag").and_then(Value::as_array).unwrap();
		assert_eq!(
			tags,
			&[
				Value::from("first"),
				Value::from("second"),
				Value::from("third"),
			]
		);
	}

	#[test]
	fn test_json_numbers_map_to_int_and_float() {
		// Arrange
		let decoded = serde_json::json!({"count": 3, "ratio": 0.5});

		// Act
		let value = Value::from(decoded);

		// Assert
		assert_eq!(value.get("count"), Some(&Value::Int(3)));
		assert_eq!(value.get("ratio"), Some(&Value::Float(0.5)));
	}
}

//! Composable value parsing with aggregated errors and streaming multipart
//! ingestion.
//!
//! This crate provides:
//! - Small typed parsers that coerce loosely-typed input (strings, numbers,
//!   byte payloads, nested structures) into validated values
//! - Composite combinators (objects, arrays, alternatives) that visit every
//!   child and report all failures in one aggregated, path-tagged error
//! - A streaming path over `multipart/form-data` bodies: boundary sniffing
//!   without a declared content type, field/file accumulation in arrival
//!   order, and adaptive memory/disk spooling for large files
//!
//! # Examples
//!
//! Synchronous parsing of a materialized value:
//!
//! ```
//! use nuages::{Parser, Value, int, object, string};
//!
//! let parser = object()
//!     .field("name", string().with_max(64))
//!     .field("age", int().with_min(0));
//!
//! let input = Value::from(serde_json::json!({"name": "alice", "age": "30"}));
//! let parsed = parser.parse(&input).unwrap();
//! assert_eq!(parsed.get("age"), Some(&Value::Int(30)));
//!
//! // Two invalid keys produce one error mentioning both paths.
//! let bad = Value::from(serde_json::json!({"name": 1, "age": "x"}));
//! let err = parser.parse(&bad).unwrap_err().to_string();
//! assert!(err.contains("root.name") && err.contains("root.age"));
//! ```

pub mod combinators;
pub mod error;
pub mod fields;
pub mod multipart;
pub mod parser;
pub mod path;
pub mod stream;
pub mod upload;
pub mod value;

pub use combinators::{
	AlternativesParser, ArrayParser, DefaultValue, Map, Nullable, ObjectParser,
	OneOfParser, Optional, alternatives, array, object, one_of,
};
pub use error::{ParseError, ParseResult};
pub use fields::{
	BooleanParser, FileParser, FloatParser, IntParser, StringParser, boolean, file,
	float, int, string,
};
pub use parser::Parser;
pub use stream::{Body, ByteStream, buffer};
pub use upload::{DEFAULT_MAX_MEMORY, FileUpload, SpoolConfig};
pub use value::{FieldEntry, FieldMap, Value};

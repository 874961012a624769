//! File-valued fields.

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::stream::Body;
use crate::upload::{FileUpload, SpoolConfig};
use crate::value::Value;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::path::PathBuf;

/// Parser producing a [`FileUpload`].
///
/// The value path accepts an already-accumulated upload, or wraps a byte or
/// string payload in a RAM-resident one. The stream path accumulates
/// incrementally, spooling to disk past the configured memory ceiling.
#[derive(Debug, Default)]
pub struct FileParser {
	config: SpoolConfig,
	max_size: Option<u64>,
}

/// Create a file parser.
///
/// # Examples
///
/// ```
/// use nuages::{Parser, Value, file};
///
/// let parsed = file().parse(&Value::from("payload")).unwrap();
/// assert_eq!(parsed.as_file().unwrap().size(), 7);
/// ```
pub fn file() -> FileParser {
	FileParser::default()
}

impl FileParser {
	/// Set the in-memory ceiling for the stream path.
	pub fn with_max_memory(mut self, max_memory: usize) -> Self {
		self.config.max_memory = max_memory;
		self
	}

	/// Set the directory spooled content is written to.
	pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
		self.config.temp_dir = Some(temp_dir.into());
		self
	}

	/// Cap the accumulated size; the cap is checked after accumulation
	/// completes, not per chunk.
	pub fn with_max_size(mut self, max_size: u64) -> Self {
		self.max_size = Some(max_size);
		self
	}

	fn check_ceiling(&self, upload: &FileUpload, path: &str) -> ParseResult<()> {
		if let Some(max_size) = self.max_size
			&& upload.size() > max_size
		{
			return Err(ParseError::invalid(
				path,
				format!(
					"Ensure this file is at most {max_size} bytes (it is {})",
					upload.size()
				),
			));
		}
		Ok(())
	}
}

#[async_trait]
impl Parser for FileParser {
	fn parse_value(&self, value: Option<&Value>, path: &str) -> ParseResult<Value> {
		let upload = match value {
			None => return Err(ParseError::invalid(path, "This field is required")),
			Some(Value::File(upload)) => upload.clone(),
			Some(Value::Bytes(bytes)) => FileUpload::from_bytes(bytes),
			Some(Value::String(text)) => FileUpload::from_bytes(text.as_bytes()),
			Some(other) => {
				return Err(ParseError::invalid(
					path,
					format!("Value of kind {} cannot be converted to a file", other.kind()),
				));
			}
		};
		self.check_ceiling(&upload, path)?;
		Ok(Value::File(upload))
	}

	async fn parse_stream(&self, body: Body, path: &str) -> ParseResult<Value> {
		let mut stream = body.into_stream();
		let mut upload = FileUpload::new(self.config.clone());
		while let Some(chunk) = stream.next().await {
			upload.append(&chunk?).await?;
		}
		self.check_ceiling(&upload, path)?;
		Ok(Value::File(upload))
	}
}

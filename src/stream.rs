//! Byte-stream input and buffering.
//!
//! [`Body`] pairs a chunked byte stream with the optional content-type header
//! the caller already knows. [`buffer`] is the default drain used by every
//! parser whose stream path has no incremental override.

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, stream};
use std::io;
use std::pin::Pin;

/// Boxed stream of byte chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'static>>;

/// A streaming input body.
pub struct Body {
	stream: ByteStream,
	content_type: Option<String>,
}

impl Body {
	/// Wrap a chunked byte stream.
	pub fn from_stream(
		stream: impl Stream<Item = io::Result<Bytes>> + Send + 'static,
	) -> Self {
		Self {
			stream: Box::pin(stream),
			content_type: None,
		}
	}

	/// Wrap already-materialized bytes as a single-chunk stream.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::Body;
	///
	/// let body = Body::from_bytes(br#"{"name":"alice"}"#.as_slice());
	/// assert!(body.content_type().is_none());
	/// ```
	pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
		let bytes = bytes.into();
		Self::from_stream(stream::iter([Ok(bytes)]))
	}

	/// Attach the request's content-type header, letting multipart parsing
	/// take its boundary from the header instead of sniffing the stream.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::Body;
	///
	/// let body = Body::from_bytes(b"".as_slice())
	///     .with_content_type("multipart/form-data; boundary=abc");
	/// assert_eq!(
	///     body.content_type(),
	///     Some("multipart/form-data; boundary=abc")
	/// );
	/// ```
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	/// The attached content-type header, if any.
	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	/// Discard the header and expose the raw stream.
	pub fn into_stream(self) -> ByteStream {
		self.stream
	}

	pub(crate) fn into_parts(self) -> (Option<String>, ByteStream) {
		(self.content_type, self.stream)
	}
}

impl std::fmt::Debug for Body {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Body")
			.field("content_type", &self.content_type)
			.finish_non_exhaustive()
	}
}

/// Drain a byte stream into one contiguous byte sequence.
pub async fn buffer(
	stream: impl Stream<Item = io::Result<Bytes>> + Unpin,
) -> io::Result<Bytes> {
	let mut stream = stream;
	let mut buffered = BytesMut::new();
	while let Some(chunk) = stream.next().await {
		buffered.extend_from_slice(&chunk?);
	}
	Ok(buffered.freeze())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_buffer_concatenates_chunks() {
		// Arrange
		let chunks = ["hello", " ", "world"]
			.map(|part| Ok(Bytes::copy_from_slice(part.as_bytes())));
		let body = Body::from_stream(stream::iter(chunks));

		// Act
		let buffered = buffer(body.into_stream()).await.unwrap();

		// Assert
		assert_eq!(buffered.as_ref(), b"hello world");
	}

	#[tokio::test]
	async fn test_buffer_surfaces_stream_errors() {
		// Arrange
		let chunks = vec![
			Ok(Bytes::from_static(b"start")),
			Err(io::Error::other("connection reset")),
		];
		let body = Body::from_stream(stream::iter(chunks));

		// Act
		let result = buffer(body.into_stream()).await;

		// Assert
		assert!(result.is_err());
	}
}

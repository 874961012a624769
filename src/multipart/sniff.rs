//! Boundary discovery from a body's own leading bytes.

use crate::error::{ParseError, ParseResult};
use crate::stream::ByteStream;
use bytes::BytesMut;
use futures_util::{StreamExt, stream};

/// Cap on the bytes buffered while searching for the boundary line.
pub const MAX_SNIFF_BYTES: usize = 1024;

/// Recovers the multipart boundary token by inspecting the first line of the
/// body (`--<boundary>\r\n`).
///
/// The sniffer owns the stream while searching. Whatever the outcome,
/// [`into_stream`](Self::into_stream) replays every consumed byte ahead of
/// the untouched remainder, so no bytes are lost or delivered twice to
/// whatever consumes the body next.
pub struct BoundarySniffer {
	stream: ByteStream,
	scratch: BytesMut,
}

impl BoundarySniffer {
	pub fn new(stream: ByteStream) -> Self {
		Self {
			stream,
			scratch: BytesMut::new(),
		}
	}

	/// Read chunks until the first CRLF-terminated line is available and
	/// extract the boundary token from it.
	///
	/// Fails with a framing error when the first line does not start with
	/// `--`, when the cap is exceeded before a full line arrives, or when
	/// the body ends mid-line; fails with an I/O error when the source
	/// stream itself errors.
	pub async fn sniff(&mut self) -> ParseResult<String> {
		loop {
			if let Some(position) = self
				.scratch
				.windows(2)
				.position(|window| window == b"\r\n")
			{
				let line = &self.scratch[..position];
				let Some(token) = line.strip_prefix(b"--") else {
					return Err(ParseError::framing(
						"Request body does not start with a multipart boundary",
					));
				};
				let token = std::str::from_utf8(token).map_err(|_| {
					ParseError::framing("Multipart boundary is not valid UTF-8")
				})?;
				tracing::debug!(boundary = token, "sniffed multipart boundary");
				return Ok(token.to_string());
			}
			if self.scratch.len() > MAX_SNIFF_BYTES {
				return Err(ParseError::framing(format!(
					"No multipart boundary line within the first {MAX_SNIFF_BYTES} bytes"
				)));
			}
			match self.stream.next().await {
				Some(Ok(chunk)) => self.scratch.extend_from_slice(&chunk),
				Some(Err(err)) => return Err(ParseError::Io(err)),
				None => {
					return Err(ParseError::framing(
						"Body ended before a complete boundary line",
					));
				}
			}
		}
	}

	/// Rebuild the body: the buffered scratch bytes followed by the
	/// remaining stream.
	pub fn into_stream(self) -> ByteStream {
		if self.scratch.is_empty() {
			self.stream
		} else {
			Box::pin(stream::iter([Ok(self.scratch.freeze())]).chain(self.stream))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::stream::{Body, buffer};
	use bytes::Bytes;
	use std::io;

	fn body_from_chunks(parts: &[&[u8]]) -> ByteStream {
		let chunks: Vec<io::Result<Bytes>> = parts
			.iter()
			.map(|part| Ok(Bytes::copy_from_slice(part)))
			.collect();
		Body::from_stream(stream::iter(chunks)).into_stream()
	}

	#[tokio::test]
	async fn test_sniff_extracts_boundary_token() {
		// Arrange
		let mut sniffer =
			BoundarySniffer::new(body_from_chunks(&[b"--XYZ\r\ncontent"]));

		// Act
		let boundary = sniffer.sniff().await.unwrap();

		// Assert
		assert_eq!(boundary, "XYZ");
	}

	#[tokio::test]
	async fn test_sniff_spans_chunk_seams() {
		// Arrange: the boundary line arrives split across three chunks
		let mut sniffer =
			BoundarySniffer::new(body_from_chunks(&[b"--bou", b"ndary\r", b"\nrest"]));

		// Act
		let boundary = sniffer.sniff().await.unwrap();

		// Assert
		assert_eq!(boundary, "boundary");
	}

	#[tokio::test]
	async fn test_sniff_rejects_non_boundary_first_line() {
		// Arrange
		let mut sniffer =
			BoundarySniffer::new(body_from_chunks(&[b"{\"a\": 1}\r\n"]));

		// Act
		let err = sniffer.sniff().await.unwrap_err();

		// Assert
		assert!(matches!(err, ParseError::Framing(_)));
		assert!(err.to_string().contains("does not start with"));
	}

	#[tokio::test]
	async fn test_sniff_gives_up_past_the_cap() {
		// Arrange: 2 KiB with no CRLF anywhere
		let blob = vec![b'a'; 2048];
		let mut sniffer = BoundarySniffer::new(body_from_chunks(&[&blob]));

		// Act
		let err = sniffer.sniff().await.unwrap_err();

		// Assert
		assert!(matches!(err, ParseError::Framing(_)));
		assert!(err.to_string().contains("1024"));
	}

	#[tokio::test]
	async fn test_sniff_reports_truncated_body() {
		// Arrange
		let mut sniffer = BoundarySniffer::new(body_from_chunks(&[b"--abc"]));

		// Act
		let err = sniffer.sniff().await.unwrap_err();

		// Assert
		assert!(matches!(err, ParseError::Framing(_)));
	}

	#[tokio::test]
	async fn test_into_stream_replays_consumed_bytes_exactly_once() {
		// Arrange
		let mut sniffer =
			BoundarySniffer::new(body_from_chunks(&[b"--b\r\nfirst", b" second"]));
		sniffer.sniff().await.unwrap();

		// Act
		let replayed = buffer(sniffer.into_stream()).await.unwrap();

		// Assert: the full body, boundary line included, in order
		assert_eq!(replayed.as_ref(), b"--b\r\nfirst second");
	}

	#[tokio::test]
	async fn test_into_stream_after_failed_sniff_keeps_the_payload() {
		// Arrange
		let mut sniffer =
			BoundarySniffer::new(body_from_chunks(&[b"{\"k\":", b" true}\r\n"]));
		sniffer.sniff().await.unwrap_err();

		// Act
		let replayed = buffer(sniffer.into_stream()).await.unwrap();

		// Assert
		assert_eq!(replayed.as_ref(), b"{\"k\": true}\r\n");
	}

	#[tokio::test]
	async fn test_sniff_surfaces_stream_errors_as_io() {
		// Arrange
		let chunks: Vec<io::Result<Bytes>> =
			vec![Err(io::Error::other("connection reset"))];
		let mut sniffer =
			BoundarySniffer::new(Body::from_stream(stream::iter(chunks)).into_stream());

		// Act
		let err = sniffer.sniff().await.unwrap_err();

		// Assert
		assert!(matches!(err, ParseError::Io(_)));
	}
}

//! Field and file accumulation over a configured multipart decoder.

use crate::error::{ParseError, ParseResult};
use crate::stream::ByteStream;
use crate::upload::{FileUpload, SpoolConfig};
use crate::value::{FieldMap, Value};
use multer::Multipart;

/// Drive the multipart decoder over `stream` and accumulate every part into
/// a [`FieldMap`].
///
/// The decoder is constructed over the (possibly replayed) stream before any
/// polling begins, so configuration strictly precedes consumption and the
/// first part cannot be missed. Parts are processed in arrival order: text
/// parts are installed directly, file parts are accumulated through a
/// [`FileUpload`] governed by `config`.
///
/// A failed file accumulation (spool I/O) is collected rather than thrown;
/// the remaining parts keep draining so the decoder reaches completion, and
/// the collected failures fail the ingestion at the end. Decoder errors are
/// terminal and surface immediately as framing errors; source stream errors
/// stay I/O errors.
pub async fn ingest(
	stream: ByteStream,
	boundary: impl Into<String>,
	config: &SpoolConfig,
) -> ParseResult<FieldMap> {
	let mut decoder = Multipart::new(stream, boundary.into());
	let mut fields = FieldMap::new();
	let mut failures: Vec<ParseError> = Vec::new();

	while let Some(mut field) = decoder.next_field().await.map_err(decoder_error)? {
		let Some(name) = field.name().map(str::to_owned) else {
			tracing::warn!("skipping multipart part without a field name");
			while field.chunk().await.map_err(decoder_error)?.is_some() {}
			continue;
		};

		if let Some(file_name) = field.file_name().map(str::to_owned) {
			let mut upload = FileUpload::new(config.clone()).with_file_name(file_name);
			if let Some(content_type) = field.content_type().map(|mime| mime.to_string()) {
				upload = upload.with_content_type(content_type);
			}
			let mut failed = false;
			loop {
				match field.chunk().await {
					Ok(Some(chunk)) => {
						if failed {
							continue;
						}
						if let Err(err) = upload.append(&chunk).await {
							tracing::warn!(
								field = %name,
								error = %err,
								"file accumulation failed; draining the rest of the request"
							);
							failures.push(ParseError::Io(err));
							failed = true;
						}
					}
					Ok(None) => break,
					Err(err) => return Err(decoder_error(err)),
				}
			}
			if !failed {
				fields.insert(name, Value::File(upload));
			}
		} else {
			let text = field.text().await.map_err(decoder_error)?;
			fields.insert(name, Value::String(text));
		}
	}

	if failures.is_empty() {
		Ok(fields)
	} else {
		Err(ParseError::aggregate(failures))
	}
}

fn decoder_error(err: multer::Error) -> ParseError {
	match err {
		multer::Error::StreamReadFailed(source) => {
			ParseError::Io(std::io::Error::other(source))
		}
		other => ParseError::Framing(other.to_string()),
	}
}

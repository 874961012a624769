//! Parse errors and failure aggregation.
//!
//! Composite parsers never stop at the first failing child: every sibling is
//! attempted, the validation failures are collected, and one aggregated error
//! is produced at the composite's boundary. Fatal kinds (I/O, multipart
//! framing) propagate immediately instead of joining an aggregate.

use std::io;

/// Result alias used across the crate.
pub type ParseResult<T> = Result<T, ParseError>;

/// Error produced by a parse.
///
/// Exactly one `ParseError` is surfaced per top-level parse call; when several
/// independent sub-parses failed, the message concatenates every contributing
/// failure, one per line, each carrying its own path tag.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	/// A value failed coercion, bounds, or shape validation.
	#[error("{0}")]
	Invalid(String),
	/// Disk spooling or source stream failure, surfaced as-is.
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
	/// Boundary not found or malformed multipart structure; terminal for the
	/// ingestion session that raised it.
	#[error("{0}")]
	Framing(String),
}

impl ParseError {
	/// Build a validation error whose message is tagged with the accessor
	/// path it occurred at.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::ParseError;
	///
	/// let err = ParseError::invalid("root.age", "Value cannot be converted to an integer");
	/// assert_eq!(
	///     err.to_string(),
	///     "root.age: Value cannot be converted to an integer"
	/// );
	/// ```
	pub fn invalid(path: &str, message: impl AsRef<str>) -> Self {
		Self::Invalid(format!("{}: {}", path, message.as_ref()))
	}

	/// Build a framing error.
	pub fn framing(message: impl Into<String>) -> Self {
		Self::Framing(message.into())
	}

	/// Whether this error is a validation failure (coercion, bounds, shape,
	/// or an aggregate of those), as opposed to a fatal I/O or framing error.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::ParseError;
	///
	/// assert!(ParseError::invalid("root", "bad").is_validation());
	/// assert!(!ParseError::framing("truncated body").is_validation());
	/// ```
	pub fn is_validation(&self) -> bool {
		matches!(self, Self::Invalid(_))
	}

	/// Merge the failures collected by one composite invocation into a single
	/// error, preserving every message in order.
	///
	/// A single error passes through unchanged. A set of validation failures
	/// joins into one validation error. A set containing a fatal failure
	/// stays fatal so it is never reinterpreted as a validation outcome.
	///
	/// # Panics
	///
	/// Panics if `failures` is empty; composites only aggregate after at
	/// least one child failed.
	pub fn aggregate(mut failures: Vec<ParseError>) -> Self {
		assert!(!failures.is_empty(), "aggregating zero failures");
		if failures.len() == 1 {
			return failures.remove(0);
		}
		let all_validation = failures.iter().all(ParseError::is_validation);
		let joined = failures
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join("\n");
		if all_validation {
			Self::Invalid(joined)
		} else {
			Self::Io(io::Error::other(joined))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_aggregate_preserves_every_message() {
		// Arrange
		let failures = vec![
			ParseError::invalid("root.a", "first failure"),
			ParseError::invalid("root.b", "second failure"),
		];

		// Act
		let merged = ParseError::aggregate(failures);

		// Assert
		let message = merged.to_string();
		assert!(message.contains("root.a: first failure"));
		assert!(message.contains("root.b: second failure"));
		assert!(merged.is_validation());
	}

	#[test]
	fn test_aggregate_single_error_passes_through() {
		// Arrange
		let failures = vec![ParseError::framing("bad boundary")];

		// Act
		let merged = ParseError::aggregate(failures);

		// Assert
		assert!(matches!(merged, ParseError::Framing(_)));
	}

	#[test]
	fn test_aggregate_with_io_failure_stays_fatal() {
		// Arrange
		let failures = vec![
			ParseError::invalid("root.a", "bad value"),
			ParseError::Io(io::Error::other("disk full")),
		];

		// Act
		let merged = ParseError::aggregate(failures);

		// Assert
		assert!(!merged.is_validation());
		assert!(merged.to_string().contains("disk full"));
		assert!(merged.to_string().contains("root.a: bad value"));
	}
}

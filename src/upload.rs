//! File accumulation with adaptive memory/disk spooling.
//!
//! Every accumulation starts RAM-resident. Once the buffered size exceeds the
//! configured ceiling the upload is upgraded exactly once: the buffered bytes
//! are flushed to a collision-resistantly named file in the spool directory
//! and all further appends write through to disk. Small and large parts of
//! the same request may therefore end up in different backings.
//!
//! Spooled temp files are not deleted by this crate; once a parse completes,
//! the upload (and its backing file) belongs to the caller.

use bytes::{Bytes, BytesMut};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Default in-memory ceiling before an upload spills to disk (1 MiB).
pub const DEFAULT_MAX_MEMORY: usize = 1024 * 1024;

/// Spooling policy carried by each accumulation.
#[derive(Debug, Clone)]
pub struct SpoolConfig {
	/// Largest number of buffered bytes kept in memory. Appending past this
	/// ceiling upgrades the upload to its disk backing.
	pub max_memory: usize,
	/// Directory receiving spooled files; the platform temp directory when
	/// unset.
	pub temp_dir: Option<PathBuf>,
}

impl Default for SpoolConfig {
	fn default() -> Self {
		Self {
			max_memory: DEFAULT_MAX_MEMORY,
			temp_dir: None,
		}
	}
}

impl SpoolConfig {
	/// Set the in-memory ceiling.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::SpoolConfig;
	///
	/// let config = SpoolConfig::default().with_max_memory(64 * 1024);
	/// assert_eq!(config.max_memory, 64 * 1024);
	/// ```
	pub fn with_max_memory(mut self, max_memory: usize) -> Self {
		self.max_memory = max_memory;
		self
	}

	/// Set the directory spooled files are written to.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::SpoolConfig;
	/// use std::path::PathBuf;
	///
	/// let config = SpoolConfig::default().with_temp_dir("/var/spool/uploads");
	/// assert_eq!(config.temp_dir, Some(PathBuf::from("/var/spool/uploads")));
	/// ```
	pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
		self.temp_dir = Some(temp_dir.into());
		self
	}

	fn spool_dir(&self) -> PathBuf {
		self.temp_dir.clone().unwrap_or_else(env::temp_dir)
	}
}

#[derive(Debug, Clone, PartialEq)]
enum Backing {
	Memory(BytesMut),
	Spooled(PathBuf),
}

/// An accumulated file value.
///
/// One type behind both storage variants: RAM-resident uploads own a growing
/// byte buffer, spooled uploads own a path to their backing file. `size()`
/// always equals the number of bytes appended so far regardless of variant.
#[derive(Debug, Clone)]
pub struct FileUpload {
	file_name: Option<String>,
	content_type: Option<String>,
	size: u64,
	backing: Backing,
	config: SpoolConfig,
}

impl PartialEq for FileUpload {
	fn eq(&self, other: &Self) -> bool {
		self.file_name == other.file_name
			&& self.content_type == other.content_type
			&& self.size == other.size
			&& self.backing == other.backing
	}
}

impl FileUpload {
	/// Create an empty RAM-resident upload governed by `config`.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::{FileUpload, SpoolConfig};
	///
	/// let upload = FileUpload::new(SpoolConfig::default());
	/// assert_eq!(upload.size(), 0);
	/// assert!(!upload.is_spooled());
	/// ```
	pub fn new(config: SpoolConfig) -> Self {
		Self {
			file_name: None,
			content_type: None,
			size: 0,
			backing: Backing::Memory(BytesMut::new()),
			config,
		}
	}

	/// Wrap already-materialized bytes as a RAM-resident upload.
	///
	/// # Examples
	///
	/// ```
	/// use nuages::FileUpload;
	///
	/// let upload = FileUpload::from_bytes(b"payload".as_slice());
	/// assert_eq!(upload.size(), 7);
	/// ```
	pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
		let bytes = bytes.as_ref();
		Self {
			file_name: None,
			content_type: None,
			size: bytes.len() as u64,
			backing: Backing::Memory(BytesMut::from(bytes)),
			config: SpoolConfig::default(),
		}
	}

	/// Set the client-supplied file name.
	pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
		self.file_name = Some(file_name.into());
		self
	}

	/// Set the declared content type.
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	/// Client-supplied file name, if any.
	pub fn file_name(&self) -> Option<&str> {
		self.file_name.as_deref()
	}

	/// Declared content type, if any.
	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	/// Total number of bytes appended so far.
	pub fn size(&self) -> u64 {
		self.size
	}

	/// Whether the upload has been upgraded to its disk backing.
	pub fn is_spooled(&self) -> bool {
		matches!(self.backing, Backing::Spooled(_))
	}

	/// Path of the backing file for a spooled upload.
	pub fn spool_path(&self) -> Option<&Path> {
		match &self.backing {
			Backing::Memory(_) => None,
			Backing::Spooled(path) => Some(path),
		}
	}

	/// Append a chunk, upgrading to the disk backing when the buffered size
	/// exceeds the configured ceiling.
	///
	/// The upgrade flushes the buffered bytes to a freshly named file and
	/// discards the in-memory buffer; every later append writes through to
	/// disk. A failed disk write leaves any partial artifact in place and
	/// surfaces the error to the caller.
	pub async fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
		match &mut self.backing {
			Backing::Memory(buffer) => {
				buffer.extend_from_slice(chunk);
				self.size += chunk.len() as u64;
				if buffer.len() > self.config.max_memory {
					self.spill().await?;
				}
			}
			Backing::Spooled(path) => {
				let mut file = fs::OpenOptions::new().append(true).open(path).await?;
				file.write_all(chunk).await?;
				file.flush().await?;
				self.size += chunk.len() as u64;
			}
		}
		Ok(())
	}

	async fn spill(&mut self) -> io::Result<()> {
		let Backing::Memory(buffer) = &self.backing else {
			return Ok(());
		};
		let path = self
			.config
			.spool_dir()
			.join(format!("nuages-{}.spool", uuid::Uuid::new_v4()));
		fs::write(&path, buffer).await?;
		tracing::debug!(
			bytes = buffer.len(),
			path = %path.display(),
			"upload spilled to disk"
		);
		self.backing = Backing::Spooled(path);
		Ok(())
	}

	/// Read the full accumulated contents.
	pub async fn contents(&self) -> io::Result<Bytes> {
		match &self.backing {
			Backing::Memory(buffer) => Ok(buffer.clone().freeze()),
			Backing::Spooled(path) => Ok(Bytes::from(fs::read(path).await?)),
		}
	}

	/// Write the accumulated contents to `dest`.
	///
	/// A spooled upload is copied; its backing file is left in place for the
	/// caller to clean up.
	pub async fn persist(&self, dest: impl AsRef<Path>) -> io::Result<()> {
		match &self.backing {
			Backing::Memory(buffer) => fs::write(dest, buffer).await,
			Backing::Spooled(path) => {
				fs::copy(path, dest).await?;
				Ok(())
			}
		}
	}

	/// Open a readable view over the accumulated contents.
	pub async fn reader(&self) -> io::Result<Pin<Box<dyn AsyncRead + Send>>> {
		match &self.backing {
			Backing::Memory(buffer) => {
				Ok(Box::pin(io::Cursor::new(buffer.clone().freeze())))
			}
			Backing::Spooled(path) => Ok(Box::pin(fs::File::open(path).await?)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::io::AsyncReadExt;

	#[tokio::test]
	async fn test_append_up_to_ceiling_stays_in_memory() {
		// Arrange
		let config = SpoolConfig::default().with_max_memory(8);
		let mut upload = FileUpload::new(config);

		// Act
		upload.append(b"12345678").await.unwrap();

		// Assert
		assert!(!upload.is_spooled());
		assert_eq!(upload.size(), 8);
	}

	#[tokio::test]
	async fn test_append_past_ceiling_upgrades_once() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let config = SpoolConfig::default()
			.with_max_memory(8)
			.with_temp_dir(dir.path());
		let mut upload = FileUpload::new(config);

		// Act
		upload.append(b"12345678").await.unwrap();
		upload.append(b"9").await.unwrap();

		// Assert
		assert!(upload.is_spooled());
		assert_eq!(upload.size(), 9);
		let path = upload.spool_path().unwrap();
		assert!(path.starts_with(dir.path()));
		assert_eq!(upload.contents().await.unwrap().as_ref(), b"123456789");
	}

	#[tokio::test]
	async fn test_appends_after_upgrade_write_through() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let config = SpoolConfig::default()
			.with_max_memory(4)
			.with_temp_dir(dir.path());
		let mut upload = FileUpload::new(config);

		// Act
		upload.append(b"abcdef").await.unwrap();
		upload.append(b"ghi").await.unwrap();
		upload.append(b"jkl").await.unwrap();

		// Assert
		assert!(upload.is_spooled());
		assert_eq!(upload.size(), 12);
		let on_disk = std::fs::read(upload.spool_path().unwrap()).unwrap();
		assert_eq!(on_disk, b"abcdefghijkl");
	}

	#[tokio::test]
	async fn test_persist_memory_and_spooled() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let mut small = FileUpload::new(SpoolConfig::default());
		small.append(b"small").await.unwrap();
		let mut large = FileUpload::new(
			SpoolConfig::default()
				.with_max_memory(2)
				.with_temp_dir(dir.path()),
		);
		large.append(b"large contents").await.unwrap();

		// Act
		let small_dest = dir.path().join("small.out");
		let large_dest = dir.path().join("large.out");
		small.persist(&small_dest).await.unwrap();
		large.persist(&large_dest).await.unwrap();

		// Assert
		assert_eq!(std::fs::read(&small_dest).unwrap(), b"small");
		assert_eq!(std::fs::read(&large_dest).unwrap(), b"large contents");
		// The spool file remains for the caller to clean up.
		assert!(large.spool_path().unwrap().exists());
	}

	#[tokio::test]
	async fn test_reader_streams_contents() {
		// Arrange
		let mut upload = FileUpload::new(SpoolConfig::default());
		upload.append(b"streamed").await.unwrap();

		// Act
		let mut reader = upload.reader().await.unwrap();
		let mut read = Vec::new();
		reader.read_to_end(&mut read).await.unwrap();

		// Assert
		assert_eq!(read, b"streamed");
	}

	#[tokio::test]
	async fn test_spill_into_missing_directory_fails() {
		// Arrange
		let config = SpoolConfig::default()
			.with_max_memory(1)
			.with_temp_dir("/nonexistent/spool/dir");
		let mut upload = FileUpload::new(config);

		// Act
		let result = upload.append(b"overflow").await;

		// Assert
		assert!(result.is_err());
	}
}

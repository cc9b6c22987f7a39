//! Storage backend trait definition.

use crate::Result;
use async_trait::async_trait;

/// Storage backend trait for attachment bytes.
///
/// Names are relative paths inside the backend's namespace. Backends reject
/// names that would escape it. Files are write-once: saving never replaces
/// an existing file, so concurrent uploads cannot clobber each other.
///
/// # Examples
///
/// ```rust,no_run
/// use reinhardt_webforms_storage::{Result, StorageBackend, StorageError};
///
/// async fn replace(storage: &dyn StorageBackend, name: &str, content: &[u8]) -> Result<()> {
///     match storage.delete(name).await {
///         Ok(()) | Err(StorageError::NotFound(_)) => {}
///         Err(e) => return Err(e),
///     }
///     storage.save(name, content).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
	/// Store a new file, creating parent directories as needed.
	///
	/// # Returns
	///
	/// The final file name after saving.
	///
	/// # Errors
	///
	/// Returns `` `StorageError::AlreadyExists` `` if a file is already stored
	/// under `name`, and `` `StorageError::PermissionDenied` `` if the name
	/// escapes the backend's namespace or write access is denied.
	async fn save(&self, name: &str, content: &[u8]) -> Result<String>;

	/// Delete a file.
	///
	/// # Errors
	///
	/// Returns `` `StorageError::NotFound` `` if the file doesn't exist.
	async fn delete(&self, name: &str) -> Result<()>;
}

//! Filesystem backend rooted at a configured directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::validate_name;
use crate::config::LocalConfig;
use crate::{Result, StorageBackend, StorageError};

/// Stores attachments as files below `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
	base_path: PathBuf,
}

impl LocalStorage {
	/// Open the storage directory.
	///
	/// # Errors
	///
	/// Returns `` `StorageError::ConfigError` `` if the base path does not
	/// exist or is not a directory.
	pub fn new(config: LocalConfig) -> Result<Self> {
		let base_path = PathBuf::from(config.base_path);
		if !base_path.is_dir() {
			let reason = if base_path.exists() {
				"is not a directory"
			} else {
				"does not exist"
			};
			return Err(StorageError::ConfigError(format!(
				"Attachment directory {} {}",
				base_path.display(),
				reason
			)));
		}
		Ok(Self { base_path })
	}

	pub fn base_path(&self) -> &Path {
		&self.base_path
	}

	fn resolve(&self, name: &str) -> Result<PathBuf> {
		validate_name(name)?;
		Ok(self.base_path.join(name))
	}
}

#[async_trait]
impl StorageBackend for LocalStorage {
	async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
		let path = self.resolve(name)?;
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).await?;
		}

		let mut file = fs::OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(&path)
			.await
			.map_err(|e| match e.kind() {
				ErrorKind::AlreadyExists => StorageError::AlreadyExists(name.to_string()),
				_ => StorageError::Io(e),
			})?;
		file.write_all(content).await?;
		file.flush().await?;

		Ok(name.to_string())
	}

	async fn delete(&self, name: &str) -> Result<()> {
		let path = self.resolve(name)?;
		fs::remove_file(&path).await.map_err(|e| match e.kind() {
			ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
			_ => StorageError::Io(e),
		})?;

		// Drop the per-record directory once its last file is gone.
		if let Some(parent) = path.parent()
			&& parent != self.base_path
		{
			let _ = fs::remove_dir(parent).await;
		}
		Ok(())
	}
}

//! Configuration types for attachment storage.

use crate::{Result, StorageError};
use std::env;
use std::str::FromStr;

/// Default URL prefix attachments are served under.
pub const DEFAULT_FILES_URL: &str = "/files";

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
	/// Local file system
	Local,
	/// Process memory
	Memory,
}

impl std::fmt::Display for BackendType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			BackendType::Local => write!(f, "Local"),
			BackendType::Memory => write!(f, "Memory"),
		}
	}
}

impl FromStr for BackendType {
	type Err = StorageError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_lowercase().as_str() {
			"local" => Ok(BackendType::Local),
			"memory" => Ok(BackendType::Memory),
			_ => Err(StorageError::ConfigError(format!(
				"Invalid backend type: {}",
				s
			))),
		}
	}
}

/// Configuration for local file system backend.
#[derive(Debug, Clone)]
pub struct LocalConfig {
	/// Base directory path for file storage
	pub base_path: String,
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub enum StorageConfig {
	Local(LocalConfig),
	Memory,
}

impl StorageConfig {
	/// Backend type this configuration selects.
	pub fn backend_type(&self) -> BackendType {
		match self {
			StorageConfig::Local(_) => BackendType::Local,
			StorageConfig::Memory => BackendType::Memory,
		}
	}

	/// Load configuration from environment variables.
	///
	/// # Environment Variables
	///
	/// - `WEBFORM_STORAGE_BACKEND`: Backend type ("local", "memory"), defaults to "local"
	/// - `WEBFORM_STORAGE_PATH`: Base directory path (required for "local")
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Load configuration through an arbitrary key lookup.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_webforms_storage::{BackendType, StorageConfig};
	///
	/// let config = StorageConfig::from_lookup(|key| match key {
	///     "WEBFORM_STORAGE_BACKEND" => Some("memory".to_string()),
	///     _ => None,
	/// })
	/// .unwrap();
	///
	/// assert_eq!(config.backend_type(), BackendType::Memory);
	/// ```
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let backend_type = match lookup("WEBFORM_STORAGE_BACKEND") {
			Some(value) => value.parse::<BackendType>()?,
			None => BackendType::Local,
		};

		match backend_type {
			BackendType::Local => {
				let base_path = lookup("WEBFORM_STORAGE_PATH").ok_or_else(|| {
					StorageError::ConfigError(
						"WEBFORM_STORAGE_PATH environment variable not set".to_string(),
					)
				})?;

				Ok(StorageConfig::Local(LocalConfig { base_path }))
			}
			BackendType::Memory => Ok(StorageConfig::Memory),
		}
	}
}

/// How stored attachments are exposed to web forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentConfig {
	/// URL prefix prepended to stored file names
	pub files_url: String,
	/// Upload limit in bytes
	pub max_file_size: u64,
}

impl Default for AttachmentConfig {
	fn default() -> Self {
		Self {
			files_url: DEFAULT_FILES_URL.to_string(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
		}
	}
}

impl AttachmentConfig {
	/// Load configuration from environment variables.
	///
	/// # Environment Variables
	///
	/// - `WEBFORM_FILES_URL`: URL prefix, defaults to "/files"
	/// - `WEBFORM_MAX_FILE_SIZE`: upload limit in bytes
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Load configuration through an arbitrary key lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(value) = lookup("WEBFORM_FILES_URL") {
			config.files_url = value;
		}
		if let Some(value) = lookup("WEBFORM_MAX_FILE_SIZE") {
			config.max_file_size = value.parse().map_err(|_| {
				StorageError::ConfigError(format!("Invalid WEBFORM_MAX_FILE_SIZE: {}", value))
			})?;
		}

		Ok(config)
	}

	/// Use a different URL prefix.
	pub fn with_files_url(mut self, files_url: impl Into<String>) -> Self {
		self.files_url = files_url.into();
		self
	}

	/// Use a different upload limit.
	pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
		self.max_file_size = max_file_size;
		self
	}
}

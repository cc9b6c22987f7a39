//! Storage error types.

use reinhardt_webforms::WebFormError;
use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
	/// File does not exist
	#[error("File not found: {0}")]
	NotFound(String),

	/// A file is already stored under the name
	#[error("File already exists: {0}")]
	AlreadyExists(String),

	/// Access to the file was refused
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Underlying filesystem failure
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Backend configuration is missing or invalid
	#[error("Configuration error: {0}")]
	ConfigError(String),

	/// Attachment payload is not valid base64
	#[error("Invalid data URL: {0}")]
	InvalidDataUrl(String),

	/// Attachment exceeds the configured upload limit
	#[error("File size {size} bytes exceeds the limit of {limit} bytes")]
	TooLarge {
		/// Decoded payload size in bytes.
		size: u64,
		/// Configured limit in bytes.
		limit: u64,
	},
}

impl From<StorageError> for WebFormError {
	fn from(err: StorageError) -> Self {
		WebFormError::FileStore(err.to_string())
	}
}

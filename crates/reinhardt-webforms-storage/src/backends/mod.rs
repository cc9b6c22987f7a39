//! Storage backend implementations.

#[cfg(feature = "local")]
pub mod local;
pub mod memory;

#[cfg(feature = "local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

use crate::{Result, StorageError};
use std::path::{Component, Path};

/// Reject names that are empty, absolute or climb out of the namespace.
pub(crate) fn validate_name(name: &str) -> Result<()> {
	if name.is_empty() {
		return Err(StorageError::PermissionDenied("empty file name".to_string()));
	}
	let escapes = Path::new(name)
		.components()
		.any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
	if escapes {
		return Err(StorageError::PermissionDenied(name.to_string()));
	}
	Ok(())
}

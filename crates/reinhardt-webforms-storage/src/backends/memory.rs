//! In-memory storage backend.
//!
//! Useful for tests and for deployments that hand attachments to another
//! system right after upload.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use super::validate_name;
use crate::{Result, StorageBackend, StorageError};

/// In-memory storage backend. Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
	/// Create an empty storage.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored files.
	pub fn len(&self) -> usize {
		self.files.read().len()
	}

	/// Whether no files are stored.
	pub fn is_empty(&self) -> bool {
		self.files.read().is_empty()
	}

	/// Stored file names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.files.read().keys().cloned().collect();
		names.sort();
		names
	}

	/// Content stored under `name`.
	pub fn content(&self, name: &str) -> Option<Vec<u8>> {
		self.files.read().get(name).cloned()
	}
}

#[async_trait]
impl StorageBackend for MemoryStorage {
	async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
		validate_name(name)?;
		match self.files.write().entry(name.to_string()) {
			Entry::Occupied(_) => Err(StorageError::AlreadyExists(name.to_string())),
			Entry::Vacant(slot) => {
				slot.insert(content.to_vec());
				Ok(name.to_string())
			}
		}
	}

	async fn delete(&self, name: &str) -> Result<()> {
		validate_name(name)?;
		self.files
			.write()
			.remove(name)
			.map(|_| ())
			.ok_or_else(|| StorageError::NotFound(name.to_string()))
	}
}

//! [`FileStore`] implementation over a [`StorageBackend`].
//!
//! Attachments are stored as `<doctype>/<name>/<file>`, each record segment
//! form-urlencoded, and served at `<files_url>/<stored name>`. Ownership is
//! read back from that path, so any store over the same backend agrees on
//! which record a file belongs to.

use async_trait::async_trait;
use reinhardt_webforms::{FileRef, FileStore, WebFormResult};
use std::sync::Arc;
use url::form_urlencoded;

use crate::config::AttachmentConfig;
use crate::{Result, StorageBackend, StorageError};

/// Stores web form attachments in a storage backend.
///
/// Removing a URL on behalf of one record never deletes a file stored for
/// another record.
#[derive(Clone)]
pub struct AttachmentStore {
	backend: Arc<dyn StorageBackend>,
	config: AttachmentConfig,
}

impl std::fmt::Debug for AttachmentStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AttachmentStore")
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

impl AttachmentStore {
	/// Create a store writing to `backend`.
	pub fn new(backend: Arc<dyn StorageBackend>, config: AttachmentConfig) -> Self {
		Self { backend, config }
	}

	/// Attachment configuration in use.
	pub fn config(&self) -> &AttachmentConfig {
		&self.config
	}

	/// Underlying storage backend.
	pub fn backend(&self) -> Arc<dyn StorageBackend> {
		Arc::clone(&self.backend)
	}

	fn url_for(&self, stored_name: &str) -> String {
		format!("{}/{}", self.config.files_url.trim_end_matches('/'), stored_name)
	}

	/// Stored name behind `file_url` when it is a file of the given record.
	fn owned_name(&self, file_url: &str, doctype: &str, name: &str) -> Option<String> {
		let prefix = format!("{}/", self.config.files_url.trim_end_matches('/'));
		let stored = file_url.strip_prefix(&prefix)?;
		let file = stored.strip_prefix(&record_dir(doctype, name).ok()?)?;
		let single_segment = !file.is_empty()
			&& !file.contains(['/', '\\'])
			&& file != "."
			&& file != "..";
		single_segment.then(|| stored.to_string())
	}

	/// Save under the client's file name, falling back to a random prefix
	/// when the record already holds a file of that name.
	async fn save_unique(&self, dir: &str, filename: &str, content: &[u8]) -> Result<String> {
		let clean = sanitize_filename(filename);
		match self.backend.save(&format!("{}{}", dir, clean), content).await {
			Err(StorageError::AlreadyExists(_)) => {
				let token = uuid::Uuid::new_v4().simple().to_string();
				self.backend
					.save(&format!("{}{}-{}", dir, &token[..8], clean), content)
					.await
			}
			saved => saved,
		}
	}
}

/// Directory holding one record's attachments, with a trailing slash.
fn record_dir(doctype: &str, name: &str) -> Result<String> {
	if doctype.is_empty() || name.is_empty() {
		return Err(StorageError::PermissionDenied(
			"attachments need a record type and name".to_string(),
		));
	}
	Ok(format!("{}/{}/", path_segment(doctype), path_segment(name)))
}

/// Encode a record identifier as one path segment. Dots are escaped so no
/// identifier can turn into `.` or `..`.
fn path_segment(value: &str) -> String {
	form_urlencoded::byte_serialize(value.as_bytes())
		.collect::<String>()
		.replace('.', "%2E")
}

/// Reduce a client-supplied file name to a safe single path segment.
///
/// # Examples
///
/// ```
/// use reinhardt_webforms_storage::file_store::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_filename("My CV (final).pdf"), "My_CV__final_.pdf");
/// ```
pub fn sanitize_filename(filename: &str) -> String {
	let base = filename
		.rsplit(['/', '\\'])
		.next()
		.unwrap_or_default()
		.trim_start_matches('.');
	let clean: String = base
		.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
				c
			} else {
				'_'
			}
		})
		.collect();
	if clean.is_empty() {
		"attachment".to_string()
	} else {
		clean
	}
}

#[async_trait]
impl FileStore for AttachmentStore {
	async fn save_file(
		&self,
		filename: &str,
		data_url: &str,
		doctype: &str,
		name: &str,
	) -> WebFormResult<FileRef> {
		let content = crate::data_url::decode(data_url)?;
		let size = content.len() as u64;
		if size > self.config.max_file_size {
			return Err(StorageError::TooLarge {
				size,
				limit: self.config.max_file_size,
			}
			.into());
		}

		let dir = record_dir(doctype, name)?;
		let stored = self.save_unique(&dir, filename, &content).await?;
		let file_url = self.url_for(&stored);

		tracing::info!(
			file_url = %file_url,
			size,
			doctype,
			name,
			"stored web form attachment"
		);

		Ok(FileRef {
			file_url,
			file_name: stored,
			size,
			attached_to_doctype: doctype.to_string(),
			attached_to_name: name.to_string(),
		})
	}

	async fn remove_file_by_url(
		&self,
		file_url: &str,
		doctype: &str,
		name: &str,
	) -> WebFormResult<()> {
		let Some(stored) = self.owned_name(file_url, doctype, name) else {
			tracing::debug!(
				file_url,
				doctype,
				name,
				"attachment URL is not a file of this record, skipping"
			);
			return Ok(());
		};

		match self.backend.delete(&stored).await {
			Ok(()) => {
				tracing::info!(file_url, doctype, name, "removed web form attachment");
			}
			Err(StorageError::NotFound(_)) => {
				tracing::debug!(file_url, "attachment already gone");
			}
			Err(e) => return Err(e.into()),
		}
		Ok(())
	}
}

//! Collaborator interfaces a web form needs from the rest of the framework.
//!
//! Persistence, file storage, comments and website-level permissions live
//! outside this crate. Each is consumed through one of the traits below so
//! the web form logic stays independent of any concrete backend.

use crate::error::WebFormResult;
use crate::permission::PermissionType;
use crate::record::{Record, RecordType};
use crate::user::CurrentUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for persisting a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
	/// Identity performing the write; becomes the owner on insert
	pub user: String,
	/// Skip the store's own permission checks
	pub ignore_permissions: bool,
}

impl SaveOptions {
	pub fn new(user: &CurrentUser) -> Self {
		Self {
			user: user.id().to_string(),
			ignore_permissions: false,
		}
	}

	/// Options for a write already authorized by the caller.
	pub fn elevated(user: &CurrentUser) -> Self {
		Self {
			user: user.id().to_string(),
			ignore_permissions: true,
		}
	}
}

/// Generic record persistence.
///
/// Implementations are expected to make `insert`, `save` and `delete`
/// atomic; concurrent writers are serialized by the store.
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Schema of a record type.
	async fn meta(&self, doctype: &str) -> WebFormResult<RecordType>;

	/// Load an existing record.
	async fn get(&self, doctype: &str, name: &str) -> WebFormResult<Record>;

	/// Construct an unsaved record with schema defaults applied.
	async fn new_record(&self, doctype: &str) -> WebFormResult<Record> {
		Ok(Record::new(doctype))
	}

	/// Insert a new record, returning it with its assigned name and owner.
	async fn insert(&self, record: Record, options: &SaveOptions) -> WebFormResult<Record>;

	/// Persist changes to an existing record.
	async fn save(&self, record: &Record, options: &SaveOptions) -> WebFormResult<()>;

	async fn delete(&self, doctype: &str, name: &str, options: &SaveOptions)
	-> WebFormResult<()>;

	/// Owner of a record, `None` when the record does not exist.
	async fn owner_of(&self, doctype: &str, name: &str) -> WebFormResult<Option<String>>;

	/// Name of some record of `doctype` owned by `owner`.
	async fn find_by_owner(&self, doctype: &str, owner: &str) -> WebFormResult<Option<String>>;

	/// Record that `user` viewed the record.
	async fn add_seen(&self, doctype: &str, name: &str, user: &str) -> WebFormResult<()>;
}

/// Query for one page of a record list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
	pub doctype: String,
	/// Free-text search
	pub txt: Option<String>,
	/// Field equality filters
	pub filters: IndexMap<String, Value>,
	pub limit_start: usize,
	pub limit_page_length: usize,
	/// Skip the store's permission filtering
	pub ignore_permissions: bool,
}

/// Generic list view over records.
#[async_trait]
pub trait ListView: Send + Sync {
	async fn get_list(&self, query: &ListQuery) -> WebFormResult<Vec<Record>>;
}

/// A comment attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
	pub comment_by: String,
	pub content: String,
	pub creation: DateTime<Utc>,
}

/// Source of comment threads for records.
#[async_trait]
pub trait CommentSource: Send + Sync {
	async fn comments(&self, doctype: &str, name: &str) -> WebFormResult<Vec<Comment>>;
}

/// Website-level permission rules, independent of web forms.
#[async_trait]
pub trait WebsitePermission: Send + Sync {
	async fn has_website_permission(
		&self,
		user: &CurrentUser,
		doctype: &str,
		ptype: PermissionType,
		name: &str,
	) -> WebFormResult<bool>;
}

/// Reference to a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
	/// Public URL stored as the attachment field value
	pub file_url: String,
	pub file_name: String,
	pub size: u64,
	pub attached_to_doctype: String,
	pub attached_to_name: String,
}

/// File storage for attachments.
#[async_trait]
pub trait FileStore: Send + Sync {
	/// Store `data_url` content (`data:<mime>;base64,<payload>` or bare
	/// base64) as `filename`, attached to the given record.
	async fn save_file(
		&self,
		filename: &str,
		data_url: &str,
		doctype: &str,
		name: &str,
	) -> WebFormResult<FileRef>;

	/// Remove a previously stored file by its public URL.
	async fn remove_file_by_url(&self, file_url: &str, doctype: &str, name: &str)
	-> WebFormResult<()>;
}

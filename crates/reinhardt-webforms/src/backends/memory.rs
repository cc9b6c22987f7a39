//! In-memory collaborators for tests and development
//!
//! [`MemoryRecordStore`] keeps records per record type in insertion order and
//! implements [`RecordStore`], [`ListView`] and [`CommentSource`]. Writes
//! that do not skip permission checks are limited to the record owner.
//!
//! # Examples
//!
//! ```
//! use reinhardt_webforms::backends::memory::MemoryRecordStore;
//! use reinhardt_webforms::store::{RecordStore, SaveOptions};
//! use reinhardt_webforms::{CurrentUser, Record, RecordType};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryRecordStore::new();
//!     store.register_type(RecordType::new("Event"));
//!
//!     let user = CurrentUser::authenticated("ada@example.com");
//!     let record = Record::new("Event").with_value("title", "Launch");
//!     let saved = store.insert(record, &SaveOptions::new(&user)).await.unwrap();
//!
//!     assert_eq!(saved.name.as_deref(), Some("Event-0001"));
//!     assert_eq!(saved.owner.as_deref(), Some("ada@example.com"));
//! }
//! ```

use crate::error::{WebFormError, WebFormResult};
use crate::permission::PermissionType;
use crate::record::{Record, RecordType};
use crate::store::{
	Comment, CommentSource, ListQuery, ListView, RecordStore, SaveOptions, WebsitePermission,
};
use crate::user::{CurrentUser, GUEST};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Default)]
struct MemoryState {
	types: HashMap<String, RecordType>,
	records: HashMap<String, IndexMap<String, Record>>,
	counters: HashMap<String, u64>,
	seen: Vec<(String, String, String)>,
	comments: HashMap<(String, String), Vec<Comment>>,
}

/// In-memory record store
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
	state: Arc<RwLock<MemoryState>>,
}

impl MemoryRecordStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a record type schema.
	pub fn register_type(&self, meta: RecordType) {
		self.state.write().types.insert(meta.name.clone(), meta);
	}

	/// Store a record as is, bypassing naming and permission checks.
	///
	/// # Errors
	///
	/// Returns [`WebFormError::Store`] if the record has no name.
	pub fn seed(&self, record: Record) -> WebFormResult<()> {
		let name = record
			.name
			.clone()
			.ok_or_else(|| WebFormError::Store("seeded records need a name".to_string()))?;
		self.state
			.write()
			.records
			.entry(record.doctype.clone())
			.or_default()
			.insert(name, record);
		Ok(())
	}

	pub fn add_comment(&self, doctype: &str, name: &str, comment: Comment) {
		self.state
			.write()
			.comments
			.entry((doctype.to_string(), name.to_string()))
			.or_default()
			.push(comment);
	}

	/// Current stored copy of a record.
	pub fn record(&self, doctype: &str, name: &str) -> Option<Record> {
		self.state
			.read()
			.records
			.get(doctype)
			.and_then(|records| records.get(name))
			.cloned()
	}

	pub fn count(&self, doctype: &str) -> usize {
		self.state
			.read()
			.records
			.get(doctype)
			.map_or(0, IndexMap::len)
	}

	/// Users that viewed a record, in viewing order.
	pub fn seen_by(&self, doctype: &str, name: &str) -> Vec<String> {
		self.state
			.read()
			.seen
			.iter()
			.filter(|(d, n, _)| d == doctype && n == name)
			.map(|(_, _, user)| user.clone())
			.collect()
	}
}

/// Guests share one owner id, so they never pass the owner check.
fn check_owner(existing: &Record, options: &SaveOptions) -> WebFormResult<()> {
	let is_owner =
		options.user != GUEST && existing.owner.as_deref() == Some(options.user.as_str());
	if options.ignore_permissions || is_owner {
		Ok(())
	} else {
		Err(WebFormError::PermissionDenied(format!(
			"{} may not modify {} {}",
			options.user,
			existing.doctype,
			existing.name.as_deref().unwrap_or_default()
		)))
	}
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
	async fn meta(&self, doctype: &str) -> WebFormResult<RecordType> {
		self.state
			.read()
			.types
			.get(doctype)
			.cloned()
			.ok_or_else(|| WebFormError::not_found("DocType", doctype))
	}

	async fn get(&self, doctype: &str, name: &str) -> WebFormResult<Record> {
		self.record(doctype, name)
			.ok_or_else(|| WebFormError::not_found(doctype, name))
	}

	async fn insert(&self, mut record: Record, options: &SaveOptions) -> WebFormResult<Record> {
		if !options.ignore_permissions && options.user == GUEST {
			return Err(WebFormError::PermissionDenied(format!(
				"Guests may not create {} records",
				record.doctype
			)));
		}

		let mut state = self.state.write();
		if !state.types.contains_key(&record.doctype) {
			return Err(WebFormError::not_found("DocType", &record.doctype));
		}

		let counter = state.counters.entry(record.doctype.clone()).or_default();
		*counter += 1;
		let name = format!("{}-{:04}", record.doctype, counter);

		record.name = Some(name.clone());
		record.owner = Some(options.user.clone());
		state
			.records
			.entry(record.doctype.clone())
			.or_default()
			.insert(name, record.clone());
		Ok(record)
	}

	async fn save(&self, record: &Record, options: &SaveOptions) -> WebFormResult<()> {
		let name = record
			.name
			.as_deref()
			.ok_or_else(|| WebFormError::Store("cannot save an unnamed record".to_string()))?;

		let mut state = self.state.write();
		let existing = state
			.records
			.get_mut(&record.doctype)
			.and_then(|records| records.get_mut(name))
			.ok_or_else(|| WebFormError::not_found(&record.doctype, name))?;
		check_owner(existing, options)?;

		let owner = existing.owner.take();
		*existing = record.clone();
		existing.owner = owner;
		Ok(())
	}

	async fn delete(&self, doctype: &str, name: &str, options: &SaveOptions) -> WebFormResult<()> {
		let mut state = self.state.write();
		let records = state
			.records
			.get_mut(doctype)
			.ok_or_else(|| WebFormError::not_found(doctype, name))?;
		let existing = records
			.get(name)
			.ok_or_else(|| WebFormError::not_found(doctype, name))?;
		check_owner(existing, options)?;

		records.shift_remove(name);
		Ok(())
	}

	async fn owner_of(&self, doctype: &str, name: &str) -> WebFormResult<Option<String>> {
		Ok(self.record(doctype, name).and_then(|record| record.owner))
	}

	async fn find_by_owner(&self, doctype: &str, owner: &str) -> WebFormResult<Option<String>> {
		Ok(self.state.read().records.get(doctype).and_then(|records| {
			records
				.values()
				.find(|record| record.owner.as_deref() == Some(owner))
				.and_then(|record| record.name.clone())
		}))
	}

	async fn add_seen(&self, doctype: &str, name: &str, user: &str) -> WebFormResult<()> {
		self.state
			.write()
			.seen
			.push((doctype.to_string(), name.to_string(), user.to_string()));
		Ok(())
	}
}

fn matches_filter(record: &Record, field: &str, expected: &Value) -> bool {
	match field {
		"owner" => record.owner.as_deref() == expected.as_str(),
		"name" => record.name.as_deref() == expected.as_str(),
		_ => record.get(field) == Some(expected),
	}
}

fn matches_txt(record: &Record, txt: &str) -> bool {
	let needle = txt.to_lowercase();
	record
		.name
		.iter()
		.map(String::as_str)
		.chain(record.values().values().filter_map(Value::as_str))
		.any(|value| value.to_lowercase().contains(&needle))
}

#[async_trait]
impl ListView for MemoryRecordStore {
	/// Records in insertion order. Permission filtering is not modelled, so
	/// queries carry their own owner filter.
	async fn get_list(&self, query: &ListQuery) -> WebFormResult<Vec<Record>> {
		let state = self.state.read();
		let Some(records) = state.records.get(&query.doctype) else {
			return Ok(Vec::new());
		};

		Ok(records
			.values()
			.filter(|record| {
				query
					.filters
					.iter()
					.all(|(field, expected)| matches_filter(record, field, expected))
			})
			.filter(|record| {
				query
					.txt
					.as_deref()
					.is_none_or(|txt| txt.is_empty() || matches_txt(record, txt))
			})
			.skip(query.limit_start)
			.take(query.limit_page_length)
			.cloned()
			.collect())
	}
}

#[async_trait]
impl CommentSource for MemoryRecordStore {
	async fn comments(&self, doctype: &str, name: &str) -> WebFormResult<Vec<Comment>> {
		Ok(self
			.state
			.read()
			.comments
			.get(&(doctype.to_string(), name.to_string()))
			.cloned()
			.unwrap_or_default())
	}
}

/// Website permission rules from a fixed allow-list of (record type, action)
/// pairs, granted to authenticated users only.
#[derive(Debug, Clone, Default)]
pub struct StaticWebsitePermission {
	allowed: HashSet<(String, PermissionType)>,
}

impl StaticWebsitePermission {
	/// Rules that never grant access.
	pub fn deny_all() -> Self {
		Self::default()
	}

	pub fn allow(mut self, doctype: impl Into<String>, ptype: PermissionType) -> Self {
		self.allowed.insert((doctype.into(), ptype));
		self
	}
}

#[async_trait]
impl WebsitePermission for StaticWebsitePermission {
	async fn has_website_permission(
		&self,
		user: &CurrentUser,
		doctype: &str,
		ptype: PermissionType,
		_name: &str,
	) -> WebFormResult<bool> {
		Ok(user.is_authenticated() && self.allowed.contains(&(doctype.to_string(), ptype)))
	}
}

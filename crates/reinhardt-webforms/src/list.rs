//! Owner-scoped record lists for forms that allow several records per user.

use crate::error::{WebFormError, WebFormResult};
use crate::record::Record;
use crate::settings::WebFormSettings;
use crate::store::{ListQuery, ListView};
use crate::user::CurrentUser;
use indexmap::IndexMap;
use serde_json::Value;

/// Paging and search input for a list page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
	pub txt: Option<String>,
	pub filters: IndexMap<String, Value>,
	pub limit_start: usize,
	/// Requested page length; capped at the configured list page length
	pub page_length: Option<usize>,
}

impl ListRequest {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_txt(mut self, txt: impl Into<String>) -> Self {
		self.txt = Some(txt.into());
		self
	}

	pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.filters.insert(field.into(), value.into());
		self
	}

	pub fn with_limit_start(mut self, limit_start: usize) -> Self {
		self.limit_start = limit_start;
		self
	}

	pub fn with_page_length(mut self, page_length: usize) -> Self {
		self.page_length = Some(page_length);
		self
	}
}

/// Fetch one page of the caller's own records of `doctype`.
///
/// The owner filter always wins over any caller-supplied `owner` filter and
/// stands in for the list view's permission filtering, which is skipped.
///
/// # Errors
///
/// Returns [`WebFormError::AuthenticationRequired`] for guests.
pub async fn get_web_form_list(
	list_view: &dyn ListView,
	settings: &WebFormSettings,
	doctype: &str,
	user: &CurrentUser,
	request: ListRequest,
) -> WebFormResult<Vec<Record>> {
	if user.is_guest() {
		return Err(WebFormError::AuthenticationRequired(format!(
			"You need to be logged in to list {} records",
			doctype
		)));
	}

	let mut filters = request.filters;
	filters.insert("owner".to_string(), Value::String(user.id().to_string()));

	let query = ListQuery {
		doctype: doctype.to_string(),
		txt: request.txt,
		filters,
		limit_start: request.limit_start,
		limit_page_length: request
			.page_length
			.map_or(settings.list_page_length, |len| len.min(settings.list_page_length)),
		ignore_permissions: true,
	};

	list_view.get_list(&query).await
}

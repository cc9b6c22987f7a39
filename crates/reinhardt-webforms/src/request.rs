//! Per-request input for rendering a web form page.

use crate::user::CurrentUser;
use indexmap::IndexMap;

/// Query parameters and identity of one page view.
///
/// Replaces ambient request globals: everything the context builder reads
/// about the request comes through this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebFormRequest {
	/// Request parameters in the order they were received
	pub params: IndexMap<String, String>,
	pub user: CurrentUser,
}

impl WebFormRequest {
	pub fn new(user: CurrentUser) -> Self {
		Self {
			params: IndexMap::new(),
			user,
		}
	}

	/// Add a request parameter.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_webforms::{CurrentUser, WebFormRequest};
	///
	/// let request = WebFormRequest::new(CurrentUser::guest())
	///     .with_param("new", "1")
	///     .with_param("limit_start", "20");
	///
	/// assert!(request.is_new());
	/// assert_eq!(request.name(), None);
	/// assert_eq!(request.limit_start(), 20);
	/// ```
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	pub fn param(&self, key: &str) -> Option<&str> {
		self.params
			.get(key)
			.map(String::as_str)
			.filter(|value| !value.is_empty())
	}

	/// Requested record name.
	pub fn name(&self) -> Option<&str> {
		self.param("name")
	}

	/// Whether a blank form was explicitly requested.
	pub fn is_new(&self) -> bool {
		self.param("new").is_some_and(|value| value != "0")
	}

	/// Free-text list search.
	pub fn txt(&self) -> Option<&str> {
		self.param("txt")
	}

	/// List offset; unparsable values count as zero.
	pub fn limit_start(&self) -> usize {
		self.param("limit_start")
			.and_then(|value| value.parse().ok())
			.unwrap_or(0)
	}
}

//! Web form settings.
//!
//! Settings are loaded once at startup (TOML or environment) and passed
//! explicitly to every operation that depends on them.

use crate::error::{WebFormError, WebFormResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default page length for list rendering.
pub const DEFAULT_LIST_PAGE_LENGTH: usize = 20;

/// Runtime settings for web forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebFormSettings {
	/// Allows editing standard forms and skips schema reconciliation on load
	pub developer_mode: bool,
	/// Global upload size limit in bytes
	pub max_file_size: u64,
	/// Absolute site URL used for payment callbacks
	pub site_url: String,
	/// Records per list page
	pub list_page_length: usize,
}

impl Default for WebFormSettings {
	fn default() -> Self {
		Self {
			developer_mode: false,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			site_url: "http://localhost:8000".to_string(),
			list_page_length: DEFAULT_LIST_PAGE_LENGTH,
		}
	}
}

impl WebFormSettings {
	/// Parse settings from a TOML document.
	///
	/// Missing keys fall back to their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_webforms::WebFormSettings;
	///
	/// let settings = WebFormSettings::from_toml_str(r#"
	///     developer_mode = true
	///     site_url = "https://example.com"
	/// "#).unwrap();
	///
	/// assert!(settings.developer_mode);
	/// assert_eq!(settings.list_page_length, 20);
	/// ```
	pub fn from_toml_str(source: &str) -> WebFormResult<Self> {
		toml::from_str(source).map_err(|e| WebFormError::Config(e.to_string()))
	}

	/// Load settings from environment variables.
	///
	/// # Environment Variables
	///
	/// - `WEBFORM_DEVELOPER_MODE`: "1"/"true" to enable developer mode
	/// - `WEBFORM_MAX_FILE_SIZE`: upload limit in bytes
	/// - `WEBFORM_SITE_URL`: absolute site URL
	/// - `WEBFORM_LIST_PAGE_LENGTH`: records per list page
	pub fn from_env() -> WebFormResult<Self> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Load settings through an arbitrary key lookup.
	pub fn from_lookup<F>(lookup: F) -> WebFormResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut settings = Self::default();

		if let Some(value) = lookup("WEBFORM_DEVELOPER_MODE") {
			settings.developer_mode = parse_flag(&value);
		}
		if let Some(value) = lookup("WEBFORM_MAX_FILE_SIZE") {
			settings.max_file_size = value.parse().map_err(|_| {
				WebFormError::Config(format!("Invalid WEBFORM_MAX_FILE_SIZE: {}", value))
			})?;
		}
		if let Some(value) = lookup("WEBFORM_SITE_URL") {
			settings.site_url = value;
		}
		if let Some(value) = lookup("WEBFORM_LIST_PAGE_LENGTH") {
			settings.list_page_length = value.parse().map_err(|_| {
				WebFormError::Config(format!("Invalid WEBFORM_LIST_PAGE_LENGTH: {}", value))
			})?;
		}

		Ok(settings)
	}

	/// Upload limit in whole mebibytes.
	pub fn max_file_size_mb(&self) -> u64 {
		self.max_file_size / 1024 / 1024
	}

	/// Absolute URL for a site-relative route.
	pub fn absolute_url(&self, route: &str) -> String {
		format!(
			"{}/{}",
			self.site_url.trim_end_matches('/'),
			route.trim_start_matches('/')
		)
	}
}

fn parse_flag(value: &str) -> bool {
	matches!(
		value.trim().to_ascii_lowercase().as_str(),
		"1" | "true" | "yes" | "on"
	)
}

/// Privileged contexts in which standard forms may be edited without
/// developer mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationFlags {
	pub in_install: bool,
	pub in_patch: bool,
	pub in_test: bool,
	pub in_fixtures: bool,
}

impl ValidationFlags {
	/// Flags for test runs.
	pub fn testing() -> Self {
		Self {
			in_test: true,
			..Default::default()
		}
	}

	pub fn any(&self) -> bool {
		self.in_install || self.in_patch || self.in_test || self.in_fixtures
	}
}

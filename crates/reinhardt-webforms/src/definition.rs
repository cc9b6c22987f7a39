//! The web form definition: configuration, validation and export.

use crate::error::{WebFormError, WebFormResult};
use crate::field::{WebFormField, reconcile_field};
use crate::layout::{LayoutPage, build_layout};
use crate::record::RecordType;
use crate::settings::{ValidationFlags, WebFormSettings};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stub written next to an exported standard form.
const SCRIPT_STUB: &str =
	"document.addEventListener(\"DOMContentLoaded\", () => {\n\t// bind events here\n});\n";

/// A configurable form bound to a record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebForm {
	pub name: String,
	pub title: String,
	pub route: String,
	/// Record type the form collects data for
	pub doc_type: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	/// Packaged definition, only editable in developer mode
	pub is_standard: bool,
	pub published: bool,
	pub login_required: bool,
	pub allow_edit: bool,
	pub allow_multiple: bool,
	pub allow_delete: bool,
	pub allow_comments: bool,
	pub accept_payment: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payment_gateway: Option<String>,
	pub amount: Decimal,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	/// JSON array of `{"route": .., "title": ..}` overriding the parents
	#[serde(skip_serializing_if = "Option::is_none")]
	pub breadcrumbs: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub success_message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub introduction_text: Option<String>,
	/// Upload limit in MiB shown to the client
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_attachment_size: Option<u64>,
	pub web_form_fields: Vec<WebFormField>,
}

impl WebForm {
	/// Create a published form with a route derived from its name.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_webforms::WebForm;
	///
	/// let form = WebForm::new("Event Signup", "Event");
	/// assert_eq!(form.route, "event-signup");
	/// assert_eq!(form.title, "Event Signup");
	/// assert!(form.published);
	/// ```
	pub fn new(name: impl Into<String>, doc_type: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			title: name.clone(),
			route: name.trim().to_lowercase().replace([' ', '_'], "-"),
			name,
			doc_type: doc_type.into(),
			published: true,
			..Default::default()
		}
	}

	pub fn with_field(mut self, field: WebFormField) -> Self {
		self.web_form_fields.push(field);
		self
	}

	pub fn with_fields(mut self, fields: impl IntoIterator<Item = WebFormField>) -> Self {
		self.web_form_fields.extend(fields);
		self
	}

	/// Parse a definition from JSON.
	pub fn from_json(source: &str) -> WebFormResult<Self> {
		Ok(serde_json::from_str(source)?)
	}

	pub fn to_json(&self) -> WebFormResult<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// File-system friendly form name.
	pub fn scrubbed_name(&self) -> String {
		scrub(&self.name)
	}

	/// Validate the definition before it is saved.
	///
	/// Fills in the module from the record type, refuses edits to standard
	/// forms outside developer mode and privileged contexts, then checks
	/// every value field against the schema.
	///
	/// # Errors
	///
	/// Returns [`WebFormError::MisconfiguredState`] when a standard form is
	/// edited outside developer mode, or [`WebFormError::MissingFields`]
	/// listing every field absent from `meta`.
	pub fn validate(
		&mut self,
		meta: &RecordType,
		settings: &WebFormSettings,
		flags: ValidationFlags,
	) -> WebFormResult<()> {
		if self.module.is_none() {
			self.module = meta.module.clone();
		}

		if self.is_standard && !settings.developer_mode && !flags.any() {
			return Err(WebFormError::MisconfiguredState(
				"You need to be in developer mode to edit a Standard Web Form".to_string(),
			));
		}

		self.validate_fields(meta)
	}

	/// Check that every value field exists on the record type.
	pub fn validate_fields(&self, meta: &RecordType) -> WebFormResult<()> {
		let missing: Vec<String> = self
			.web_form_fields
			.iter()
			.filter(|df| df.fieldtype.has_value())
			.filter_map(|df| df.fieldname.as_deref())
			.filter(|fieldname| !fieldname.is_empty() && !meta.has_field(fieldname))
			.map(str::to_string)
			.collect();

		if missing.is_empty() {
			Ok(())
		} else {
			Err(WebFormError::MissingFields(missing))
		}
	}

	/// Refresh schema-owned display properties from the live record type.
	pub fn use_meta_fields(&mut self, meta: &RecordType) {
		for df in &mut self.web_form_fields {
			let Some(fieldname) = df.fieldname.as_deref() else {
				continue;
			};
			if let Some(meta_df) = meta.get_field(fieldname) {
				*df = reconcile_field(df, meta_df);
			}
		}
	}

	/// Prepare a freshly loaded definition.
	///
	/// Standard forms follow the live schema unless developer mode is on,
	/// in which case the stored definition is shown as authored.
	pub fn onload(&mut self, meta: &RecordType, settings: &WebFormSettings) {
		if self.is_standard && !settings.developer_mode {
			self.use_meta_fields(meta);
		}
	}

	/// Page/section/column layout of the form fields.
	pub fn get_layout(&self) -> Vec<LayoutPage> {
		build_layout(&self.web_form_fields)
	}

	/// Write a standard form into `<dir>/<scrubbed name>/`.
	///
	/// Always rewrites the JSON definition; writes a script stub only when no
	/// script exists yet. Returns the definition path, or `None` for forms
	/// that are not standard.
	pub async fn export_to(&self, dir: &Path) -> WebFormResult<Option<PathBuf>> {
		if !self.is_standard {
			return Ok(None);
		}

		let scrubbed = self.scrubbed_name();
		let form_dir = dir.join(&scrubbed);
		fs::create_dir_all(&form_dir).await?;

		let json_path = form_dir.join(format!("{}.json", scrubbed));
		fs::write(&json_path, self.to_json()?).await?;

		let script_path = form_dir.join(format!("{}.js", scrubbed));
		if !fs::try_exists(&script_path).await? {
			fs::write(&script_path, SCRIPT_STUB).await?;
		}

		Ok(Some(json_path))
	}
}

/// Lowercase a name and replace spaces and dashes with underscores.
pub fn scrub(name: &str) -> String {
	name.trim().to_lowercase().replace([' ', '-'], "_")
}

//! Registered web form definitions and their extensions.

use crate::definition::WebForm;
use crate::error::{WebFormError, WebFormResult};
use crate::extension::{ExtensionRegistry, WebFormExtension};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// Web forms by name, together with the extensions of standard forms.
#[derive(Debug, Clone, Default)]
pub struct WebFormRegistry {
	forms: HashMap<String, WebForm>,
	extensions: ExtensionRegistry,
}

impl WebFormRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, form: WebForm) {
		self.forms.insert(form.name.clone(), form);
	}

	pub fn register_extension(&mut self, form_name: impl Into<String>, extension: WebFormExtension) {
		self.extensions.register(form_name, extension);
	}

	/// # Errors
	///
	/// Returns [`WebFormError::NotFound`] for unknown form names.
	pub fn get(&self, name: &str) -> WebFormResult<&WebForm> {
		self.forms
			.get(name)
			.ok_or_else(|| WebFormError::not_found("Web Form", name))
	}

	/// Extension of a form; only standard forms carry one.
	pub fn extension_for(&self, form: &WebForm) -> Option<&WebFormExtension> {
		if form.is_standard {
			self.extensions.get(&form.name)
		} else {
			None
		}
	}

	pub fn len(&self) -> usize {
		self.forms.len()
	}

	pub fn is_empty(&self) -> bool {
		self.forms.is_empty()
	}

	/// Load exported definitions from `dir`.
	///
	/// Every `<dir>/<scrubbed>/<scrubbed>.json` is registered as a form.
	/// Sibling `<scrubbed>.js` and `<scrubbed>.css` files are read once and
	/// attached to the form's extension. Returns the number of forms loaded.
	pub async fn load_dir(&mut self, dir: &Path) -> WebFormResult<usize> {
		let mut loaded = 0;
		let mut entries = fs::read_dir(dir).await?;

		while let Some(entry) = entries.next_entry().await? {
			if !entry.file_type().await?.is_dir() {
				continue;
			}
			let form_dir = entry.path();
			let scrubbed = entry.file_name().to_string_lossy().into_owned();
			let json_path = form_dir.join(format!("{}.json", scrubbed));
			if !fs::try_exists(&json_path).await? {
				continue;
			}

			let form = WebForm::from_json(&fs::read_to_string(&json_path).await?)?;
			let script = read_optional(&form_dir.join(format!("{}.js", scrubbed))).await?;
			let style = read_optional(&form_dir.join(format!("{}.css", scrubbed))).await?;

			tracing::debug!(form = %form.name, path = %json_path.display(), "loaded web form definition");
			if script.is_some() || style.is_some() {
				self.extensions.entry(&form.name).merge_assets(script, style);
			}
			self.register(form);
			loaded += 1;
		}

		Ok(loaded)
	}
}

async fn read_optional(path: &Path) -> WebFormResult<Option<String>> {
	if fs::try_exists(path).await? {
		Ok(Some(fs::read_to_string(path).await?))
	} else {
		Ok(None)
	}
}

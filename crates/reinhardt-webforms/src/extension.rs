//! Per-form extensions for standard web forms.
//!
//! A standard form may ship with extra context, a script and a stylesheet.
//! They are registered against the form name once, when configuration is
//! loaded, and looked up by name for every request.

use crate::context::{ListContext, WebFormContext};
use crate::error::WebFormResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Hook that adjusts the render context of one form.
pub trait ContextHook: Send + Sync {
	/// Update the context of a single-record or new-record page.
	fn update_context(&self, context: &mut WebFormContext) -> WebFormResult<()>;

	/// Update the context of a list page.
	fn update_list_context(&self, _list: &mut ListContext) -> WebFormResult<()> {
		Ok(())
	}
}

/// Capability bundle registered for one form.
#[derive(Clone, Default)]
pub struct WebFormExtension {
	pub context_hook: Option<Arc<dyn ContextHook>>,
	pub script: Option<String>,
	pub style: Option<String>,
}

impl fmt::Debug for WebFormExtension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebFormExtension")
			.field("context_hook", &self.context_hook.is_some())
			.field("script", &self.script.is_some())
			.field("style", &self.style.is_some())
			.finish()
	}
}

impl WebFormExtension {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_context_hook(mut self, hook: Arc<dyn ContextHook>) -> Self {
		self.context_hook = Some(hook);
		self
	}

	pub fn with_script(mut self, script: impl Into<String>) -> Self {
		self.script = Some(script.into());
		self
	}

	pub fn with_style(mut self, style: impl Into<String>) -> Self {
		self.style = Some(style.into());
		self
	}

	/// Fill in whichever of script and style this bundle lacks.
	pub(crate) fn merge_assets(&mut self, script: Option<String>, style: Option<String>) {
		if self.script.is_none() {
			self.script = script;
		}
		if self.style.is_none() {
			self.style = style;
		}
	}
}

/// Extensions by form name.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
	extensions: HashMap<String, WebFormExtension>,
}

impl ExtensionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, form_name: impl Into<String>, extension: WebFormExtension) {
		self.extensions.insert(form_name.into(), extension);
	}

	pub fn get(&self, form_name: &str) -> Option<&WebFormExtension> {
		self.extensions.get(form_name)
	}

	pub(crate) fn entry(&mut self, form_name: &str) -> &mut WebFormExtension {
		self.extensions.entry(form_name.to_string()).or_default()
	}
}

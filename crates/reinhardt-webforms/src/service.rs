//! The web form service: registered forms wired to their collaborators.

use crate::backends::memory::StaticWebsitePermission;
use crate::context::{ContextBuilder, WebFormContext};
use crate::definition::WebForm;
use crate::deletion;
use crate::error::{WebFormError, WebFormResult};
use crate::list::{ListRequest, get_web_form_list};
use crate::payment::PaymentGatewayRegistry;
use crate::permission::{PermissionGate, WebFormPermissionHook};
use crate::record::Record;
use crate::registry::WebFormRegistry;
use crate::request::WebFormRequest;
use crate::settings::WebFormSettings;
use crate::store::{CommentSource, FileStore, ListView, RecordStore, WebsitePermission};
use crate::submission;
use crate::user::CurrentUser;
use std::collections::HashMap;
use std::sync::Arc;

/// External collaborators used by web forms.
#[derive(Clone)]
pub struct WebFormServices {
	pub records: Arc<dyn RecordStore>,
	pub list_view: Arc<dyn ListView>,
	pub comments: Arc<dyn CommentSource>,
	pub website: Arc<dyn WebsitePermission>,
	pub files: Arc<dyn FileStore>,
	pub payments: PaymentGatewayRegistry,
	pub permission_hooks: HashMap<String, Arc<dyn WebFormPermissionHook>>,
}

impl WebFormServices {
	pub fn builder() -> WebFormServicesBuilder {
		WebFormServicesBuilder::default()
	}

	/// Standard permission chain over these collaborators.
	pub fn permission_gate(&self) -> PermissionGate {
		PermissionGate::standard(
			Arc::clone(&self.records),
			Arc::clone(&self.website),
			self.permission_hooks.clone(),
		)
	}
}

/// Builder for [`WebFormServices`].
#[derive(Default)]
pub struct WebFormServicesBuilder {
	records: Option<Arc<dyn RecordStore>>,
	list_view: Option<Arc<dyn ListView>>,
	comments: Option<Arc<dyn CommentSource>>,
	website: Option<Arc<dyn WebsitePermission>>,
	files: Option<Arc<dyn FileStore>>,
	payments: PaymentGatewayRegistry,
	permission_hooks: HashMap<String, Arc<dyn WebFormPermissionHook>>,
}

impl WebFormServicesBuilder {
	pub fn records(mut self, records: Arc<dyn RecordStore>) -> Self {
		self.records = Some(records);
		self
	}

	pub fn list_view(mut self, list_view: Arc<dyn ListView>) -> Self {
		self.list_view = Some(list_view);
		self
	}

	pub fn comments(mut self, comments: Arc<dyn CommentSource>) -> Self {
		self.comments = Some(comments);
		self
	}

	pub fn website_permission(mut self, website: Arc<dyn WebsitePermission>) -> Self {
		self.website = Some(website);
		self
	}

	pub fn files(mut self, files: Arc<dyn FileStore>) -> Self {
		self.files = Some(files);
		self
	}

	pub fn payments(mut self, payments: PaymentGatewayRegistry) -> Self {
		self.payments = payments;
		self
	}

	/// Register the custom permission hook of one record type.
	pub fn permission_hook(
		mut self,
		doctype: impl Into<String>,
		hook: Arc<dyn WebFormPermissionHook>,
	) -> Self {
		self.permission_hooks.insert(doctype.into(), hook);
		self
	}

	/// # Errors
	///
	/// Returns [`WebFormError::Config`] naming the first collaborator that
	/// was not provided. Website permission may be omitted and then never
	/// grants access.
	pub fn build(self) -> WebFormResult<WebFormServices> {
		Ok(WebFormServices {
			records: self.records.ok_or_else(|| missing("records"))?,
			list_view: self.list_view.ok_or_else(|| missing("list_view"))?,
			comments: self.comments.ok_or_else(|| missing("comments"))?,
			website: self.website.unwrap_or_else(|| {
				Arc::new(StaticWebsitePermission::deny_all()) as Arc<dyn WebsitePermission>
			}),
			files: self.files.ok_or_else(|| missing("files"))?,
			payments: self.payments,
			permission_hooks: self.permission_hooks,
		})
	}
}

fn missing(name: &str) -> WebFormError {
	WebFormError::Config(format!("Web form service '{}' is not configured", name))
}

/// Entry point for rendering, submitting, deleting and listing through
/// registered web forms.
#[derive(Clone)]
pub struct WebFormService {
	registry: Arc<WebFormRegistry>,
	services: WebFormServices,
	settings: WebFormSettings,
	gate: PermissionGate,
}

impl WebFormService {
	pub fn new(registry: WebFormRegistry, services: WebFormServices, settings: WebFormSettings) -> Self {
		let gate = services.permission_gate();
		Self {
			registry: Arc::new(registry),
			services,
			settings,
			gate,
		}
	}

	/// Replace the permission chain.
	pub fn with_permission_gate(mut self, gate: PermissionGate) -> Self {
		self.gate = gate;
		self
	}

	pub fn registry(&self) -> &WebFormRegistry {
		&self.registry
	}

	pub fn settings(&self) -> &WebFormSettings {
		&self.settings
	}

	pub fn permission_gate(&self) -> &PermissionGate {
		&self.gate
	}

	pub fn form(&self, form_name: &str) -> WebFormResult<&WebForm> {
		self.registry.get(form_name)
	}

	/// Build the render context for one page view of `form_name`.
	pub async fn get_context(
		&self,
		form_name: &str,
		request: &WebFormRequest,
	) -> WebFormResult<WebFormContext> {
		let form = self.registry.get(form_name)?;
		ContextBuilder::new(
			form.clone(),
			self.registry.extension_for(form),
			&self.services,
			&self.gate,
			&self.settings,
		)
		.build(request)
		.await
	}

	/// Apply a JSON submission to `form_name`, returning the record name.
	pub async fn accept(&self, form_name: &str, data: &str, user: &CurrentUser) -> WebFormResult<String> {
		let form = self.registry.get(form_name)?;
		submission::accept(form, data, user, &self.services, &self.gate).await
	}

	/// Delete a record through `form_name`.
	pub async fn delete(&self, form_name: &str, name: &str, user: &CurrentUser) -> WebFormResult<()> {
		let form = self.registry.get(form_name)?;
		deletion::delete(form, name, user, self.services.records.as_ref()).await
	}

	/// One page of the caller's own records of the form's record type.
	pub async fn list(
		&self,
		form_name: &str,
		user: &CurrentUser,
		request: ListRequest,
	) -> WebFormResult<Vec<Record>> {
		let form = self.registry.get(form_name)?;
		get_web_form_list(
			self.services.list_view.as_ref(),
			&self.settings,
			&form.doc_type,
			user,
			request,
		)
		.await
	}
}

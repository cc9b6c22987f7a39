//! Render context for a single web form page view.
//!
//! [`ContextBuilder`] resolves which record (if any) the request targets,
//! checks access through the [`PermissionGate`], and collects everything
//! the template needs: layout, record, comments, breadcrumbs, extension
//! assets and an optional payment link. Every failing step aborts the
//! request.

use crate::definition::WebForm;
use crate::error::{WebFormError, WebFormResult};
use crate::extension::WebFormExtension;
use crate::layout::LayoutPage;
use crate::list::{ListRequest, get_web_form_list};
use crate::payment::PaymentDetails;
use crate::permission::{PermissionGate, PermissionType};
use crate::record::Record;
use crate::request::WebFormRequest;
use crate::route::make_route_string;
use crate::service::WebFormServices;
use crate::settings::WebFormSettings;
use crate::store::Comment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One breadcrumb link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
	pub route: String,
	pub title: String,
}

impl Breadcrumb {
	pub fn new(route: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			route: route.into(),
			title: title.into(),
		}
	}

	/// Parse a configured breadcrumbs JSON array.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_webforms::context::Breadcrumb;
	///
	/// let parents = Breadcrumb::parse_list(r#"[{"route": "events", "title": "Events"}]"#).unwrap();
	/// assert_eq!(parents, vec![Breadcrumb::new("events", "Events")]);
	/// ```
	pub fn parse_list(source: &str) -> WebFormResult<Vec<Self>> {
		serde_json::from_str(source).map_err(|e| {
			WebFormError::Validation(format!("Invalid breadcrumbs: {}", e))
		})
	}
}

/// Context of a list page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListContext {
	pub web_form_name: String,
	pub doctype: String,
	pub records: Vec<Record>,
	pub limit_start: usize,
	pub page_length: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub txt: Option<String>,
}

/// Everything a template needs to render one web form page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebFormContext {
	/// The form, with fields reconciled against the live schema
	pub form: WebForm,
	/// Request parameters echoed as a query string
	pub route: String,
	/// Separator for appending one more parameter to `route`
	pub delimiter: &'static str,
	pub doc: Option<Record>,
	pub layout: Option<Vec<LayoutPage>>,
	pub parents: Vec<Breadcrumb>,
	pub title: String,
	pub reference_doctype: Option<String>,
	pub reference_name: Option<String>,
	pub comment_list: Vec<Comment>,
	pub is_list: bool,
	pub list: Option<ListContext>,
	pub has_header: bool,
	pub success_message: Option<String>,
	pub script: Option<String>,
	pub style: Option<String>,
	pub payment_url: Option<String>,
	/// Upload limit in MiB
	pub max_attachment_size: Option<u64>,
	/// Values added by extension hooks
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl WebFormContext {
	fn new(form: WebForm, route: String, delimiter: &'static str) -> Self {
		Self {
			title: form.title.clone(),
			success_message: form.success_message.clone(),
			max_attachment_size: form.max_attachment_size,
			form,
			route,
			delimiter,
			doc: None,
			layout: None,
			parents: Vec::new(),
			reference_doctype: None,
			reference_name: None,
			comment_list: Vec::new(),
			is_list: false,
			list: None,
			has_header: false,
			script: None,
			style: None,
			payment_url: None,
			extra: Map::new(),
		}
	}

	/// Add a template value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.extra.insert(key.into(), value.into());
	}
}

/// Record targeted by the request after mode resolution.
#[derive(Debug, Default)]
struct Target {
	name: Option<String>,
	new: bool,
	list: bool,
}

/// Builds the [`WebFormContext`] of one page view.
pub struct ContextBuilder<'a> {
	form: WebForm,
	extension: Option<&'a WebFormExtension>,
	services: &'a WebFormServices,
	gate: &'a PermissionGate,
	settings: &'a WebFormSettings,
}

impl<'a> ContextBuilder<'a> {
	pub fn new(
		form: WebForm,
		extension: Option<&'a WebFormExtension>,
		services: &'a WebFormServices,
		gate: &'a PermissionGate,
		settings: &'a WebFormSettings,
	) -> Self {
		Self {
			form,
			extension,
			services,
			gate,
			settings,
		}
	}

	/// Build the context for `request`.
	///
	/// # Errors
	///
	/// Returns [`WebFormError::AuthenticationRequired`] when a guest asks for
	/// a specific record, [`WebFormError::PermissionDenied`] when read access
	/// to it is refused, and propagates collaborator failures.
	pub async fn build(mut self, request: &WebFormRequest) -> WebFormResult<WebFormContext> {
		let user = &request.user;
		let route = make_route_string(&request.params);

		if let Some(name) = request.name() {
			if user.is_guest() {
				return Err(WebFormError::AuthenticationRequired(format!(
					"You need to be logged in to access this {}.",
					self.form.doc_type
				)));
			}
			if !self
				.gate
				.has_permission(user, &self.form.doc_type, name, PermissionType::Read)
				.await?
			{
				return Err(WebFormError::PermissionDenied(
					"You don't have the permissions to access this document".to_string(),
				));
			}
		}

		let meta = self.services.records.meta(&self.form.doc_type).await?;
		if self.form.is_standard {
			self.form.use_meta_fields(&meta);
		}

		let target = self.resolve_target(request).await?;
		let form = self.form.clone();
		let mut context = WebFormContext::new(form, route.query, route.delimiter);

		if target.list {
			self.build_as_list(&mut context, request).await?;
		}

		if target.name.is_some() || target.new {
			context.layout = Some(self.form.get_layout());
			context.parents = vec![Breadcrumb::new(&self.form.route, &self.form.title)];
		}

		if let Some(name) = &target.name {
			let doc = self.services.records.get(&self.form.doc_type, name).await?;
			if let Some(title) = meta.title_field().and_then(|field| doc.get_str(field)) {
				context.title = title.to_string();
			}
			self.services
				.records
				.add_seen(&doc.doctype, name, user.id())
				.await?;

			context.reference_doctype = Some(doc.doctype.clone());
			context.reference_name = Some(name.clone());
			if self.form.allow_comments {
				context.comment_list = self.services.comments.comments(&doc.doctype, name).await?;
			}
			context.doc = Some(doc);
		}

		if context.is_list && context.parents.is_empty() {
			context.parents = vec![Breadcrumb::new("me", "My Account")];
		}
		if let Some(breadcrumbs) = self.form.breadcrumbs.as_deref().filter(|b| !b.trim().is_empty()) {
			context.parents = Breadcrumb::parse_list(breadcrumbs)?;
		}

		context.has_header = (target.name.is_some() || target.new)
			&& (user.is_authenticated() || !self.form.login_required);

		if let Some(message) = context.success_message.as_mut() {
			*message = message.replace('\n', "<br>").replace('\'', "\\'");
		}

		self.add_extension(&mut context)?;
		self.add_payment_url(&mut context, request)?;

		if context.max_attachment_size.is_none() {
			context.max_attachment_size = Some(self.settings.max_file_size_mb());
		}

		Ok(context)
	}

	/// Decide between list mode, an existing record and a blank form.
	async fn resolve_target(&self, request: &WebFormRequest) -> WebFormResult<Target> {
		let user = &request.user;
		let mut target = Target {
			name: request.name().map(str::to_string),
			new: request.is_new(),
			list: false,
		};

		if self.form.login_required && user.is_authenticated() && self.form.allow_edit {
			if self.form.allow_multiple {
				if target.name.is_none() && !target.new {
					tracing::debug!(form = %self.form.name, "rendering web form as list");
					target.list = true;
				}
			} else {
				match self
					.services
					.records
					.find_by_owner(&self.form.doc_type, user.id())
					.await?
				{
					Some(name) => target.name = Some(name),
					None => target.new = true,
				}
			}
		}

		if !self.form.login_required || !self.form.allow_edit {
			target.new = true;
		}

		Ok(target)
	}

	async fn build_as_list(
		&self,
		context: &mut WebFormContext,
		request: &WebFormRequest,
	) -> WebFormResult<()> {
		let list_request = ListRequest {
			txt: request.txt().map(str::to_string),
			limit_start: request.limit_start(),
			..ListRequest::default()
		};
		let records = get_web_form_list(
			self.services.list_view.as_ref(),
			self.settings,
			&self.form.doc_type,
			&request.user,
			list_request.clone(),
		)
		.await?;

		let mut list = ListContext {
			web_form_name: self.form.name.clone(),
			doctype: self.form.doc_type.clone(),
			records,
			limit_start: list_request.limit_start,
			page_length: self.settings.list_page_length,
			txt: list_request.txt,
		};
		if let Some(hook) = self.extension.and_then(|ext| ext.context_hook.as_ref()) {
			hook.update_list_context(&mut list)?;
		}

		context.list = Some(list);
		context.is_list = true;
		Ok(())
	}

	fn add_extension(&self, context: &mut WebFormContext) -> WebFormResult<()> {
		let Some(extension) = self.extension else {
			return Ok(());
		};

		if let Some(hook) = &extension.context_hook {
			hook.update_context(context)?;
		}
		if extension.script.is_some() {
			context.script = extension.script.clone();
		}
		if extension.style.is_some() {
			context.style = extension.style.clone();
		}
		Ok(())
	}

	fn add_payment_url(
		&self,
		context: &mut WebFormContext,
		request: &WebFormRequest,
	) -> WebFormResult<()> {
		if !self.form.accept_payment {
			return Ok(());
		}
		let Some(doc) = &context.doc else {
			return Ok(());
		};
		let Some(name) = doc.name.clone() else {
			return Ok(());
		};

		let gateway_name = self.form.payment_gateway.as_deref().ok_or_else(|| {
			WebFormError::Payment(format!(
				"Web Form {} accepts payments but has no payment gateway",
				self.form.name
			))
		})?;
		let gateway = self.services.payments.resolve(gateway_name)?;

		let title = format!("Payment for {} {}", doc.doctype, name);
		let details = PaymentDetails {
			amount: self.form.amount,
			description: title.clone(),
			title,
			reference_doctype: doc.doctype.clone(),
			reference_docname: name.clone(),
			payer_email: request.user.id().to_string(),
			payer_name: request.user.full_name().to_string(),
			order_id: name,
			currency: self.form.currency.clone().unwrap_or_default(),
			redirect_to: self.settings.absolute_url(&self.form.route),
		};

		context.payment_url = Some(gateway.payment_url(&details)?);
		Ok(())
	}
}

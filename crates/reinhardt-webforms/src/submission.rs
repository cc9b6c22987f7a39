//! Applying client submissions to records.

use crate::definition::WebForm;
use crate::error::{WebFormError, WebFormResult};
use crate::permission::{PermissionGate, PermissionType};
use crate::record::Record;
use crate::service::WebFormServices;
use crate::store::SaveOptions;
use crate::user::CurrentUser;
use serde_json::{Map, Value};

const FILE_ATTACHMENT_KEY: &str = "__file_attachment";
const NO_ATTACHMENT_KEY: &str = "__no_attachment";

/// Attachment change requested for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentDirective {
	/// Store a new file and point the field at it
	Attach { filename: String, dataurl: String },
	/// Remove the file the field currently points at
	Detach,
}

impl AttachmentDirective {
	/// Interpret a submitted value as an attachment directive.
	///
	/// Returns `Ok(None)` for plain values.
	///
	/// # Errors
	///
	/// Returns [`WebFormError::InvalidRequest`] for a new attachment without
	/// a filename or data URL.
	pub fn from_value(value: &Value) -> WebFormResult<Option<Self>> {
		let Some(object) = value.as_object().filter(|o| !o.is_empty()) else {
			return Ok(None);
		};

		if object.contains_key(FILE_ATTACHMENT_KEY) {
			let filename = string_member(object, "filename")?;
			let dataurl = string_member(object, "dataurl")?;
			return Ok(Some(Self::Attach { filename, dataurl }));
		}
		if object.contains_key(NO_ATTACHMENT_KEY) {
			return Ok(Some(Self::Detach));
		}
		Ok(None)
	}
}

fn string_member(object: &Map<String, Value>, key: &str) -> WebFormResult<String> {
	object
		.get(key)
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| WebFormError::InvalidRequest(format!("attachment is missing '{}'", key)))
}

/// A parsed client submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPayload {
	pub doctype: String,
	/// Existing record to update; `None` inserts a new record
	pub name: Option<String>,
	/// Submitted field values, excluding `doctype` and `name`
	pub values: Map<String, Value>,
}

impl SubmissionPayload {
	/// Parse a JSON object submission.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_webforms::submission::SubmissionPayload;
	///
	/// let payload = SubmissionPayload::parse(r#"{"doctype": "Event", "title": "Launch"}"#).unwrap();
	/// assert_eq!(payload.doctype, "Event");
	/// assert_eq!(payload.name, None);
	/// assert_eq!(payload.values["title"], "Launch");
	/// ```
	///
	/// # Errors
	///
	/// Returns [`WebFormError::Serialization`] for malformed JSON and
	/// [`WebFormError::InvalidRequest`] when the submission is not an object
	/// or carries a `name` that is neither a string nor null.
	pub fn parse(data: &str) -> WebFormResult<Self> {
		let Value::Object(mut values) = serde_json::from_str(data)? else {
			return Err(WebFormError::InvalidRequest(
				"submission must be a JSON object".to_string(),
			));
		};

		let doctype = match values.remove("doctype") {
			Some(Value::String(doctype)) => doctype,
			_ => String::new(),
		};
		let name = match values.remove("name") {
			None | Some(Value::Null) => None,
			Some(Value::String(name)) => Some(name).filter(|name| !name.is_empty()),
			Some(other) => {
				return Err(WebFormError::InvalidRequest(format!(
					"record name must be a string, got {}",
					other
				)));
			}
		};

		Ok(Self {
			doctype,
			name,
			values,
		})
	}
}

/// Apply a JSON submission through `form`, returning the record name.
///
/// Plain values are set directly on the record; attachment directives are
/// deferred until the record has been saved and has a name. Updates are
/// saved with permission checks skipped only when the permission gate
/// grants write access; otherwise the record store enforces its own.
///
/// # Errors
///
/// - [`WebFormError::InvalidRequest`] when the payload's record type is not
///   the form's record type
/// - [`WebFormError::PermissionDenied`] when an update is sent to a form
///   that does not allow editing
/// - [`WebFormError::AuthenticationRequired`] when a guest submits a new
///   record to a form that requires login
///
/// Attachment failures after the primary save leave the record saved.
pub async fn accept(
	form: &WebForm,
	data: &str,
	user: &CurrentUser,
	services: &WebFormServices,
	gate: &PermissionGate,
) -> WebFormResult<String> {
	let payload = SubmissionPayload::parse(data)?;

	if payload.doctype != form.doc_type {
		return Err(WebFormError::InvalidRequest(format!(
			"{} does not accept {} records",
			form.name, payload.doctype
		)));
	}
	if payload.name.is_some() && !form.allow_edit {
		return Err(WebFormError::PermissionDenied(
			"You are not allowed to update this Web Form Document".to_string(),
		));
	}

	let records = services.records.as_ref();
	let mut doc = match &payload.name {
		Some(name) => records.get(&payload.doctype, name).await?,
		None => records.new_record(&payload.doctype).await?,
	};

	let mut attachments = Vec::new();
	let mut detached = Vec::new();
	for (fieldname, value) in payload.values {
		match AttachmentDirective::from_value(&value)? {
			Some(AttachmentDirective::Attach { filename, dataurl }) => {
				attachments.push((fieldname, filename, dataurl));
			}
			Some(AttachmentDirective::Detach) => {
				if let Some(file_url) = doc.get_str(&fieldname) {
					detached.push(file_url.to_string());
				}
				doc.set(fieldname, "");
			}
			None => doc.set(fieldname, value),
		}
	}

	let options = match doc.name.clone() {
		Some(name) => {
			let options = if gate
				.has_permission(user, &doc.doctype, &name, PermissionType::Write)
				.await?
			{
				SaveOptions::elevated(user)
			} else {
				SaveOptions::new(user)
			};
			records.save(&doc, &options).await?;
			options
		}
		None => {
			if form.login_required && user.is_guest() {
				return Err(WebFormError::AuthenticationRequired(
					"You must login to submit this form".to_string(),
				));
			}
			let options = SaveOptions::elevated(user);
			doc = records.insert(doc, &options).await?;
			options
		}
	};

	let name = doc
		.name
		.clone()
		.ok_or_else(|| WebFormError::Store(format!("{} was saved without a name", doc.doctype)))?;

	if let Err(e) = apply_attachments(&mut doc, &name, attachments, detached, services, &options).await
	{
		tracing::warn!(
			doctype = %doc.doctype,
			name = %name,
			error = %e,
			"attachment processing failed after the record was saved"
		);
		return Err(e);
	}

	tracing::info!(
		form = %form.name,
		doctype = %doc.doctype,
		name = %name,
		user = user.id(),
		"web form submission accepted"
	);
	Ok(name)
}

async fn apply_attachments(
	doc: &mut Record,
	name: &str,
	attachments: Vec<(String, String, String)>,
	detached: Vec<String>,
	services: &WebFormServices,
	options: &SaveOptions,
) -> WebFormResult<()> {
	let files = services.files.as_ref();

	if !attachments.is_empty() {
		for (fieldname, filename, dataurl) in attachments {
			if let Some(previous) = doc.get_str(&fieldname) {
				files.remove_file_by_url(previous, &doc.doctype, name).await?;
			}

			let file = files.save_file(&filename, &dataurl, &doc.doctype, name).await?;
			doc.set(fieldname, file.file_url);
		}
		services.records.save(doc, options).await?;
	}

	for file_url in detached {
		files.remove_file_by_url(&file_url, &doc.doctype, name).await?;
	}

	Ok(())
}

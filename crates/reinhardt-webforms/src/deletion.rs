//! Deleting records through a web form.

use crate::definition::WebForm;
use crate::error::{WebFormError, WebFormResult};
use crate::store::{RecordStore, SaveOptions};
use crate::user::CurrentUser;

/// Delete record `name` of the form's record type.
///
/// Only the record owner may delete, and only through a form that allows
/// deletion. Once both hold, the store's own permission checks are skipped.
///
/// # Errors
///
/// Returns [`WebFormError::AuthenticationRequired`] for guests and
/// [`WebFormError::PermissionDenied`] when the caller is not the owner or the
/// form does not allow deletion.
pub async fn delete(
	form: &WebForm,
	name: &str,
	user: &CurrentUser,
	records: &dyn RecordStore,
) -> WebFormResult<()> {
	if user.is_guest() {
		return Err(WebFormError::AuthenticationRequired(
			"You need to be logged in to delete records".to_string(),
		));
	}

	let owner = records.owner_of(&form.doc_type, name).await?;
	if !form.allow_delete || owner.as_deref() != Some(user.id()) {
		tracing::debug!(
			form = %form.name,
			doctype = %form.doc_type,
			name,
			user = user.id(),
			"web form deletion refused"
		);
		return Err(WebFormError::PermissionDenied("Not Allowed".to_string()));
	}

	records
		.delete(&form.doc_type, name, &SaveOptions::elevated(user))
		.await?;

	tracing::info!(form = %form.name, doctype = %form.doc_type, name, "web form record deleted");
	Ok(())
}

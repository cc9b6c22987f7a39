//! Request and response types for the accept and delete endpoints.
//!
//! `accept` is reachable by guests and gated internally; `delete` needs a
//! session. Both map [`WebFormError`] onto an HTTP status so a router can
//! return the response unchanged.

use crate::error::WebFormError;
use crate::service::WebFormService;
use crate::user::CurrentUser;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Request body for the accept endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptRequest {
	/// Name of the web form
	pub web_form: String,
	/// JSON-encoded submission
	pub data: String,
}

/// Request body for the delete endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
	/// Name of the web form
	pub web_form: String,
	/// Record to delete
	pub name: String,
}

/// Endpoint response
#[derive(Debug, Clone, Serialize)]
pub struct EndpointResponse<T> {
	/// HTTP status code
	#[serde(skip)]
	pub status: StatusCode,
	/// Result on success
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<T>,
	/// Error message on failure
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl<T> EndpointResponse<T> {
	pub fn ok(message: T) -> Self {
		Self {
			status: StatusCode::OK,
			message: Some(message),
			error: None,
		}
	}

	pub fn from_error(error: &WebFormError) -> Self {
		Self {
			status: error.status_code(),
			message: None,
			error: Some(error.to_string()),
		}
	}

	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}
}

/// Handle a form submission; the response carries the record name.
pub async fn handle_accept(
	service: &WebFormService,
	request: AcceptRequest,
	user: &CurrentUser,
) -> EndpointResponse<String> {
	match service.accept(&request.web_form, &request.data, user).await {
		Ok(name) => EndpointResponse::ok(name),
		Err(e) => {
			tracing::warn!(web_form = %request.web_form, error = %e, "web form submission failed");
			EndpointResponse::from_error(&e)
		}
	}
}

/// Handle a delete request.
pub async fn handle_delete(
	service: &WebFormService,
	request: DeleteRequest,
	user: &CurrentUser,
) -> EndpointResponse<()> {
	if user.is_guest() {
		return EndpointResponse::from_error(&WebFormError::AuthenticationRequired(
			"Login required".to_string(),
		));
	}

	match service.delete(&request.web_form, &request.name, user).await {
		Ok(()) => EndpointResponse::ok(()),
		Err(e) => {
			tracing::warn!(
				web_form = %request.web_form,
				name = %request.name,
				error = %e,
				"web form deletion failed"
			);
			EndpointResponse::from_error(&e)
		}
	}
}

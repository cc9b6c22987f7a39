//! Error types for web form operations.
//!
//! Every error is terminal for the request that raised it. None of them are
//! retried inside this crate; callers surface the message to the user.

use http::StatusCode;
use thiserror::Error;

/// Result type for web form operations.
pub type WebFormResult<T> = Result<T, WebFormError>;

/// Web form errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WebFormError {
	/// Generic validation failure
	#[error("Validation error: {0}")]
	Validation(String),

	/// Form fields that do not exist on the bound record type.
	///
	/// Carries every offending fieldname so an author can fix them all at once.
	#[error("Following fields are missing: {}", .0.join(", "))]
	MissingFields(Vec<String>),

	/// Attempted change that the current configuration forbids
	#[error("{0}")]
	MisconfiguredState(String),

	/// The action needs a logged-in identity
	#[error("{0}")]
	AuthenticationRequired(String),

	/// Ownership or capability checks failed
	#[error("{0}")]
	PermissionDenied(String),

	/// Payload does not match the form it was sent to
	#[error("Invalid Request: {0}")]
	InvalidRequest(String),

	/// A named object could not be found
	#[error("{kind} {name} not found")]
	NotFound {
		/// Object kind, e.g. "Web Form" or a record type.
		kind: String,
		/// Object name.
		name: String,
	},

	/// Record store failure
	#[error("Record store error: {0}")]
	Store(String),

	/// File store failure
	#[error("File store error: {0}")]
	FileStore(String),

	/// Payment gateway failure
	#[error("Payment gateway error: {0}")]
	Payment(String),

	/// Configuration could not be loaded
	#[error("Configuration error: {0}")]
	Config(String),

	/// Payload or definition (de)serialization error
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Filesystem error while loading or exporting definitions
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl WebFormError {
	/// Shorthand for a [`WebFormError::NotFound`].
	pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
		Self::NotFound {
			kind: kind.into(),
			name: name.into(),
		}
	}

	/// HTTP status the endpoint layer answers with for this error.
	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::Validation(_)
			| Self::MissingFields(_)
			| Self::MisconfiguredState(_)
			| Self::InvalidRequest(_)
			| Self::Serialization(_) => StatusCode::BAD_REQUEST,
			Self::AuthenticationRequired(_) => StatusCode::UNAUTHORIZED,
			Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
			Self::NotFound { .. } => StatusCode::NOT_FOUND,
			Self::Store(_)
			| Self::FileStore(_)
			| Self::Payment(_)
			| Self::Config(_)
			| Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Whether the error belongs to the permission family.
	pub fn is_permission_error(&self) -> bool {
		matches!(
			self,
			Self::PermissionDenied(_) | Self::AuthenticationRequired(_)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn test_missing_fields_lists_every_name() {
		let err = WebFormError::MissingFields(vec!["venue".to_string(), "starts_on".to_string()]);
		assert_eq!(
			err.to_string(),
			"Following fields are missing: venue, starts_on"
		);
	}

	#[rstest]
	#[case(WebFormError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST)]
	#[case(WebFormError::AuthenticationRequired("x".into()), StatusCode::UNAUTHORIZED)]
	#[case(WebFormError::PermissionDenied("x".into()), StatusCode::FORBIDDEN)]
	#[case(WebFormError::not_found("Web Form", "signup"), StatusCode::NOT_FOUND)]
	#[case(WebFormError::Store("down".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	fn test_status_code_mapping(#[case] err: WebFormError, #[case] expected: StatusCode) {
		assert_eq!(err.status_code(), expected);
	}
}

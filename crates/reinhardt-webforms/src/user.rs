//! The identity a web form request runs as.

use serde::{Deserialize, Serialize};

/// Identifier stored as owner for records created by anonymous visitors.
pub const GUEST: &str = "Guest";

/// Identity of the caller, threaded explicitly through every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrentUser {
	/// Anonymous visitor
	#[default]
	Guest,
	/// Logged-in user
	Authenticated {
		/// User identifier (typically the login email)
		id: String,
		/// Display name, used as payer name for payments
		#[serde(default, skip_serializing_if = "Option::is_none")]
		full_name: Option<String>,
	},
}

impl CurrentUser {
	pub fn guest() -> Self {
		Self::Guest
	}

	/// Create an authenticated user.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_webforms::CurrentUser;
	///
	/// let user = CurrentUser::authenticated("ada@example.com");
	/// assert!(user.is_authenticated());
	/// assert_eq!(user.id(), "ada@example.com");
	/// assert_eq!(CurrentUser::guest().id(), "Guest");
	/// ```
	pub fn authenticated(id: impl Into<String>) -> Self {
		Self::Authenticated {
			id: id.into(),
			full_name: None,
		}
	}

	pub fn with_full_name(self, name: impl Into<String>) -> Self {
		match self {
			Self::Guest => Self::Guest,
			Self::Authenticated { id, .. } => Self::Authenticated {
				id,
				full_name: Some(name.into()),
			},
		}
	}

	pub fn is_authenticated(&self) -> bool {
		matches!(self, Self::Authenticated { .. })
	}

	pub fn is_guest(&self) -> bool {
		!self.is_authenticated()
	}

	/// Identifier used for ownership; [`GUEST`] for anonymous visitors.
	pub fn id(&self) -> &str {
		match self {
			Self::Guest => GUEST,
			Self::Authenticated { id, .. } => id,
		}
	}

	/// Display name, falling back to the identifier.
	pub fn full_name(&self) -> &str {
		match self {
			Self::Guest => GUEST,
			Self::Authenticated { id, full_name } => full_name.as_deref().unwrap_or(id),
		}
	}
}

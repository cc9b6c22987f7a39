//! Permission gate for web form records.
//!
//! Access to a record through a web form is decided by an ordered chain of
//! evaluators. The first evaluator that returns a verdict other than
//! [`Verdict::Continue`] decides; if none does, access is denied.
//!
//! The standard chain is:
//!
//! 1. [`GuestDenied`] - anonymous callers are denied before anything else
//!    runs, so guests learn nothing about which records exist.
//! 2. [`OwnerAllowed`] - the record owner is allowed.
//! 3. [`WebsitePermissionAllowed`] - generic website permission rules.
//! 4. [`CustomHookAllowed`] - record-type specific hooks.

use crate::error::{WebFormError, WebFormResult};
use crate::record::Record;
use crate::store::{RecordStore, WebsitePermission};
use crate::user::CurrentUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Action being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
	Read,
	Write,
	Create,
	Delete,
}

impl fmt::Display for PermissionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PermissionType::Read => write!(f, "read"),
			PermissionType::Write => write!(f, "write"),
			PermissionType::Create => write!(f, "create"),
			PermissionType::Delete => write!(f, "delete"),
		}
	}
}

/// Outcome of a single evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
	Allow,
	Deny,
	/// No opinion; ask the next evaluator
	Continue,
}

/// A permission question about one record.
#[derive(Debug, Clone, Copy)]
pub struct PermissionQuery<'a> {
	pub user: &'a CurrentUser,
	pub doctype: &'a str,
	pub name: &'a str,
	pub ptype: PermissionType,
}

/// One link of the permission chain.
#[async_trait]
pub trait PermissionEvaluator: Send + Sync {
	/// Short name used in logs.
	fn name(&self) -> &'static str;

	async fn evaluate(&self, query: &PermissionQuery<'_>) -> WebFormResult<Verdict>;
}

/// Denies every anonymous caller.
pub struct GuestDenied;

#[async_trait]
impl PermissionEvaluator for GuestDenied {
	fn name(&self) -> &'static str {
		"guest"
	}

	async fn evaluate(&self, query: &PermissionQuery<'_>) -> WebFormResult<Verdict> {
		if query.user.is_guest() {
			Ok(Verdict::Deny)
		} else {
			Ok(Verdict::Continue)
		}
	}
}

/// Allows the recorded owner of the record.
pub struct OwnerAllowed {
	records: Arc<dyn RecordStore>,
}

impl OwnerAllowed {
	pub fn new(records: Arc<dyn RecordStore>) -> Self {
		Self { records }
	}
}

#[async_trait]
impl PermissionEvaluator for OwnerAllowed {
	fn name(&self) -> &'static str {
		"owner"
	}

	async fn evaluate(&self, query: &PermissionQuery<'_>) -> WebFormResult<Verdict> {
		let owner = self.records.owner_of(query.doctype, query.name).await?;
		if owner.as_deref() == Some(query.user.id()) {
			Ok(Verdict::Allow)
		} else {
			Ok(Verdict::Continue)
		}
	}
}

/// Allows callers the generic website permission rules allow.
pub struct WebsitePermissionAllowed {
	rules: Arc<dyn WebsitePermission>,
}

impl WebsitePermissionAllowed {
	pub fn new(rules: Arc<dyn WebsitePermission>) -> Self {
		Self { rules }
	}
}

#[async_trait]
impl PermissionEvaluator for WebsitePermissionAllowed {
	fn name(&self) -> &'static str {
		"website"
	}

	async fn evaluate(&self, query: &PermissionQuery<'_>) -> WebFormResult<Verdict> {
		let allowed = self
			.rules
			.has_website_permission(query.user, query.doctype, query.ptype, query.name)
			.await?;
		Ok(if allowed {
			Verdict::Allow
		} else {
			Verdict::Continue
		})
	}
}

/// Record-type specific permission hook.
///
/// Registered per record type; only consulted for records of that type.
pub trait WebFormPermissionHook: Send + Sync {
	fn has_webform_permission(&self, record: &Record, user: &CurrentUser) -> bool;
}

impl<F> WebFormPermissionHook for F
where
	F: Fn(&Record, &CurrentUser) -> bool + Send + Sync,
{
	fn has_webform_permission(&self, record: &Record, user: &CurrentUser) -> bool {
		self(record, user)
	}
}

/// Allows callers a record-type hook allows.
pub struct CustomHookAllowed {
	records: Arc<dyn RecordStore>,
	hooks: HashMap<String, Arc<dyn WebFormPermissionHook>>,
}

impl CustomHookAllowed {
	pub fn new(
		records: Arc<dyn RecordStore>,
		hooks: HashMap<String, Arc<dyn WebFormPermissionHook>>,
	) -> Self {
		Self { records, hooks }
	}
}

#[async_trait]
impl PermissionEvaluator for CustomHookAllowed {
	fn name(&self) -> &'static str {
		"custom_hook"
	}

	async fn evaluate(&self, query: &PermissionQuery<'_>) -> WebFormResult<Verdict> {
		let Some(hook) = self.hooks.get(query.doctype) else {
			return Ok(Verdict::Continue);
		};

		let record = match self.records.get(query.doctype, query.name).await {
			Ok(record) => record,
			Err(WebFormError::NotFound { .. }) => return Ok(Verdict::Continue),
			Err(e) => return Err(e),
		};

		if hook.has_webform_permission(&record, query.user) {
			Ok(Verdict::Allow)
		} else {
			Ok(Verdict::Continue)
		}
	}
}

/// Ordered permission chain.
#[derive(Clone)]
pub struct PermissionGate {
	evaluators: Vec<Arc<dyn PermissionEvaluator>>,
}

impl PermissionGate {
	/// Build a gate from an explicit evaluator order.
	pub fn new(evaluators: Vec<Arc<dyn PermissionEvaluator>>) -> Self {
		Self { evaluators }
	}

	/// The standard chain: guest, owner, website rules, custom hooks.
	pub fn standard(
		records: Arc<dyn RecordStore>,
		website: Arc<dyn WebsitePermission>,
		hooks: HashMap<String, Arc<dyn WebFormPermissionHook>>,
	) -> Self {
		Self::new(vec![
			Arc::new(GuestDenied),
			Arc::new(OwnerAllowed::new(Arc::clone(&records))),
			Arc::new(WebsitePermissionAllowed::new(website)),
			Arc::new(CustomHookAllowed::new(records, hooks)),
		])
	}

	/// Names of the evaluators in evaluation order.
	pub fn evaluator_names(&self) -> Vec<&'static str> {
		self.evaluators.iter().map(|e| e.name()).collect()
	}

	/// Whether `user` may perform `ptype` on the record.
	pub async fn has_permission(
		&self,
		user: &CurrentUser,
		doctype: &str,
		name: &str,
		ptype: PermissionType,
	) -> WebFormResult<bool> {
		let query = PermissionQuery {
			user,
			doctype,
			name,
			ptype,
		};

		for evaluator in &self.evaluators {
			match evaluator.evaluate(&query).await? {
				Verdict::Continue => continue,
				verdict => {
					tracing::debug!(
						evaluator = evaluator.name(),
						doctype,
						name,
						%ptype,
						allowed = verdict == Verdict::Allow,
						"web form permission decided"
					);
					return Ok(verdict == Verdict::Allow);
				}
			}
		}

		tracing::debug!(doctype, name, %ptype, "no evaluator allowed web form access");
		Ok(false)
	}
}

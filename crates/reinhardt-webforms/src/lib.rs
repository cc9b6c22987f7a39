//! # reinhardt-webforms
//!
//! Data-driven web forms bound to generic records.
//!
//! A [`WebForm`] describes a public create/edit/list page for one record
//! type as an ordered list of fields. This crate turns that description
//! into something a template can render and applies what the browser sends
//! back:
//!
//! - [`layout`]: flat field list to page/section/column tree
//! - [`permission`]: ordered permission chain for record access
//! - [`context`]: per-request render context
//! - [`submission`] and [`deletion`]: the accept and delete operations
//! - [`route`]: request parameters echoed into follow-up links
//!
//! Persistence, file storage, comments and website permissions are
//! collaborators reached through the traits in [`store`]. In-memory
//! implementations live in [`backends::memory`].
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_webforms::{FieldType, WebForm, WebFormField};
//!
//! let form = WebForm::new("Event Signup", "Event").with_fields([
//!     WebFormField::new("title", FieldType::Data).required(),
//!     WebFormField::page_break(),
//!     WebFormField::new("notes", FieldType::SmallText),
//! ]);
//!
//! let layout = form.get_layout();
//! assert_eq!(layout.len(), 2);
//! ```

pub mod backends;
pub mod context;
pub mod definition;
pub mod deletion;
pub mod endpoint;
pub mod error;
pub mod extension;
pub mod field;
pub mod layout;
pub mod list;
pub mod payment;
pub mod permission;
pub mod record;
pub mod registry;
pub mod request;
pub mod route;
pub mod service;
pub mod settings;
pub mod store;
pub mod submission;
pub mod user;

pub use context::{Breadcrumb, ListContext, WebFormContext};
pub use definition::WebForm;
pub use error::{WebFormError, WebFormResult};
pub use extension::{ContextHook, WebFormExtension};
pub use field::{DisplayProperties, FieldType, SchemaField, WebFormField, reconcile_field};
pub use layout::{LayoutColumn, LayoutPage, LayoutSection, build_layout};
pub use list::ListRequest;
pub use payment::{HostedCheckoutGateway, PaymentDetails, PaymentGateway, PaymentGatewayRegistry};
pub use permission::{PermissionGate, PermissionType, WebFormPermissionHook};
pub use record::{Record, RecordType};
pub use registry::WebFormRegistry;
pub use request::WebFormRequest;
pub use service::{WebFormService, WebFormServices};
pub use settings::{ValidationFlags, WebFormSettings};
pub use store::{FileRef, FileStore, RecordStore};
pub use user::CurrentUser;

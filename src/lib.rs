//! # Reinhardt Web Forms
//!
//! Data-driven web forms for Rust.
//!
//! A web form is a public create/edit/list page for one record type,
//! described as data instead of page code. This facade bundles the member
//! crates:
//!
//! - [`reinhardt_webforms`] (re-exported at the root): form definitions,
//!   layout computation, the permission chain, render contexts and the
//!   accept/delete submission pipeline
//! - [`storage`]: attachment storage backends (feature `storage`)
//!
//! ## Feature Flags
//!
//! - `storage` (default) - Attachment storage on the local filesystem or in memory
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use reinhardt_webform::backends::memory::MemoryRecordStore;
//! use reinhardt_webform::storage::{AttachmentConfig, AttachmentStore, StorageConfig, create_storage};
//! use reinhardt_webform::{
//!     CurrentUser, FieldType, RecordType, SchemaField, WebForm, WebFormField, WebFormRegistry,
//!     WebFormService, WebFormServices, WebFormSettings,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records = Arc::new(MemoryRecordStore::new());
//!     records.register_type(
//!         RecordType::new("Event").with_field(SchemaField::new("title", FieldType::Data)),
//!     );
//!     let storage = create_storage(StorageConfig::Memory).await?;
//!     let files = Arc::new(AttachmentStore::new(storage, AttachmentConfig::default()));
//!
//!     let services = WebFormServices::builder()
//!         .records(records.clone())
//!         .list_view(records.clone())
//!         .comments(records)
//!         .files(files)
//!         .build()?;
//!
//!     let mut registry = WebFormRegistry::new();
//!     registry.register(
//!         WebForm::new("Event Signup", "Event")
//!             .with_field(WebFormField::new("title", FieldType::Data).required()),
//!     );
//!
//!     let service = WebFormService::new(registry, services, WebFormSettings::from_env()?);
//!     let name = service
//!         .accept("Event Signup", r#"{"doctype": "Event", "title": "Launch"}"#, &CurrentUser::guest())
//!         .await?;
//!     println!("created {}", name);
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "storage")]
pub mod storage;

pub use reinhardt_webforms::*;

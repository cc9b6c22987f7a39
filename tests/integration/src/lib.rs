//! Integration test utilities for reinhardt web forms
//!
//! Builds web form services over the in-memory record store and a real
//! attachment storage backend.

use reinhardt_webform::backends::memory::MemoryRecordStore;
use reinhardt_webform::storage::{AttachmentConfig, AttachmentStore, StorageBackend};
use reinhardt_webform::{
	FieldType, RecordType, SchemaField, WebForm, WebFormField, WebFormRegistry, WebFormService,
	WebFormServices, WebFormSettings,
};
use std::sync::Arc;

/// Data URL of the bytes `%PDF-1.7`.
pub const FLYER: &str = "data:application/pdf;base64,JVBERi0xLjc=";

/// Record store with an `Event` type carrying a title and a flyer.
pub fn event_records() -> MemoryRecordStore {
	let store = MemoryRecordStore::new();
	store.register_type(
		RecordType::new("Event")
			.with_field(SchemaField::new("title", FieldType::Data))
			.with_field(SchemaField::new("flyer", FieldType::Attach)),
	);
	store
}

/// Event signup form with a title and a flyer attachment.
pub fn event_signup() -> WebForm {
	WebForm::new("Event Signup", "Event").with_fields([
		WebFormField::new("title", FieldType::Data).required(),
		WebFormField::new("flyer", FieldType::Attach),
	])
}

/// Service serving `form` over `records` and an attachment store on `storage`.
///
/// # Panics
///
/// Panics if the service collaborators cannot be assembled.
pub fn service(
	records: &MemoryRecordStore,
	storage: Arc<dyn StorageBackend>,
	attachments: AttachmentConfig,
	form: WebForm,
) -> WebFormService {
	let records = Arc::new(records.clone());
	let services = WebFormServices::builder()
		.records(records.clone())
		.list_view(records.clone())
		.comments(records)
		.files(Arc::new(AttachmentStore::new(storage, attachments)))
		.build()
		.expect("all collaborators are set");

	let mut registry = WebFormRegistry::new();
	registry.register(form);
	WebFormService::new(registry, services, WebFormSettings::default())
}

//! End-to-end web form flow with real attachment storage.

use reinhardt_webform::CurrentUser;
use reinhardt_webform::WebFormError;
use reinhardt_webform::WebFormRequest;
use reinhardt_webform::backends::memory::MemoryRecordStore;
use reinhardt_webform::storage::config::LocalConfig;
use reinhardt_webform::storage::{AttachmentConfig, StorageConfig, create_storage};
use reinhardt_webform_integration_tests::{FLYER, event_records, event_signup, service};
use rstest::*;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

fn ada() -> CurrentUser {
	CurrentUser::authenticated("ada@example.com")
}

fn grace() -> CurrentUser {
	CurrentUser::authenticated("grace@example.com")
}

#[fixture]
fn records() -> MemoryRecordStore {
	event_records()
}

async fn local_service(
	records: &MemoryRecordStore,
	dir: &Path,
) -> reinhardt_webform::WebFormService {
	let storage = create_storage(StorageConfig::Local(LocalConfig {
		base_path: dir.to_str().unwrap().to_string(),
	}))
	.await
	.unwrap();
	let mut form = event_signup();
	form.login_required = true;
	form.allow_edit = true;
	form.allow_delete = true;
	service(records, storage, AttachmentConfig::default(), form)
}

#[rstest]
#[tokio::test]
async fn test_submit_replace_and_detach_on_local_storage(records: MemoryRecordStore) {
	let dir = TempDir::new().unwrap();
	let service = local_service(&records, dir.path()).await;

	let data = json!({
		"doctype": "Event",
		"title": "Launch",
		"flyer": {"__file_attachment": 1, "filename": "flyer.pdf", "dataurl": FLYER}
	});
	let name = service
		.accept("Event Signup", &data.to_string(), &ada())
		.await
		.unwrap();
	let record_dir = dir.path().join("Event").join(&name);

	let stored = records.record("Event", &name).unwrap();
	assert_eq!(
		stored.get_str("flyer"),
		Some(format!("/files/Event/{}/flyer.pdf", name).as_str())
	);
	assert_eq!(std::fs::read(record_dir.join("flyer.pdf")).unwrap(), b"%PDF-1.7");

	let replace = json!({
		"doctype": "Event",
		"name": name,
		"flyer": {"__file_attachment": 1, "filename": "poster.pdf", "dataurl": FLYER}
	});
	service
		.accept("Event Signup", &replace.to_string(), &ada())
		.await
		.unwrap();

	assert!(!record_dir.join("flyer.pdf").exists());
	assert!(record_dir.join("poster.pdf").exists());

	let detach = json!({"doctype": "Event", "name": name, "flyer": {"__no_attachment": 1}});
	service
		.accept("Event Signup", &detach.to_string(), &ada())
		.await
		.unwrap();

	assert!(!record_dir.join("poster.pdf").exists());
	assert_eq!(records.record("Event", &name).unwrap().get_str("flyer"), None);
}

#[rstest]
#[tokio::test]
async fn test_detaching_a_borrowed_url_keeps_the_owner_file(records: MemoryRecordStore) {
	let dir = TempDir::new().unwrap();
	let upload = json!({
		"doctype": "Event",
		"title": "Launch",
		"flyer": {"__file_attachment": 1, "filename": "flyer.pdf", "dataurl": FLYER}
	});
	let victim = local_service(&records, dir.path())
		.await
		.accept("Event Signup", &upload.to_string(), &ada())
		.await
		.unwrap();
	let victim_url = records
		.record("Event", &victim)
		.unwrap()
		.get_str("flyer")
		.unwrap()
		.to_string();

	// A fresh service stands in for a restarted process.
	let service = local_service(&records, dir.path()).await;
	let own = json!({"doctype": "Event", "title": "Review", "flyer": victim_url});
	let attacker = service
		.accept("Event Signup", &own.to_string(), &grace())
		.await
		.unwrap();
	let detach = json!({"doctype": "Event", "name": attacker, "flyer": {"__no_attachment": 1}});
	service
		.accept("Event Signup", &detach.to_string(), &grace())
		.await
		.unwrap();

	assert!(dir.path().join("Event").join(&victim).join("flyer.pdf").is_file());
}

#[rstest]
#[tokio::test]
async fn test_context_then_delete(records: MemoryRecordStore) {
	let storage = create_storage(StorageConfig::Memory).await.unwrap();
	let mut form = event_signup();
	form.login_required = true;
	form.allow_delete = true;
	let service = service(&records, storage, AttachmentConfig::default(), form);
	let data = json!({"doctype": "Event", "title": "Launch"}).to_string();
	let name = service.accept("Event Signup", &data, &ada()).await.unwrap();

	let context = service
		.get_context("Event Signup", &WebFormRequest::new(ada()))
		.await
		.unwrap();
	assert_eq!(context.doc.as_ref().and_then(|d| d.name.as_deref()), Some(name.as_str()));
	assert_eq!(context.title, "Launch");

	service.delete("Event Signup", &name, &ada()).await.unwrap();
	assert!(records.record("Event", &name).is_none());
}

#[rstest]
#[tokio::test]
async fn test_oversized_attachment_leaves_record_without_file(records: MemoryRecordStore) {
	let storage = create_storage(StorageConfig::Memory).await.unwrap();
	let service = service(
		&records,
		storage,
		AttachmentConfig::default().with_max_file_size(2),
		event_signup(),
	);

	let data = json!({
		"doctype": "Event",
		"title": "Launch",
		"flyer": {"__file_attachment": 1, "filename": "flyer.pdf", "dataurl": FLYER}
	});
	let err = service
		.accept("Event Signup", &data.to_string(), &CurrentUser::guest())
		.await
		.unwrap_err();

	assert!(matches!(err, WebFormError::FileStore(_)));
	assert_eq!(records.count("Event"), 1);
}

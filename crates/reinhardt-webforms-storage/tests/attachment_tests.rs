//! Attachment store tests.


use fixtures::{
	LocalTestDir, PDF_BYTES, PDF_DATA_URL, attachment_store, local_temp_dir, memory_storage,
};
use reinhardt_webforms::{FileStore, WebFormError};
use reinhardt_webforms_storage::backends::MemoryStorage;
use reinhardt_webforms_storage::config::LocalConfig;
use reinhardt_webforms_storage::{
	AttachmentConfig, AttachmentStore, StorageBackend, StorageConfig, create_storage,
};
use rstest::rstest;
use std::sync::Arc;

async fn local_store(dir: &LocalTestDir) -> AttachmentStore {
	let storage = create_storage(StorageConfig::Local(LocalConfig {
		base_path: dir.path().to_str().unwrap().to_string(),
	}))
	.await
	.unwrap();
	AttachmentStore::new(storage, AttachmentConfig::default())
}

#[rstest]
#[tokio::test]
async fn test_save_file_decodes_and_links_record(memory_storage: MemoryStorage) {
	let store = attachment_store(&memory_storage);

	let file = store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap();

	assert_eq!(file.file_url, "/files/Event/Event-0001/flyer.pdf");
	assert_eq!(file.file_name, "Event/Event-0001/flyer.pdf");
	assert_eq!(file.size, PDF_BYTES.len() as u64);
	assert_eq!(file.attached_to_doctype, "Event");
	assert_eq!(file.attached_to_name, "Event-0001");
	assert_eq!(
		memory_storage.content("Event/Event-0001/flyer.pdf").as_deref(),
		Some(PDF_BYTES)
	);
}

#[rstest]
#[tokio::test]
async fn test_same_name_on_one_record_gets_a_unique_prefix(memory_storage: MemoryStorage) {
	let store = attachment_store(&memory_storage);

	let first = store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap();
	let second = store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap();

	assert_ne!(first.file_url, second.file_url);
	assert!(second.file_name.starts_with("Event/Event-0001/"));
	assert!(second.file_name.ends_with("-flyer.pdf"));
	assert_eq!(memory_storage.len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_same_name_on_other_records_is_kept(memory_storage: MemoryStorage) {
	let store = attachment_store(&memory_storage);

	store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap();
	store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0002")
		.await
		.unwrap();

	assert_eq!(
		memory_storage.names(),
		["Event/Event-0001/flyer.pdf", "Event/Event-0002/flyer.pdf"]
	);
}

#[rstest]
#[tokio::test]
async fn test_concurrent_uploads_keep_both_files(#[future] local_temp_dir: LocalTestDir) {
	let dir = local_temp_dir.await;
	let store = local_store(&dir).await;

	let (first, second) = tokio::join!(
		store.save_file("flyer.pdf", "data:text/plain;base64,b25l", "Event", "Event-0001"),
		store.save_file("flyer.pdf", "data:text/plain;base64,dHdv", "Event", "Event-0001"),
	);
	let (first, second) = (first.unwrap(), second.unwrap());

	assert_ne!(first.file_name, second.file_name);
	let mut contents = [
		std::fs::read(dir.path().join(&first.file_name)).unwrap(),
		std::fs::read(dir.path().join(&second.file_name)).unwrap(),
	];
	contents.sort();
	assert_eq!(contents, [b"one".to_vec(), b"two".to_vec()]);
}

#[rstest]
#[tokio::test]
async fn test_client_paths_are_flattened(memory_storage: MemoryStorage) {
	let store = attachment_store(&memory_storage);

	let file = store
		.save_file("../../etc/flyer.pdf", "JVBERi0xLjc=", "Event", "Event-0001")
		.await
		.unwrap();

	assert_eq!(file.file_name, "Event/Event-0001/flyer.pdf");
	assert_eq!(memory_storage.names(), ["Event/Event-0001/flyer.pdf"]);
}

#[rstest]
#[tokio::test]
async fn test_record_identifiers_cannot_climb_out(memory_storage: MemoryStorage) {
	let store = attachment_store(&memory_storage);

	let file = store
		.save_file("flyer.pdf", PDF_DATA_URL, "..", "../Event-0001")
		.await
		.unwrap();

	assert_eq!(file.file_name, "%2E%2E/%2E%2E%2FEvent-0001/flyer.pdf");
}

#[rstest]
#[tokio::test]
async fn test_oversized_upload_is_rejected(memory_storage: MemoryStorage) {
	let store = AttachmentStore::new(
		Arc::new(memory_storage.clone()),
		AttachmentConfig::default().with_max_file_size(4),
	);

	let err = store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap_err();

	assert!(matches!(err, WebFormError::FileStore(_)));
	assert!(memory_storage.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_invalid_payload_is_rejected(memory_storage: MemoryStorage) {
	let store = attachment_store(&memory_storage);

	let err = store
		.save_file("flyer.pdf", "data:application/pdf;base64,%%%", "Event", "Event-0001")
		.await
		.unwrap_err();

	assert!(err.to_string().contains("Invalid data URL"));
	assert!(memory_storage.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_remove_by_url(memory_storage: MemoryStorage) {
	let store = attachment_store(&memory_storage);
	let file = store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap();

	store
		.remove_file_by_url(&file.file_url, "Event", "Event-0001")
		.await
		.unwrap();

	assert!(memory_storage.is_empty());
}

#[rstest]
#[case::other_name("Event", "Event-0002")]
#[case::other_doctype("Task", "Event-0001")]
#[tokio::test]
async fn test_remove_skips_files_of_other_records(
	memory_storage: MemoryStorage,
	#[case] doctype: &str,
	#[case] name: &str,
) {
	let store = attachment_store(&memory_storage);
	let file = store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap();

	store
		.remove_file_by_url(&file.file_url, doctype, name)
		.await
		.unwrap();

	assert_eq!(memory_storage.names(), ["Event/Event-0001/flyer.pdf"]);
}

#[rstest]
#[tokio::test]
async fn test_ownership_survives_a_new_store(#[future] local_temp_dir: LocalTestDir) {
	let dir = local_temp_dir.await;
	let file = local_store(&dir)
		.await
		.save_file("victim.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap();
	let path = dir.path().join(&file.file_name);

	let restarted = local_store(&dir).await;
	restarted
		.remove_file_by_url(&file.file_url, "Event", "Event-0002")
		.await
		.unwrap();
	assert!(path.is_file());

	restarted
		.remove_file_by_url(&file.file_url, "Event", "Event-0001")
		.await
		.unwrap();
	assert!(!path.exists());
}

#[rstest]
#[case::missing_file("/files/Event/Event-0001/gone.pdf")]
#[case::foreign_url("https://cdn.example.com/flyer.pdf")]
#[case::bare_prefix("/files/")]
#[case::record_directory("/files/Event/Event-0001/")]
#[case::untracked_flat_file("/files/flyer.pdf")]
#[case::climbing_out("/files/Event/Event-0001/../Event-0002/flyer.pdf")]
#[tokio::test]
async fn test_remove_unknown_url_is_a_no_op(memory_storage: MemoryStorage, #[case] url: &str) {
	let store = attachment_store(&memory_storage);
	memory_storage
		.save("Event/Event-0002/flyer.pdf", PDF_BYTES)
		.await
		.unwrap();
	memory_storage.save("flyer.pdf", PDF_BYTES).await.unwrap();

	store
		.remove_file_by_url(url, "Event", "Event-0001")
		.await
		.unwrap();

	assert_eq!(memory_storage.len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_custom_files_url(memory_storage: MemoryStorage) {
	let store = AttachmentStore::new(
		Arc::new(memory_storage.clone()),
		AttachmentConfig::default().with_files_url("/private/files/"),
	);

	let file = store
		.save_file("flyer.pdf", PDF_DATA_URL, "Event", "Event-0001")
		.await
		.unwrap();
	assert_eq!(file.file_url, "/private/files/Event/Event-0001/flyer.pdf");

	store
		.remove_file_by_url(&file.file_url, "Event", "Event-0001")
		.await
		.unwrap();
	assert!(memory_storage.is_empty());
}

//! Local filesystem backend tests.


use fixtures::{LocalTestDir, local_temp_dir};
use reinhardt_webforms_storage::backends::LocalStorage;
use reinhardt_webforms_storage::config::LocalConfig;
use reinhardt_webforms_storage::{StorageBackend, StorageError};
use rstest::rstest;
use std::fs;

#[rstest]
#[tokio::test]
async fn test_save_writes_file(#[future] local_temp_dir: LocalTestDir) {
	let dir = local_temp_dir.await;

	let name = dir.backend().save("flyer.pdf", b"%PDF").await.unwrap();

	assert_eq!(name, "flyer.pdf");
	assert_eq!(fs::read(dir.path().join("flyer.pdf")).unwrap(), b"%PDF");
}

#[rstest]
#[tokio::test]
async fn test_save_creates_parent_directories(#[future] local_temp_dir: LocalTestDir) {
	let dir = local_temp_dir.await;

	dir.backend()
		.save("Event/Event-0001/flyer.pdf", b"%PDF")
		.await
		.unwrap();

	assert!(
		dir.path()
			.join("Event")
			.join("Event-0001")
			.join("flyer.pdf")
			.is_file()
	);
}

#[rstest]
#[tokio::test]
async fn test_save_never_replaces_existing_file(#[future] local_temp_dir: LocalTestDir) {
	let dir = local_temp_dir.await;
	let backend = dir.backend();
	backend.save("flyer.pdf", b"first").await.unwrap();

	let second = backend.save("flyer.pdf", b"second").await;

	assert!(matches!(second, Err(StorageError::AlreadyExists(_))));
	assert_eq!(fs::read(dir.path().join("flyer.pdf")).unwrap(), b"first");
}

#[rstest]
#[tokio::test]
async fn test_delete_then_missing(#[future] local_temp_dir: LocalTestDir) {
	let dir = local_temp_dir.await;
	let backend = dir.backend();
	backend.save("flyer.pdf", b"%PDF").await.unwrap();

	backend.delete("flyer.pdf").await.unwrap();

	assert!(!dir.path().join("flyer.pdf").exists());
	assert!(matches!(
		backend.delete("flyer.pdf").await,
		Err(StorageError::NotFound(_))
	));
}

#[rstest]
#[tokio::test]
async fn test_delete_removes_emptied_record_directory(#[future] local_temp_dir: LocalTestDir) {
	let dir = local_temp_dir.await;
	let backend = dir.backend();
	backend.save("Event/Event-0001/a.pdf", b"a").await.unwrap();
	backend.save("Event/Event-0001/b.pdf", b"b").await.unwrap();
	let record_dir = dir.path().join("Event").join("Event-0001");

	backend.delete("Event/Event-0001/a.pdf").await.unwrap();
	assert!(record_dir.is_dir());

	backend.delete("Event/Event-0001/b.pdf").await.unwrap();
	assert!(!record_dir.exists());
	assert!(dir.path().is_dir());
}

#[rstest]
#[case("../escape.txt")]
#[case("/etc/passwd")]
#[case("nested/../../escape.txt")]
#[tokio::test]
async fn test_names_cannot_escape_base_path(
	#[future] local_temp_dir: LocalTestDir,
	#[case] name: &str,
) {
	let dir = local_temp_dir.await;

	let result = dir.backend().save(name, b"nope").await;

	assert!(matches!(result, Err(StorageError::PermissionDenied(_))));
	assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
}

#[rstest]
fn test_missing_base_path_is_rejected() {
	let result = LocalStorage::new(LocalConfig {
		base_path: "/nonexistent/webform/files".to_string(),
	});
	assert!(matches!(result, Err(StorageError::ConfigError(_))));
}

#[rstest]
fn test_base_path_must_be_a_directory() {
	let file = tempfile::NamedTempFile::new().unwrap();
	let result = LocalStorage::new(LocalConfig {
		base_path: file.path().to_str().unwrap().to_string(),
	});
	assert!(matches!(result, Err(StorageError::ConfigError(_))));
}

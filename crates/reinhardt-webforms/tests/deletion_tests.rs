//! Deletion handler and endpoint tests.


use fixtures::{MemoryFileStore, ada, event_form, file_store, grace, record_store, seed_event, service};
use http::StatusCode;
use reinhardt_webforms::backends::memory::MemoryRecordStore;
use reinhardt_webforms::endpoint::{AcceptRequest, DeleteRequest, handle_accept, handle_delete};
use reinhardt_webforms::{CurrentUser, ListRequest, WebForm, WebFormError};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

fn deletable_form() -> WebForm {
	let mut form = event_form();
	form.allow_delete = true;
	form
}

#[rstest]
#[case::owner_with_allow_delete(true, "owner", None)]
#[case::owner_without_allow_delete(false, "owner", Some(StatusCode::FORBIDDEN))]
#[case::other_with_allow_delete(true, "other", Some(StatusCode::FORBIDDEN))]
#[case::guest(true, "guest", Some(StatusCode::UNAUTHORIZED))]
#[tokio::test]
async fn test_delete_decision_table(
	record_store: MemoryRecordStore,
	file_store: Arc<MemoryFileStore>,
	#[case] allow_delete: bool,
	#[case] caller: &str,
	#[case] failure: Option<StatusCode>,
) {
	let name = seed_event(&record_store, &ada(), "Launch").await;
	let mut form = event_form();
	form.allow_delete = allow_delete;
	let service = service(&record_store, file_store, [form]);
	let user = match caller {
		"owner" => ada(),
		"other" => grace(),
		_ => CurrentUser::guest(),
	};

	let result = service.delete("Event Signup", &name, &user).await;

	match failure {
		None => {
			result.unwrap();
			assert!(record_store.record("Event", &name).is_none());
		}
		Some(status) => {
			assert_eq!(result.unwrap_err().status_code(), status);
			assert!(record_store.record("Event", &name).is_some());
		}
	}
}

#[rstest]
#[tokio::test]
async fn test_delete_unknown_record_is_denied(
	record_store: MemoryRecordStore,
	file_store: Arc<MemoryFileStore>,
) {
	let service = service(&record_store, file_store, [deletable_form()]);

	let err = service
		.delete("Event Signup", "Event-0404", &ada())
		.await
		.unwrap_err();

	assert!(matches!(err, WebFormError::PermissionDenied(_)));
}

#[rstest]
#[tokio::test]
async fn test_delete_through_unknown_form(
	record_store: MemoryRecordStore,
	file_store: Arc<MemoryFileStore>,
) {
	let service = service(&record_store, file_store, [deletable_form()]);

	let err = service
		.delete("Job Application", "Event-0001", &ada())
		.await
		.unwrap_err();

	assert!(matches!(err, WebFormError::NotFound { .. }));
}

// ============================================================================
// Endpoints
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_accept_endpoint_reports_record_name(
	record_store: MemoryRecordStore,
	file_store: Arc<MemoryFileStore>,
) {
	let service = service(&record_store, file_store, [event_form()]);
	let request = AcceptRequest {
		web_form: "Event Signup".to_string(),
		data: json!({"doctype": "Event", "title": "Launch"}).to_string(),
	};

	let response = handle_accept(&service, request, &CurrentUser::guest()).await;

	assert!(response.is_success());
	assert_eq!(response.message.as_deref(), Some("Event-0001"));
	assert_eq!(
		serde_json::to_value(&response).unwrap(),
		json!({"message": "Event-0001"})
	);
}

#[rstest]
#[tokio::test]
async fn test_accept_endpoint_maps_errors(
	record_store: MemoryRecordStore,
	file_store: Arc<MemoryFileStore>,
) {
	let service = service(&record_store, file_store, [event_form()]);
	let request = AcceptRequest {
		web_form: "Event Signup".to_string(),
		data: json!({"doctype": "Task"}).to_string(),
	};

	let response = handle_accept(&service, request, &ada()).await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert!(response.message.is_none());
	assert!(response.error.unwrap().starts_with("Invalid Request"));
}

#[rstest]
#[tokio::test]
async fn test_delete_endpoint_requires_session(
	record_store: MemoryRecordStore,
	file_store: Arc<MemoryFileStore>,
) {
	let name = seed_event(&record_store, &ada(), "Launch").await;
	let service = service(&record_store, file_store, [deletable_form()]);
	let request = DeleteRequest {
		web_form: "Event Signup".to_string(),
		name: name.clone(),
	};

	let guest = handle_delete(&service, request.clone(), &CurrentUser::guest()).await;
	assert_eq!(guest.status, StatusCode::UNAUTHORIZED);

	let owner = handle_delete(&service, request, &ada()).await;
	assert!(owner.is_success());
	assert!(record_store.record("Event", &name).is_none());
}

// ============================================================================
// Listing
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_list_is_scoped_to_owner_and_capped(
	record_store: MemoryRecordStore,
	file_store: Arc<MemoryFileStore>,
) {
	for i in 0..25 {
		seed_event(&record_store, &ada(), &format!("Event {}", i)).await;
	}
	seed_event(&record_store, &grace(), "Review").await;
	let service = service(&record_store, file_store, [event_form()]);

	let page = service
		.list(
			"Event Signup",
			&ada(),
			ListRequest::new()
				.with_filter("owner", "grace@example.com")
				.with_page_length(100),
		)
		.await
		.unwrap();
	assert_eq!(page.len(), 20);
	assert!(page.iter().all(|r| r.owner.as_deref() == Some("ada@example.com")));

	let rest = service
		.list("Event Signup", &ada(), ListRequest::new().with_limit_start(20))
		.await
		.unwrap();
	assert_eq!(rest.len(), 5);

	let search = service
		.list("Event Signup", &ada(), ListRequest::new().with_txt("event 2"))
		.await
		.unwrap();
	assert_eq!(search.len(), 6);
}

#[rstest]
#[tokio::test]
async fn test_guest_cannot_list(record_store: MemoryRecordStore, file_store: Arc<MemoryFileStore>) {
	let service = service(&record_store, file_store, [event_form()]);

	let result = service
		.list("Event Signup", &CurrentUser::guest(), ListRequest::new())
		.await;

	assert!(matches!(result, Err(WebFormError::AuthenticationRequired(_))));
}

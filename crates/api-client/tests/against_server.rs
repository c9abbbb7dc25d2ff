use api_client::{ApiError, HttpSchoolsClient, ImageAttachment, SchoolSubmission, SchoolsApi};
use database::MemoryRepository;
use image_store::LocalStore;
use std::sync::Arc;
use web_server::{AppState, build_router};

async fn spawn_server(dir: &std::path::Path) -> (String, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    let state = Arc::new(AppState {
        repo: repo.clone(),
        images: Arc::new(LocalStore::new(dir, "/uploads")),
        max_image_bytes: 5_000_000,
    });
    let app = build_router(state, 12 * 1024 * 1024, None);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), repo)
}

fn lincoln(contact: &str) -> SchoolSubmission {
    SchoolSubmission {
        name: "Lincoln High".into(),
        address: "123 Main St, Springfield".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        contact: contact.into(),
        email_id: "admin@lincoln.edu".into(),
        image: ImageAttachment::new("front.jpg", "image/jpeg", vec![0xFF; 4096]),
    }
}

#[tokio::test]
async fn creates_then_lists() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, _repo) = spawn_server(dir.path()).await;
    let client = HttpSchoolsClient::new(base_url);

    let created = client.create_school(lincoln("5551234567")).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.message, "School added successfully!");
    assert!(created.image_url.starts_with("/uploads/"));

    let schools = client.list_schools().await.unwrap();
    assert_eq!(schools.len(), 1);
    assert_eq!(schools[0].name, "Lincoln High");
    assert_eq!(schools[0].image.as_deref(), Some(created.image_url.as_str()));
}

#[tokio::test]
async fn server_errors_carry_the_message() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, repo) = spawn_server(dir.path()).await;
    let client = HttpSchoolsClient::new(base_url);

    let err = client.create_school(lincoln("555-123")).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
    assert_eq!(err.server_message(), Some("Contact number must be exactly 10 digits"));

    repo.set_available(false);
    let err = client.list_schools().await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = HttpSchoolsClient::new("http://127.0.0.1:9");
    let err = client.list_schools().await.unwrap_err();
    assert!(err.is_network());
}

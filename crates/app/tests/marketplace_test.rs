//! End-to-end tests of the client against an in-process mock backend.
//!
//! The reqwest transport, file token storage and dispatcher run for real;
//! only the marketplace API is replaced by a small axum router.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

use hirelink_application::ports::HttpClientError;
use hirelink_application::{
    ApplicationError, AuthSession, MarketplaceClient, RetryPolicy, ServiceSettings,
};
use hirelink_domain::models::{JobDraft, JobFilters, JobStatus};
use hirelink_domain::{ClientConfig, Credentials};
use hirelink_infrastructure::{
    FileTokenStorage, HireLinkClient, ReqwestTransport, SystemClock, build_client,
};

const TOKEN: &str = "1|integration-token";

#[derive(Default)]
struct Backend {
    job_list_hits: AtomicUsize,
    payment_hits: AtomicUsize,
    /// Last body posted to `/jobs`.
    created: Mutex<Option<Value>>,
}

fn user() -> Value {
    json!({
        "id": 1,
        "name": "Ngozi",
        "email": "ngozi@example.com",
        "role": "client",
        "created_at": "2024-04-01T08:00:00Z"
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn list_jobs(State(backend): State<Arc<Backend>>) -> Json<Value> {
    backend.job_list_hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    Json(json!({
        "data": [{
            "id": 7,
            "title": "Fix leaking tap",
            "description": "Kitchen mixer tap",
            "status": "open",
            "client_id": 1,
            "created_at": "2024-05-02T10:00:00Z"
        }]
    }))
}

async fn create_job(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."})));
    }
    *backend.created.lock() = Some(body.clone());
    let mut job = body;
    job["id"] = json!(8);
    job["status"] = json!("open");
    (StatusCode::CREATED, Json(job))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "correct horse" {
        (StatusCode::OK, Json(json!({"user": user(), "token": TOKEN})))
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "Invalid credentials"})),
        )
    }
}

async fn profile(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if authorized(&headers) {
        (StatusCode::OK, Json(json!({"data": user()})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."})))
    }
}

async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn payment(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<u64>,
) -> (StatusCode, Json<Value>) {
    if backend.payment_hits.fetch_add(1, Ordering::SeqCst) == 0 {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"message": "try again"})));
    }
    (
        StatusCode::OK,
        Json(json!({"id": id, "job_id": 7, "amount": 40.0, "status": "completed"})),
    )
}

async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/jobs", get(list_jobs).post(create_job))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/users/profile", get(profile))
        .route("/api/payments/{id}", get(payment))
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

fn client_for(base_url: &str, dir: &TempDir) -> HireLinkClient {
    let config = ClientConfig {
        token_file: Some(dir.path().join("session.json")),
        ..ClientConfig::new(base_url)
    };
    build_client(&config).unwrap()
}

#[tokio::test]
async fn test_concurrent_reads_hit_backend_once() {
    let (base_url, backend) = spawn_backend().await;
    let dir = tempdir().unwrap();
    let client = client_for(&base_url, &dir);

    let filters = JobFilters::default();
    let (a, b, c) = tokio::join!(
        client.jobs.list(&filters),
        client.jobs.list(&filters),
        client.jobs.list(&filters),
    );

    assert_eq!(backend.job_list_hits.load(Ordering::SeqCst), 1);
    assert_eq!(a.unwrap(), b.unwrap());
    let jobs = c.unwrap();
    assert_eq!(jobs[0].title, "Fix leaking tap");
    assert_eq!(jobs[0].client_id, Some(1));

    client.jobs.list(&filters).await.unwrap();
    assert_eq!(backend.job_list_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_persists_token_and_authorizes_writes() {
    let (base_url, backend) = spawn_backend().await;
    let dir = tempdir().unwrap();
    let client = client_for(&base_url, &dir);

    let rejected = client
        .auth
        .login(&Credentials::new("ngozi@example.com", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(
        rejected,
        ApplicationError::Http(HttpClientError::Status { status: 422, .. })
    ));

    let user = client
        .auth
        .login(&Credentials::new("ngozi@example.com", "correct horse"))
        .await
        .unwrap();
    assert_eq!(user.name, "Ngozi");

    client.jobs.list(&JobFilters::default()).await.unwrap();
    let job = client
        .jobs
        .create(&JobDraft {
            title: "Hang shelves".to_string(),
            description: "Three shelves in the study".to_string(),
            budget: Some(60.0),
            ..JobDraft::default()
        })
        .await
        .unwrap();
    assert_eq!(job.id, 8);
    assert_eq!(job.status, JobStatus::Open);
    assert_eq!(
        backend.created.lock().clone(),
        Some(json!({
            "title": "Hang shelves",
            "description": "Three shelves in the study",
            "budget": 60.0
        }))
    );

    // The write dropped the cached list.
    client.jobs.list(&JobFilters::default()).await.unwrap();
    assert_eq!(backend.job_list_hits.load(Ordering::SeqCst), 2);

    // A fresh client picks the token up from disk.
    let restored = client_for(&base_url, &dir);
    let user = restored.auth.restore().await.unwrap();
    assert_eq!(user.map(|u| u.email), Some("ngozi@example.com".to_string()));

    restored.auth.logout().await.unwrap();
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_stale_token_is_discarded_on_restore() {
    let (base_url, _backend) = spawn_backend().await;
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("session.json"),
        r#"{"saved_at": "2024-01-01T00:00:00Z", "schema_version": 1, "token": "expired"}"#,
    )
    .unwrap();
    let client = client_for(&base_url, &dir);

    assert_eq!(client.auth.restore().await.unwrap(), None);
    assert!(!client.session().is_authenticated());
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let (base_url, backend) = spawn_backend().await;
    let dir = tempdir().unwrap();
    let client = client_for(&base_url, &dir);

    let payment = client.payments.get(3).await.unwrap();

    assert_eq!(payment.id, 3);
    assert_eq!(backend.payment_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_backend_fails_with_network_error() {
    let dir = tempdir().unwrap();
    let storage = FileTokenStorage::new(dir.path().join("session.json"));
    let config = closed_port_config().await;
    let transport =
        ReqwestTransport::new(config.base_url().unwrap()).expect("transport should build");
    let settings = ServiceSettings {
        retry: RetryPolicy::none(),
        ..ServiceSettings::default()
    };
    let client = MarketplaceClient::new(
        transport,
        Arc::new(AuthSession::with_storage(Arc::new(storage))),
        Arc::new(SystemClock::new()),
        settings,
    );

    let error = client.jobs.list(&JobFilters::default()).await.unwrap_err();

    match error {
        ApplicationError::Http(e) => assert!(e.is_network(), "unexpected error {e:?}"),
        other => panic!("unexpected error {other:?}"),
    }
}

async fn closed_port_config() -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    ClientConfig::new(format!("http://127.0.0.1:{port}/api"))
}

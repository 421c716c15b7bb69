//! HttpClient against an in-process stub of the task backend.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use taskdash_client::{
    ClientError, CreateTaskRequest, DetailSurface, DetailView, HttpClient, MemoryTokenStore,
    SearchMode, TaskBoard, TokenStore,
};
use taskdash_core::{BadgeStyle, TaskDetailProjector, TaskDisplayModel, TaskId, TaskStatus};

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
}

async fn get_task(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if token != format!("token-{}", id) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid token"}))).into_response();
    }

    match id.as_str() {
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Internal server error"})),
        )
            .into_response(),
        "gone" => (StatusCode::NOT_FOUND, Json(json!({"error": "Task not found"}))).into_response(),
        "garbled" => (StatusCode::OK, "<html>oops</html>").into_response(),
        _ => Json(json!({
            "id": id,
            "description": "Analyze the current trends in AI technology",
            "status": "completed",
            "result": "{\"result\": {\"summary\": \"ok\"}, \"logs\": \"step 1\\nstep 2\"}",
            "created_at": "2024-03-01T10:00:00.000001",
            "completed_at": "2024-03-01T10:02:00",
            "webhook_url": "https://example.com/hook",
            "metadata": {
                "webhook_delivery": {
                    "status": "success",
                    "last_payload": {"task_id": id},
                    "response": {"status_code": 200, "response_text": "OK"}
                }
            },
            "webhook_status": {"last_attempt": "2024-03-01T10:02:01", "retries": 1}
        }))
        .into_response(),
    }
}

async fn create_task(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    let id = format!("new-{}", backend.hits.load(Ordering::SeqCst));
    let echoed_webhook = body.get("webhook_url").cloned().unwrap_or(Value::Null);
    (
        StatusCode::CREATED,
        Json(json!({
            "task_id": id,
            "token": format!("token-{}", id),
            "status": "pending",
            "webhook_url": echoed_webhook
        })),
    )
        .into_response()
}

async fn set_search_mode(Json(body): Json<Value>) -> Response {
    match body.get("mode").and_then(Value::as_str) {
        Some(mode @ ("mock" | "online")) => Json(json!({"mode": mode})).into_response(),
        _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid mode"}))).into_response(),
    }
}

async fn spawn_backend() -> (SocketAddr, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/:id", get(get_task))
        .route("/api/config/search_mode", post(set_search_mode))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, backend)
}

fn client(addr: SocketAddr) -> HttpClient {
    HttpClient::new(&format!("http://{}", addr))
}

#[tokio::test]
async fn test_fetch_success_decodes_task() {
    let (addr, _) = spawn_backend().await;
    let task = client(addr)
        .get_task(&TaskId::new("t1"), "token-t1")
        .await
        .unwrap();

    assert_eq!(task.id.as_str(), "t1");
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(task.webhook_delivery().unwrap().is_success());
}

#[tokio::test]
async fn test_empty_token_makes_no_request() {
    let (addr, backend) = spawn_backend().await;
    let err = client(addr).get_task(&TaskId::new("t1"), "").await.unwrap_err();

    assert!(matches!(err, ClientError::MissingCredential));
    assert_eq!(backend.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unauthorized_is_distinct_from_server_error() {
    let (addr, _) = spawn_backend().await;
    let client = client(addr);

    let err = client.get_task(&TaskId::new("t1"), "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));

    let err = client
        .get_task(&TaskId::new("broken"), "token-broken")
        .await
        .unwrap_err();
    match err {
        ClientError::RequestFailed { status, status_text } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_is_request_failed() {
    let (addr, _) = spawn_backend().await;
    let err = client(addr)
        .get_task(&TaskId::new("gone"), "token-gone")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let (addr, _) = spawn_backend().await;
    let err = client(addr)
        .get_task(&TaskId::new("garbled"), "token-garbled")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr)
        .get_task(&TaskId::new("t1"), "token-t1")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::TransportError(_)));
}

#[tokio::test]
async fn test_create_task_returns_token() {
    let (addr, _) = spawn_backend().await;
    let client = client(addr);

    let created = client
        .create_task(
            &CreateTaskRequest::new("Analyze trends").with_webhook_url("https://example.com/hook"),
        )
        .await
        .unwrap();
    assert_eq!(created.token, format!("token-{}", created.task_id));
    assert_eq!(created.status, TaskStatus::Pending);

    // The returned token reads the task back.
    let task = client.get_task(&created.task_id, &created.token).await.unwrap();
    assert_eq!(task.id, created.task_id);
}

#[tokio::test]
async fn test_create_task_rejects_bad_webhook_locally() {
    let (addr, backend) = spawn_backend().await;
    let err = client(addr)
        .create_task(&CreateTaskRequest::new("x").with_webhook_url("not a url"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidInput(_)));
    assert_eq!(backend.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_set_search_mode() {
    let (addr, _) = spawn_backend().await;
    let client = client(addr);
    assert_eq!(client.set_search_mode(SearchMode::Mock).await.unwrap(), SearchMode::Mock);
    assert_eq!(
        client.set_search_mode(SearchMode::Online).await.unwrap(),
        SearchMode::Online
    );
}

#[derive(Default)]
struct Collected {
    shown: Vec<TaskDisplayModel>,
    notices: Vec<String>,
}

impl DetailSurface for Collected {
    fn show(&mut self, model: &TaskDisplayModel) {
        self.shown.push(model.clone());
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[tokio::test]
async fn test_detail_view_end_to_end() {
    let (addr, _) = spawn_backend().await;
    let client = client(addr);
    let mut store = MemoryTokenStore::new();
    store.put(&TaskId::new("t7"), "token-t7").unwrap();

    let utc = chrono::FixedOffset::east_opt(0).unwrap();
    let mut view = DetailView::new(Collected::default(), TaskDetailProjector::with_offset(utc));
    view.open_with_store(&client, &store, &TaskId::new("t7"))
        .await
        .unwrap();

    let surface = view.into_surface();
    let model = &surface.shown[0];
    assert_eq!(model.status_style, BadgeStyle::Success);
    assert_eq!(model.created_display, "2024-03-01 10:00:00");
    assert_eq!(model.result_display, "{\n  \"summary\": \"ok\"\n}");
    assert_eq!(model.logs_display, "step 1\nstep 2");
    assert_eq!(model.webhook_delivery.status_text, "success");
    assert_eq!(
        model.webhook_delivery.response_display,
        "Status Code: 200\n\nResponse:\nOK"
    );
    assert_eq!(model.webhook_retries_display, "1");
    assert!(surface.notices.is_empty());
}

#[tokio::test]
async fn test_board_refresh_against_backend() {
    let (addr, _) = spawn_backend().await;
    let client = client(addr);
    let mut store = MemoryTokenStore::new();
    store.put(&TaskId::new("a"), "token-a").unwrap();
    store.put(&TaskId::new("b"), "stale").unwrap();

    let snapshot = TaskBoard::default().refresh(&client, &store).await.unwrap();
    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(snapshot.rows[0].status_label, "completed");
    assert_eq!(snapshot.rows[1].status_label, "unavailable");
}

//! HTTP client for the task backend's REST endpoints.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use taskdash_core::{Task, TaskId};

use crate::error::ClientError;
use crate::types::{CreateTaskRequest, CreatedTask, SearchMode, SearchModeBody};

/// Source of task snapshots.
///
/// Each call is a single attempt; implementations do not retry.
#[async_trait]
pub trait TaskFetcher: Send + Sync {
    /// Fetch the current snapshot of a task, authorized by `token`.
    async fn fetch(&self, task_id: &TaskId, token: &str) -> Result<Task, ClientError>;
}

/// HTTP client for REST API endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client around a preconfigured `reqwest::Client`.
    pub fn with_client(inner: reqwest::Client, base_url: &str) -> Self {
        Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a task's current snapshot.
    ///
    /// Fails with [`ClientError::MissingCredential`] without touching the
    /// network when `token` is empty.
    pub async fn get_task(&self, task_id: &TaskId, token: &str) -> Result<Task, ClientError> {
        if token.trim().is_empty() {
            return Err(ClientError::MissingCredential);
        }

        let url = self.endpoint(&["api", "tasks", task_id.as_str()])?;
        debug!(url = %url, task_id = %task_id, "GET task");

        let response = self
            .inner
            .get(url)
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(transport)?;

        decode_json(check_status(response).await?).await
    }

    /// Submit a new task.
    ///
    /// The returned token must be kept by the caller; it is the only way to
    /// read the task afterwards.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreatedTask, ClientError> {
        if request.task.trim().is_empty() {
            return Err(ClientError::InvalidInput("task description is empty".to_string()));
        }
        if let Some(webhook_url) = &request.webhook_url {
            validate_webhook_url(webhook_url)?;
        }

        let url = self.endpoint(&["api", "tasks"])?;
        debug!(url = %url, webhook = request.webhook_url.is_some(), "POST task");

        let response = self
            .inner
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        decode_json(check_status(response).await?).await
    }

    /// Switch the backend between mock and online search.
    pub async fn set_search_mode(&self, mode: SearchMode) -> Result<SearchMode, ClientError> {
        let url = self.endpoint(&["api", "config", "search_mode"])?;
        debug!(url = %url, mode = %mode, "POST search mode");

        let response = self
            .inner
            .post(url)
            .json(&SearchModeBody { mode })
            .send()
            .await
            .map_err(transport)?;

        let body: SearchModeBody = decode_json(check_status(response).await?).await?;
        Ok(body.mode)
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidInput(format!("base URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidInput(format!("base URL '{}' cannot have a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl TaskFetcher for HttpClient {
    async fn fetch(&self, task_id: &TaskId, token: &str) -> Result<Task, ClientError> {
        self.get_task(task_id, token).await
    }
}

/// Check that a webhook URL is absolute with a scheme and host.
pub fn validate_webhook_url(raw: &str) -> Result<(), ClientError> {
    let invalid = || ClientError::InvalidInput(format!("invalid webhook URL '{}'", raw));
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if url.scheme().is_empty() || url.host_str().map_or(true, str::is_empty) {
        return Err(invalid());
    }
    Ok(())
}

fn transport(e: reqwest::Error) -> ClientError {
    ClientError::TransportError(e.to_string())
}

/// Classify a response by status code.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // The backend explains failures in an `{"error": ...}` body.
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %body, "Request rejected");

    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }

    Err(ClientError::RequestFailed {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

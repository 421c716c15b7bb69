//! Task record and webhook delivery types.
//!
//! These mirror the JSON body returned by `GET /api/tasks/{id}`. Every field
//! the backend may omit is optional, and unknown fields are ignored. Text
//! fields the backend sends as `null` decode to their defaults, so one odd
//! nested value never fails the whole task.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{TaskId, TaskStatus};

/// Snapshot of a Task as observed by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Backend-assigned identifier.
    pub id: TaskId,

    /// Current task status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,

    /// Task description as submitted.
    #[serde(default)]
    pub description: Option<String>,

    /// Submitting user, if the backend reports one.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Creation time, ISO 8601.
    #[serde(default)]
    pub created_at: Option<String>,

    /// Completion time, ISO 8601.
    #[serde(default)]
    pub completed_at: Option<String>,

    /// Task output. Usually a string, sometimes already structured.
    #[serde(default)]
    pub result: Option<Value>,

    /// Callback URL notified on completion.
    #[serde(default)]
    pub webhook_url: Option<String>,

    #[serde(default)]
    pub metadata: Option<TaskMetadata>,

    #[serde(default)]
    pub webhook_status: Option<WebhookStatus>,
}

impl Task {
    /// Create a bare pending Task (mostly useful for testing).
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            status: TaskStatus::Pending,
            description: None,
            user_id: None,
            created_at: None,
            completed_at: None,
            result: None,
            webhook_url: None,
            metadata: None,
            webhook_status: None,
        }
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: impl Into<TaskStatus>) -> Self {
        self.status = status.into();
        self
    }

    /// Builder method to set a string result.
    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(Value::String(result.into()));
        self
    }

    /// The result payload as text.
    ///
    /// Returns `None` when absent or null. Non-string JSON values are
    /// serialized back to compact JSON so they go through the same decoding
    /// as string-encoded payloads.
    pub fn result_text(&self) -> Option<String> {
        match self.result.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Webhook delivery outcome recorded in the task metadata.
    pub fn webhook_delivery(&self) -> Option<&WebhookDelivery> {
        self.metadata.as_ref()?.webhook_delivery.as_ref()
    }
}

/// Free-form task metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskMetadata {
    /// Outcome of the last webhook delivery attempt.
    #[serde(default)]
    pub webhook_delivery: Option<WebhookDelivery>,

    /// Any other metadata keys the backend stores.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of a webhook delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookDelivery {
    /// `"success"` or a failure-like value. Empty when the backend omits it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    /// Payload sent to the webhook URL.
    #[serde(default)]
    pub last_payload: Option<Value>,

    /// Response from the webhook endpoint, if one was received.
    #[serde(default)]
    pub response: Option<WebhookResponse>,

    /// Error raised while delivering, if any.
    #[serde(default)]
    pub error: Option<WebhookError>,
}

impl WebhookDelivery {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// HTTP response received from a webhook endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_text: String,
}

/// Error raised during webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookError {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub error_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Webhook retry bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookStatus {
    #[serde(default)]
    pub last_attempt: Option<String>,
    #[serde(default)]
    pub retries: Option<u32>,
}

/// Decode `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_task() {
        let task: Task = serde_json::from_value(json!({"id": "t1"})).unwrap();
        assert_eq!(task.id.as_str(), "t1");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.result_text().is_none());
        assert!(task.webhook_delivery().is_none());
    }

    #[test]
    fn test_deserialize_full_task() {
        let task: Task = serde_json::from_value(json!({
            "id": "t2",
            "description": "Analyze trends",
            "status": "completed",
            "result": "{\"result\": 1}",
            "created_at": "2024-03-01T10:00:00.123456",
            "completed_at": null,
            "webhook_url": "https://example.com/hook",
            "metadata": {
                "token": "abc",
                "webhook_delivery": {
                    "status": "failed",
                    "error": {"type": "ConnectionError", "message": "refused"}
                }
            },
            "webhook_status": {"last_attempt": "2024-03-01T10:05:00", "retries": 2},
            "unexpected": true
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.completed_at.is_none());
        let delivery = task.webhook_delivery().unwrap();
        assert!(!delivery.is_success());
        assert_eq!(delivery.error.as_ref().unwrap().error_type, "ConnectionError");
        let metadata = task.metadata.as_ref().unwrap();
        assert_eq!(metadata.extra.get("token"), Some(&json!("abc")));
        assert_eq!(task.webhook_status.as_ref().unwrap().retries, Some(2));
    }

    #[test]
    fn test_result_text_of_structured_value() {
        let mut task = Task::new("t3");
        task.result = Some(json!({"result": "ok"}));
        assert_eq!(task.result_text().as_deref(), Some(r#"{"result":"ok"}"#));

        task.result = Some(Value::Null);
        assert!(task.result_text().is_none());
    }

    #[test]
    fn test_null_status_falls_back_to_pending() {
        let task: Task = serde_json::from_value(json!({"id": "t4", "status": null})).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn test_deserialize_sparse_webhook_delivery() {
        let task: Task = serde_json::from_value(json!({
            "id": "t5",
            "status": "failed",
            "metadata": {
                "webhook_delivery": {
                    "response": {"status_code": null, "response_text": null},
                    "error": {"type": null, "message": null}
                }
            }
        }))
        .unwrap();

        let delivery = task.webhook_delivery().unwrap();
        assert_eq!(delivery.status, "");
        assert!(!delivery.is_success());
        let response = delivery.response.as_ref().unwrap();
        assert_eq!(response.status_code, None);
        assert_eq!(response.response_text, "");
        let error = delivery.error.as_ref().unwrap();
        assert_eq!(error.error_type, "");
        assert_eq!(error.message, "");
    }

    #[test]
    fn test_deserialize_null_delivery_status() {
        let task: Task = serde_json::from_value(json!({
            "id": "t6",
            "metadata": {"webhook_delivery": {"status": null, "error": {"type": "Timeout"}}}
        }))
        .unwrap();

        let delivery = task.webhook_delivery().unwrap();
        assert_eq!(delivery.status, "");
        assert_eq!(delivery.error.as_ref().unwrap().error_type, "Timeout");
        assert_eq!(delivery.error.as_ref().unwrap().message, "");
    }
}

//! Projection of a Task snapshot into display text.

use chrono::FixedOffset;
use serde::Serialize;
use tracing::trace;

use crate::decode::{decode_result, pretty, ResultEncoding};
use crate::time::format_timestamp;
use crate::{BadgeStyle, Task, TaskId, WebhookDelivery};

pub const NOT_COMPLETED: &str = "Not completed";
pub const UNKNOWN_TIME: &str = "Unknown";
pub const NO_WEBHOOK_URL: &str = "No webhook URL configured";
pub const NOT_ATTEMPTED: &str = "Not attempted";
pub const NO_PAYLOAD: &str = "No payload available";
pub const NO_RESPONSE: &str = "No response available";
pub const NO_ATTEMPTS: &str = "No attempts";
pub const UNKNOWN_DELIVERY_STATUS: &str = "unknown";

/// Everything the task detail view displays, one field per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDisplayModel {
    pub task_id: TaskId,
    pub status_label: String,
    pub status_style: BadgeStyle,
    pub created_display: String,
    pub completed_display: String,
    pub webhook_url_display: String,
    pub webhook_delivery: WebhookDeliverySummary,
    pub webhook_last_attempt_display: String,
    pub webhook_retries_display: String,
    pub result_display: String,
    pub logs_display: String,
    /// Encoding the result was decoded from.
    #[serde(skip)]
    pub result_encoding: ResultEncoding,
}

/// Webhook delivery outcome as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookDeliverySummary {
    pub status_text: String,
    pub status_style: BadgeStyle,
    pub payload_display: String,
    pub response_display: String,
}

impl WebhookDeliverySummary {
    /// Summary for a task whose webhook was never attempted.
    pub fn not_attempted() -> Self {
        Self {
            status_text: NOT_ATTEMPTED.to_string(),
            status_style: BadgeStyle::Secondary,
            payload_display: NO_PAYLOAD.to_string(),
            response_display: NO_RESPONSE.to_string(),
        }
    }

    fn from_delivery(delivery: &WebhookDelivery) -> Self {
        let status_style = if delivery.is_success() {
            BadgeStyle::Success
        } else {
            BadgeStyle::Danger
        };

        // A response wins over an error when the backend sends both.
        let response_display = if let Some(response) = &delivery.response {
            let code = response
                .status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("Status Code: {}\n\nResponse:\n{}", code, response.response_text)
        } else if let Some(error) = &delivery.error {
            format!(
                "Error Type: {}\n\nError Message:\n{}",
                error.error_type, error.message
            )
        } else {
            NO_RESPONSE.to_string()
        };

        let payload_display = match &delivery.last_payload {
            Some(payload) if !payload.is_null() => pretty(payload),
            _ => NO_PAYLOAD.to_string(),
        };

        let status_text = if delivery.status.is_empty() {
            UNKNOWN_DELIVERY_STATUS.to_string()
        } else {
            delivery.status.clone()
        };

        Self {
            status_text,
            status_style,
            payload_display,
            response_display,
        }
    }
}

/// Turns Task snapshots into [`TaskDisplayModel`]s.
///
/// Projection is total: every Task shape produces a model, and malformed
/// result payloads degrade to verbatim text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskDetailProjector {
    offset: Option<FixedOffset>,
}

impl TaskDetailProjector {
    /// Projector that formats timestamps in the viewer's local zone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Projector that formats timestamps at a fixed UTC offset.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    /// Format a raw timestamp the way this projector displays them.
    pub fn format_time(&self, raw: &str) -> String {
        format_timestamp(raw, self.offset)
    }

    pub fn project(&self, task: &Task) -> TaskDisplayModel {
        let decoded = decode_result(task.result_text().as_deref());

        let webhook_delivery = task
            .webhook_delivery()
            .map(WebhookDeliverySummary::from_delivery)
            .unwrap_or_else(WebhookDeliverySummary::not_attempted);

        let webhook_status = task.webhook_status.as_ref();

        trace!(
            task_id = %task.id,
            encoding = ?decoded.encoding,
            webhook_attempted = task.webhook_delivery().is_some(),
            "Projecting task detail"
        );

        TaskDisplayModel {
            task_id: task.id.clone(),
            status_label: task.status.as_str().to_string(),
            status_style: task.status.badge(),
            created_display: task
                .created_at
                .as_deref()
                .map(|t| self.format_time(t))
                .unwrap_or_else(|| UNKNOWN_TIME.to_string()),
            completed_display: task
                .completed_at
                .as_deref()
                .map(|t| self.format_time(t))
                .unwrap_or_else(|| NOT_COMPLETED.to_string()),
            webhook_url_display: task
                .webhook_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .unwrap_or(NO_WEBHOOK_URL)
                .to_string(),
            webhook_delivery,
            webhook_last_attempt_display: webhook_status
                .and_then(|s| s.last_attempt.as_deref())
                .map(|t| self.format_time(t))
                .unwrap_or_else(|| NO_ATTEMPTS.to_string()),
            webhook_retries_display: webhook_status
                .and_then(|s| s.retries)
                .unwrap_or(0)
                .to_string(),
            result_display: decoded.result,
            logs_display: decoded.logs,
            result_encoding: decoded.encoding,
        }
    }
}

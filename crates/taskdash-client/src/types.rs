//! Request and response bodies for the backend's REST endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskdash_core::{TaskId, TaskStatus};

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Task description.
    pub task: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// URL notified when the task completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            user_id: None,
            webhook_url: None,
        }
    }

    /// Builder method to set the submitting user.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Builder method to set the completion webhook.
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

/// Response of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTask {
    pub task_id: TaskId,
    /// Token required to read the task later.
    pub token: String,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Backend search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Canned search results.
    Mock,
    /// Live search.
    Online,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "online" => Ok(Self::Online),
            other => Err(format!("unknown search mode '{}' (expected mock or online)", other)),
        }
    }
}

/// Body of `POST /api/config/search_mode` and its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SearchModeBody {
    pub mode: SearchMode,
}

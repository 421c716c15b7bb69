//! Task status and badge styles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a Task as reported by the backend.
///
/// The backend may report values this client does not know about; those are
/// kept verbatim in [`TaskStatus::Other`] rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Task accepted but not yet picked up.
    #[default]
    Pending,
    /// Task is being processed.
    Running,
    /// Task finished successfully.
    Completed,
    /// Task finished with an error.
    Failed,
    /// Any other backend-defined status.
    Other(String),
}

impl TaskStatus {
    /// The status label exactly as the backend reports it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }

    /// Badge style for this status. Unknown statuses fall back to warning.
    pub fn badge(&self) -> BadgeStyle {
        match self {
            Self::Completed => BadgeStyle::Success,
            Self::Failed => BadgeStyle::Danger,
            _ => BadgeStyle::Warning,
        }
    }

    /// Returns true if the task will not change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual style of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStyle {
    Success,
    Danger,
    Warning,
    /// Neutral style, used when nothing has happened yet.
    Secondary,
}

impl BadgeStyle {
    /// CSS class used by the web dashboard for this style.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "bg-success",
            Self::Danger => "bg-danger",
            Self::Warning => "bg-warning",
            Self::Secondary => "bg-secondary",
        }
    }
}

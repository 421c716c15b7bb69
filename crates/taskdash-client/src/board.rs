//! Task board: the list of every task this client holds a token for.
//!
//! A refresh re-fetches every task and builds a whole new snapshot. Callers
//! only ever see complete snapshots, never a half-refreshed board.

use chrono::{DateTime, Utc};
use tracing::debug;

use taskdash_core::{BadgeStyle, TaskDetailProjector, TaskId};

use crate::error::ClientError;
use crate::http::TaskFetcher;
use crate::store::TokenStore;

/// Longest description shown on the board.
const DESCRIPTION_WIDTH: usize = 48;

/// One line of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub task_id: TaskId,
    pub status_label: String,
    pub status_style: BadgeStyle,
    pub created_display: String,
    pub description: String,
    /// Why the task could not be fetched, if it could not.
    pub error: Option<String>,
}

impl BoardRow {
    fn unavailable(task_id: TaskId, error: &ClientError) -> Self {
        Self {
            task_id,
            status_label: "unavailable".to_string(),
            status_style: BadgeStyle::Secondary,
            created_display: String::new(),
            description: String::new(),
            error: Some(error.to_string()),
        }
    }
}

/// A status transition between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: TaskId,
    /// Previous status, `None` if the task is new on the board.
    pub from: Option<String>,
    pub to: String,
}

/// Complete board state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub rows: Vec<BoardRow>,
    pub refreshed_at: DateTime<Utc>,
}

impl BoardSnapshot {
    pub fn get(&self, task_id: &TaskId) -> Option<&BoardRow> {
        self.rows.iter().find(|r| &r.task_id == task_id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Status transitions from `previous` to this snapshot.
    pub fn changes(&self, previous: &BoardSnapshot) -> Vec<StatusChange> {
        self.rows
            .iter()
            .filter_map(|row| {
                let before = previous.get(&row.task_id).map(|r| r.status_label.clone());
                if before.as_deref() == Some(row.status_label.as_str()) {
                    return None;
                }
                Some(StatusChange {
                    task_id: row.task_id.clone(),
                    from: before,
                    to: row.status_label.clone(),
                })
            })
            .collect()
    }
}

/// Builds board snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskBoard {
    projector: TaskDetailProjector,
}

impl TaskBoard {
    pub fn new(projector: TaskDetailProjector) -> Self {
        Self { projector }
    }

    /// Fetch every stored task and build a fresh snapshot.
    ///
    /// Per-task failures become `unavailable` rows; only a token store
    /// failure fails the whole refresh.
    pub async fn refresh<F, S>(&self, fetcher: &F, store: &S) -> Result<BoardSnapshot, ClientError>
    where
        F: TaskFetcher + ?Sized,
        S: TokenStore + ?Sized,
    {
        let entries = store.entries()?;
        let mut rows = Vec::with_capacity(entries.len());

        for (task_id, token) in entries {
            let row = match fetcher.fetch(&task_id, &token).await {
                Ok(task) => {
                    let model = self.projector.project(&task);
                    BoardRow {
                        task_id: model.task_id,
                        status_label: model.status_label,
                        status_style: model.status_style,
                        created_display: model.created_display,
                        description: shorten(task.description.as_deref().unwrap_or_default()),
                        error: None,
                    }
                }
                Err(e) => {
                    debug!(task_id = %task_id, error = %e, "Failed to refresh task");
                    BoardRow::unavailable(task_id, &e)
                }
            };
            rows.push(row);
        }

        debug!(tasks = rows.len(), "Board refreshed");
        Ok(BoardSnapshot {
            rows,
            refreshed_at: Utc::now(),
        })
    }
}

/// First line of `text`, cut to the board width.
fn shorten(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= DESCRIPTION_WIDTH {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(DESCRIPTION_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}

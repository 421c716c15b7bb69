//! Task detail view controller.

use tracing::debug;

use taskdash_core::{TaskDetailProjector, TaskDisplayModel, TaskId};

use crate::error::ClientError;
use crate::http::TaskFetcher;
use crate::store::TokenStore;

/// Where the detail view draws.
pub trait DetailSurface {
    /// Display a task's details.
    fn show(&mut self, model: &TaskDisplayModel);

    /// Show a user-visible notification.
    fn notify(&mut self, message: &str);
}

/// Fetches a task, projects it and hands the result to a surface.
///
/// Failures are reported through [`DetailSurface::notify`] and also returned
/// to the caller.
pub struct DetailView<S> {
    surface: S,
    projector: TaskDetailProjector,
    current: Option<TaskId>,
}

impl<S: DetailSurface> DetailView<S> {
    pub fn new(surface: S, projector: TaskDetailProjector) -> Self {
        Self {
            surface,
            projector,
            current: None,
        }
    }

    /// Task currently on display.
    pub fn current(&self) -> Option<&TaskId> {
        self.current.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Fetch and display a task.
    pub async fn open<F>(&mut self, fetcher: &F, task_id: &TaskId, token: &str) -> Result<(), ClientError>
    where
        F: TaskFetcher + ?Sized,
    {
        match fetcher.fetch(task_id, token).await {
            Ok(task) => {
                let model = self.projector.project(&task);
                debug!(task_id = %task_id, status = %model.status_label, "Showing task details");
                self.surface.show(&model);
                self.current = Some(task.id);
                Ok(())
            }
            Err(e) => Err(self.fail(task_id, e)),
        }
    }

    /// Fetch and display a task using its stored token.
    pub async fn open_with_store<F, T>(
        &mut self,
        fetcher: &F,
        store: &T,
        task_id: &TaskId,
    ) -> Result<(), ClientError>
    where
        F: TaskFetcher + ?Sized,
        T: TokenStore + ?Sized,
    {
        let token = match store.get(task_id) {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => return Err(self.fail(task_id, e.into())),
        };
        self.open(fetcher, task_id, &token).await
    }

    fn fail(&mut self, task_id: &TaskId, error: ClientError) -> ClientError {
        debug!(task_id = %task_id, error = %error, "Failed to show task details");
        self.surface.notify(&error.to_string());
        error
    }
}

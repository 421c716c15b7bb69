//! Client library for the TaskDash dashboard.
//!
//! Provides the HTTP client for the task backend, persistent task tokens,
//! the task detail view controller and the task board refresher.

pub mod board;
pub mod error;
pub mod http;
pub mod store;
pub mod types;
pub mod view;

pub use board::{BoardRow, BoardSnapshot, StatusChange, TaskBoard};
pub use error::{ClientError, StoreError};
pub use http::{HttpClient, TaskFetcher};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{CreateTaskRequest, CreatedTask, SearchMode};
pub use view::{DetailSurface, DetailView};

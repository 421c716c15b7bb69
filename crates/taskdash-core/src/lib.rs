//! TaskDash Core Domain Types
//!
//! This crate contains the client-side view of tasks reported by the
//! task-processing backend, with no dependencies on:
//! - Network/HTTP
//! - Token storage
//! - Terminal rendering
//!
//! The [`TaskDetailProjector`] turns a raw [`Task`] snapshot into a
//! [`TaskDisplayModel`] whose fields map one-to-one onto the detail view's
//! display slots.

pub mod decode;
pub mod display;
pub mod ids;
pub mod status;
pub mod task;
pub mod time;

// Re-export commonly used types
pub use decode::{decode_result, DecodedResult, ResultEncoding};
pub use display::{TaskDetailProjector, TaskDisplayModel, WebhookDeliverySummary};
pub use ids::TaskId;
pub use status::{BadgeStyle, TaskStatus};
pub use task::{Task, TaskMetadata, WebhookDelivery, WebhookError, WebhookResponse, WebhookStatus};

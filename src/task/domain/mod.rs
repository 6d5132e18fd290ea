//! Domain model for task management.
//!
//! The task domain owns validation (description limits, priority parsing),
//! tag normalization, and the storage-agnostic filter engine, while keeping
//! persistence concerns outside of the domain boundary.

mod description;
mod error;
mod filter;
mod ids;
mod priority;
mod tags;
mod task;

pub use description::{MAX_DESCRIPTION_CHARS, TaskDescription};
pub use error::TaskDomainError;
pub use filter::{
    TaskFilter, TaskOrder, TaskQuery, UpcomingWindow, compare_by_due_date, local_midnight,
};
pub use ids::TaskId;
pub use priority::Priority;
pub use tags::{Tags, tag_key};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskDraft};

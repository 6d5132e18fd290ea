//! Application services for subtasks.

mod manager;

pub use manager::{SubtaskManager, SubtaskServiceError, SubtaskServiceResult};

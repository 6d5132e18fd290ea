//! Application services for task management.

mod manager;

pub use manager::{
    CreateTaskRequest, TaskManager, TaskPatch, TaskServiceError, TaskServiceResult,
};

//! Repository port for subtask persistence.

use crate::subtask::domain::{Subtask, SubtaskDraft, SubtaskId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for subtask repository operations.
pub type SubtaskRepositoryResult<T> = Result<T, SubtaskRepositoryError>;

/// Subtask persistence contract.
pub trait SubtaskRepository: Send + Sync {
    /// Stores a new subtask and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskRepositoryError::ParentNotFound`] when the store
    /// enforces parent existence and the parent is missing.
    fn insert(&self, draft: &SubtaskDraft) -> SubtaskRepositoryResult<Subtask>;

    /// Finds a subtask by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskRepositoryError::Persistence`] when storage fails.
    fn find_by_id(&self, id: SubtaskId) -> SubtaskRepositoryResult<Option<Subtask>>;

    /// Returns the subtasks of one task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskRepositoryError::Persistence`] when storage fails.
    fn find_by_task(&self, task_id: TaskId) -> SubtaskRepositoryResult<Vec<Subtask>>;

    /// Flips the completion flag of an existing subtask.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskRepositoryError::NotFound`] when the subtask does not
    /// exist.
    fn toggle_complete(&self, id: SubtaskId, at: DateTime<Utc>) -> SubtaskRepositoryResult<Subtask>;

    /// Permanently removes a subtask.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskRepositoryError::NotFound`] when the subtask does not
    /// exist.
    fn delete(&self, id: SubtaskId) -> SubtaskRepositoryResult<()>;
}

/// Errors returned by subtask repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SubtaskRepositoryError {
    /// The subtask was not found.
    #[error("subtask not found: {0}")]
    NotFound(SubtaskId),

    /// The parent task does not exist.
    #[error("parent task not found: {0}")]
    ParentNotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SubtaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

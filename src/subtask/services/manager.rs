//! Subtask manager.

use crate::config::ManagerConfig;
use crate::observability::{
    ClassifyError, ErrorKind, NoopObserver, Operation, OperationEvent, OperationObserver,
    outcome_of,
};
use crate::subtask::{
    adapters::memory::InMemorySubtaskRepository,
    domain::{Subtask, SubtaskDescription, SubtaskDomainError, SubtaskDraft, SubtaskId},
    ports::{SubtaskRepository, SubtaskRepositoryError},
};
use crate::task::domain::TaskId;
use mockable::Clock;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Service-level errors for subtask operations.
#[derive(Debug, Error)]
pub enum SubtaskServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] SubtaskDomainError),
    /// The subtask does not exist.
    #[error("subtask not found: {0}")]
    NotFound(SubtaskId),
    /// The store rejected the subtask because its parent task is missing.
    #[error("parent task not found: {0}")]
    ParentNotFound(TaskId),
    /// The repository failed.
    #[error(transparent)]
    Storage(SubtaskRepositoryError),
}

impl From<SubtaskRepositoryError> for SubtaskServiceError {
    fn from(err: SubtaskRepositoryError) -> Self {
        match err {
            SubtaskRepositoryError::NotFound(id) => Self::NotFound(id),
            SubtaskRepositoryError::ParentNotFound(task_id) => Self::ParentNotFound(task_id),
            SubtaskRepositoryError::Persistence(_) => Self::Storage(err),
        }
    }
}

impl ClassifyError for SubtaskServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::ParentNotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for subtask service operations.
pub type SubtaskServiceResult<T> = Result<T, SubtaskServiceError>;

/// Subtask lifecycle service.
///
/// Callers check that the parent task exists before creating subtasks; only
/// stores with a foreign key reject a missing parent.
#[derive(Clone)]
pub struct SubtaskManager<R, C>
where
    R: SubtaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: ManagerConfig,
    observer: Arc<dyn OperationObserver>,
}

impl<C> SubtaskManager<InMemorySubtaskRepository, C>
where
    C: Clock + Send + Sync,
{
    /// Creates a manager that owns a fresh in-memory subtask map.
    #[must_use]
    pub fn in_memory(clock: Arc<C>) -> Self {
        Self::new(Arc::new(InMemorySubtaskRepository::new()), clock)
    }
}

impl<R, C> SubtaskManager<R, C>
where
    R: SubtaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new subtask manager over the given repository.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            config: ManagerConfig::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the operation observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn OperationObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Creates an open subtask under `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskServiceError::Validation`] for an empty or oversized
    /// description, [`SubtaskServiceError::ParentNotFound`] when the store
    /// enforces the parent and it is missing, or
    /// [`SubtaskServiceError::Storage`] when the repository fails.
    pub fn create(&self, task_id: TaskId, description: &str) -> SubtaskServiceResult<Subtask> {
        let event_chars = description.chars().count();
        self.observed(Operation::CreateSubtask, Some(event_chars), || {
            let text = SubtaskDescription::parse(description, self.config.max_description_chars())?;
            let draft = SubtaskDraft::new(task_id, text, self.clock.utc());
            let subtask = self.repository.insert(&draft)?;
            tracing::debug!(subtask_id = %subtask.id(), task_id = %task_id, "subtask created");
            Ok(subtask)
        })
    }

    /// Returns one subtask.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskServiceError::NotFound`] when the subtask does not
    /// exist or [`SubtaskServiceError::Storage`] when the repository fails.
    pub fn get_by_id(&self, id: SubtaskId) -> SubtaskServiceResult<Subtask> {
        self.repository
            .find_by_id(id)?
            .ok_or(SubtaskServiceError::NotFound(id))
    }

    /// Returns the subtasks of one task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskServiceError::Storage`] when the repository fails.
    pub fn get_by_task(&self, task_id: TaskId) -> SubtaskServiceResult<Vec<Subtask>> {
        Ok(self.repository.find_by_task(task_id)?)
    }

    /// Flips the completion flag and returns the updated subtask.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskServiceError::NotFound`] when the subtask does not
    /// exist or [`SubtaskServiceError::Storage`] when the repository fails.
    pub fn toggle_complete(&self, id: SubtaskId) -> SubtaskServiceResult<Subtask> {
        self.observed(Operation::ToggleSubtask, None, || {
            let subtask = self.repository.toggle_complete(id, self.clock.utc())?;
            tracing::debug!(subtask_id = %id, completed = subtask.is_completed(), "subtask toggled");
            Ok(subtask)
        })
    }

    /// Permanently deletes a subtask.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskServiceError::NotFound`] when the subtask does not
    /// exist or [`SubtaskServiceError::Storage`] when the repository fails.
    pub fn delete(&self, id: SubtaskId) -> SubtaskServiceResult<()> {
        self.observed(Operation::DeleteSubtask, None, || {
            self.repository.delete(id)?;
            tracing::debug!(subtask_id = %id, "subtask deleted");
            Ok(())
        })
    }

    fn observed<T>(
        &self,
        operation: Operation,
        description_chars: Option<usize>,
        run: impl FnOnce() -> SubtaskServiceResult<T>,
    ) -> SubtaskServiceResult<T> {
        let started = Instant::now();
        let result = run();
        let event = OperationEvent::new(operation, outcome_of(&result), started.elapsed());
        self.observer.observe(&match description_chars {
            Some(chars) => event.with_description_chars(chars),
            None => event,
        });
        result
    }
}

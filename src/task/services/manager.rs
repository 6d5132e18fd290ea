//! Task manager: the single entry point for task lifecycle and queries.

use crate::config::ManagerConfig;
use crate::observability::{
    ClassifyError, ErrorKind, NoopObserver, Operation, OperationEvent, OperationObserver,
    outcome_of,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        Priority, Tags, Task, TaskChanges, TaskDescription, TaskDomainError, TaskDraft,
        TaskFilter, TaskId, TaskOrder, TaskQuery, UpcomingWindow, tag_key,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner: Option<UserId>,
    description: String,
    tags: Vec<String>,
    priority: Option<Priority>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            owner: None,
            description: description.into(),
            tags: Vec::new(),
            priority: None,
            due_date: None,
        }
    }

    /// Sets the owning user. Without it the configured default owner is used.
    #[must_use]
    pub const fn for_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Sets free-text tags; they are normalized on creation.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initial priority instead of `medium`.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the initial due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update for an existing task.
///
/// Unset fields are left untouched. A description that is set is validated
/// like a new one, so setting it to an empty string is an error rather than
/// a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    description: Option<String>,
    completed: Option<bool>,
    priority: Option<Priority>,
    due_date: Option<Option<DateTime<Utc>>>,
    tags: Option<Vec<String>>,
}

impl TaskPatch {
    /// Creates a patch that changes nothing but `updated_at`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a new due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Removes the due date.
    #[must_use]
    pub const fn without_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Replaces the tags; they are normalized on update.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The repository failed.
    #[error(transparent)]
    Storage(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::Persistence(_) => Self::Storage(err),
        }
    }
}

impl ClassifyError for TaskServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task lifecycle and query service.
///
/// The storage strategy is chosen at construction: an
/// [`InMemoryTaskRepository`] for transient use or any other
/// [`TaskRepository`] for durable storage. Validation always happens here,
/// before the repository is called.
#[derive(Clone)]
pub struct TaskManager<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: ManagerConfig,
    observer: Arc<dyn OperationObserver>,
}

impl<C> TaskManager<InMemoryTaskRepository, C>
where
    C: Clock + Send + Sync,
{
    /// Creates a manager that owns a fresh in-memory task map.
    #[must_use]
    pub fn in_memory(clock: Arc<C>) -> Self {
        Self::new(Arc::new(InMemoryTaskRepository::new()), clock)
    }
}

impl<R, C> TaskManager<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task manager over the given repository.
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

    /// Creates a task with `completed = false` and normalized tags.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when the description is
    /// empty or too long, or [`TaskServiceError::Storage`] when the
    /// repository fails.
    pub fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let chars = request.description.chars().count();
        self.observed(Operation::CreateTask, Some(chars), || {
            let CreateTaskRequest {
                owner: requested_owner,
                description: raw_description,
                tags: raw_tags,
                priority: requested_priority,
                due_date: requested_due_date,
            } = request;

            let description =
                TaskDescription::parse(raw_description, self.config.max_description_chars())?;
            let owner = requested_owner.unwrap_or_else(|| self.config.default_owner());
            let mut draft =
                TaskDraft::new(owner, description, Tags::normalize(raw_tags), self.clock.utc());
            if let Some(level) = requested_priority {
                draft = draft.with_priority(level);
            }
            if let Some(due) = requested_due_date {
                draft = draft.with_due_date(due);
            }

            let task = self.repository.insert(&draft)?;
            tracing::debug!(task_id = %task.id(), owner = %task.owner(), "task created");
            Ok(task)
        })
    }

    /// Applies a partial update and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when a supplied description
    /// is invalid, [`TaskServiceError::NotFound`] when the task does not
    /// exist, or [`TaskServiceError::Storage`] when the repository fails.
    pub fn update(&self, id: TaskId, patch: TaskPatch) -> TaskServiceResult<Task> {
        let chars = patch.description.as_ref().map(|d| d.chars().count());
        self.observed(Operation::UpdateTask, chars, || {
            let changes = self.validate_patch(patch)?;
            let task = self.repository.update(id, &changes)?;
            tracing::debug!(task_id = %id, "task updated");
            Ok(task)
        })
    }

    /// Permanently deletes a task. Subtasks are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist or
    /// [`TaskServiceError::Storage`] when the repository fails.
    pub fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        self.observed(Operation::DeleteTask, None, || {
            self.repository.delete(id)?;
            tracing::debug!(task_id = %id, "task deleted");
            Ok(())
        })
    }

    /// Flips the completion flag and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist or
    /// [`TaskServiceError::Storage`] when the repository fails.
    pub fn toggle_complete(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.observed(Operation::ToggleTask, None, || {
            let task = self.repository.toggle_complete(id, self.clock.utc())?;
            tracing::debug!(task_id = %id, completed = task.is_completed(), "task toggled");
            Ok(task)
        })
    }

    /// Returns one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist or
    /// [`TaskServiceError::Storage`] when the repository fails.
    pub fn get_by_id(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(id)?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Returns every task of every owner, by ascending id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Storage`] when the repository fails.
    pub fn get_all(&self) -> TaskServiceResult<Vec<Task>> {
        self.query(&TaskQuery::all(), TaskOrder::Id)
    }

    /// Returns the tasks of one owner, by ascending id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Storage`] when the repository fails.
    pub fn get_all_for_user(&self, owner: UserId) -> TaskServiceResult<Vec<Task>> {
        self.query(&TaskQuery::all().owned_by(owner), TaskOrder::Id)
    }

    /// Returns every task satisfying the filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when the due-date interval is
    /// inverted or [`TaskServiceError::Storage`] when the repository fails.
    pub fn filter(&self, filter: &TaskFilter) -> TaskServiceResult<Vec<Task>> {
        filter.validate()?;
        self.query(&TaskQuery::from_filter(filter.clone()), filter.order())
    }

    /// Returns the tasks of one owner satisfying the filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when the due-date interval is
    /// inverted or [`TaskServiceError::Storage`] when the repository fails.
    pub fn filter_for_user(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        filter.validate()?;
        let query = TaskQuery::from_filter(filter.clone()).owned_by(owner);
        self.query(&query, filter.order())
    }

    /// Returns open tasks due between the start of today and the end of the
    /// day `days` days from now, soonest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Storage`] when the repository fails.
    pub fn upcoming_within_days(&self, days: u32) -> TaskServiceResult<Vec<Task>> {
        let window = UpcomingWindow::starting(self.clock.local().date_naive(), days);
        let candidates = TaskFilter::new()
            .with_completed(false)
            .due_from(window.start())
            .due_to(window.end());
        let mut tasks = self.repository.find(&TaskQuery::from_filter(candidates))?;
        tasks.retain(|task| task.due_date().is_some_and(|due| window.contains(due)));
        TaskOrder::DueDate.sort(&mut tasks);
        Ok(tasks)
    }

    /// Returns the distinct tags across all tasks, alphabetically.
    ///
    /// Tags differing only in case are reported once, in the form found on
    /// the lowest task id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Storage`] when the repository fails.
    pub fn all_tags(&self) -> TaskServiceResult<Vec<String>> {
        let tasks = self.query(&TaskQuery::all(), TaskOrder::Id)?;
        let mut seen = HashSet::new();
        let mut tags: Vec<String> = tasks
            .iter()
            .flat_map(|task| task.tags().iter())
            .filter(|tag| seen.insert(tag_key(tag)))
            .cloned()
            .collect();
        tags.sort_by_cached_key(|tag| (tag_key(tag), tag.clone()));
        Ok(tags)
    }

    /// Moves every task owned by `from` to `to`; used once when a legacy
    /// owner's tasks are adopted by a real user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Storage`] when the repository fails.
    pub fn reassign_owner(&self, from: UserId, to: UserId) -> TaskServiceResult<u64> {
        self.observed(Operation::ReassignTasks, None, || {
            let moved = self.repository.reassign_owner(from, to, self.clock.utc())?;
            tracing::info!(%from, %to, moved, "tasks reassigned");
            Ok(moved)
        })
    }

    fn query(&self, query: &TaskQuery, order: TaskOrder) -> TaskServiceResult<Vec<Task>> {
        let mut tasks = self.repository.find(query)?;
        order.sort(&mut tasks);
        Ok(tasks)
    }

    fn validate_patch(&self, patch: TaskPatch) -> TaskServiceResult<TaskChanges> {
        let TaskPatch {
            description,
            completed,
            priority,
            due_date,
            tags,
        } = patch;

        let mut changes = TaskChanges::new(self.clock.utc());
        if let Some(text) = description {
            changes = changes.with_description(TaskDescription::parse(
                text,
                self.config.max_description_chars(),
            )?);
        }
        if let Some(flag) = completed {
            changes = changes.with_completed(flag);
        }
        if let Some(level) = priority {
            changes = changes.with_priority(level);
        }
        if let Some(due) = due_date {
            changes = changes.with_due_date(due);
        }
        if let Some(raw_tags) = tags {
            changes = changes.with_tags(Tags::normalize(raw_tags));
        }
        Ok(changes)
    }

    fn observed<T>(
        &self,
        operation: Operation,
        description_chars: Option<usize>,
        run: impl FnOnce() -> TaskServiceResult<T>,
    ) -> TaskServiceResult<T> {
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

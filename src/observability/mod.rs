//! Metrics-observation seam for manager operations.
//!
//! Managers report the outcome and latency of every mutating operation to an
//! injected [`OperationObserver`]. The crate ships a no-op observer and an
//! in-process aggregator; exporting to a concrete metrics backend belongs to
//! the embedding application.

mod counters;

pub use counters::{DESCRIPTION_LENGTH_BUCKETS, OperationCounters, OperationTally};

use std::fmt;
use std::time::Duration;

/// Coarse error classification shared by all managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// Input was rejected.
    Validation,
    /// The targeted record does not exist.
    NotFound,
    /// The request collides with an existing identity.
    Conflict,
    /// The storage backend failed.
    Storage,
}

/// Mutating operations reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// A task was created.
    CreateTask,
    /// A task was updated.
    UpdateTask,
    /// A task was deleted.
    DeleteTask,
    /// A task's completion flag was toggled.
    ToggleTask,
    /// Tasks were moved from one owner to another.
    ReassignTasks,
    /// A subtask was created.
    CreateSubtask,
    /// A subtask's completion flag was toggled.
    ToggleSubtask,
    /// A subtask was deleted.
    DeleteSubtask,
    /// A user was created.
    CreateUser,
    /// A user was updated.
    UpdateUser,
}

impl Operation {
    /// Returns a stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
            Self::ToggleTask => "toggle_task",
            Self::ReassignTasks => "reassign_tasks",
            Self::CreateSubtask => "create_subtask",
            Self::ToggleSubtask => "toggle_subtask",
            Self::DeleteSubtask => "delete_subtask",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an observed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation succeeded.
    Success,
    /// The operation failed with the given kind of error.
    Failure(ErrorKind),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One observed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationEvent {
    /// Which operation ran.
    pub operation: Operation,
    /// How it ended.
    pub outcome: Outcome,
    /// Wall-clock time spent in the manager, including storage.
    pub elapsed: Duration,
    /// Description length in characters, for operations that carry one.
    pub description_chars: Option<usize>,
}

impl OperationEvent {
    /// Creates an event without a description length.
    #[must_use]
    pub const fn new(operation: Operation, outcome: Outcome, elapsed: Duration) -> Self {
        Self {
            operation,
            outcome,
            elapsed,
            description_chars: None,
        }
    }

    /// Attaches a description length.
    #[must_use]
    pub const fn with_description_chars(mut self, chars: usize) -> Self {
        self.description_chars = Some(chars);
        self
    }
}

/// Receives operation events from managers.
pub trait OperationObserver: Send + Sync {
    /// Records one event. Implementations must not block for long.
    fn observe(&self, event: &OperationEvent);
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl OperationObserver for NoopObserver {
    fn observe(&self, _event: &OperationEvent) {}
}

/// Classifies an error for observers.
pub trait ClassifyError {
    /// Returns the error's kind.
    fn kind(&self) -> ErrorKind;
}

/// Builds the outcome of a finished operation.
pub fn outcome_of<T, E: ClassifyError>(result: &Result<T, E>) -> Outcome {
    match result {
        Ok(_) => Outcome::Success,
        Err(err) => Outcome::Failure(err.kind()),
    }
}

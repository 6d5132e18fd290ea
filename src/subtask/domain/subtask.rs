//! Subtask aggregate.

use super::{SubtaskDomainError, SubtaskId};
use crate::task::domain::{MAX_DESCRIPTION_CHARS, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated subtask description.
///
/// Deserialization validates against [`MAX_DESCRIPTION_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubtaskDescription(String);

impl SubtaskDescription {
    /// Validates a description against a character limit.
    ///
    /// # Errors
    ///
    /// Returns [`SubtaskDomainError::EmptyDescription`] for blank input or
    /// [`SubtaskDomainError::DescriptionTooLong`] past `max_chars`.
    pub fn parse(value: impl Into<String>, max_chars: usize) -> Result<Self, SubtaskDomainError> {
        let text = value.into();
        if text.trim().is_empty() {
            return Err(SubtaskDomainError::EmptyDescription);
        }
        let length = text.chars().count();
        if length > max_chars {
            return Err(SubtaskDomainError::DescriptionTooLong {
                length,
                max: max_chars,
            });
        }
        Ok(Self(text))
    }

    /// Returns the description text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubtaskDescription {
    type Error = SubtaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value, MAX_DESCRIPTION_CHARS)
    }
}

impl From<SubtaskDescription> for String {
    fn from(description: SubtaskDescription) -> Self {
        description.0
    }
}

/// Checklist item belonging to one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtask {
    id: SubtaskId,
    task_id: TaskId,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted subtask.
#[derive(Debug, Clone)]
pub struct PersistedSubtaskData {
    /// Subtask identifier.
    pub id: SubtaskId,
    /// Parent task.
    pub task_id: TaskId,
    /// Description text.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Subtask {
    /// Reconstructs a subtask from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSubtaskData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            description: data.description,
            completed: data.completed,
            created_at: data.created_at,
            updated_at: data.updated_at.max(data.created_at),
        }
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubtaskId {
        self.id
    }

    /// Returns the parent task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the subtask is done.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Flips the completion flag.
    pub fn toggle_complete(&mut self, at: DateTime<Utc>) {
        self.completed = !self.completed;
        self.updated_at = at.max(self.created_at);
    }
}

/// A subtask that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskDraft {
    task_id: TaskId,
    description: SubtaskDescription,
    created_at: DateTime<Utc>,
}

impl SubtaskDraft {
    /// Creates a draft under a parent task.
    #[must_use]
    pub const fn new(task_id: TaskId, description: SubtaskDescription, created_at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            description,
            created_at,
        }
    }

    /// Returns the parent task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the validated description.
    #[must_use]
    pub const fn description(&self) -> &SubtaskDescription {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Materializes the draft under an assigned identifier.
    #[must_use]
    pub fn into_subtask(self, id: SubtaskId) -> Subtask {
        Subtask {
            id,
            task_id: self.task_id,
            description: self.description.0,
            completed: false,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

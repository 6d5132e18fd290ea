//! Task aggregate root and the values used to create and change it.

use super::{Priority, Tags, TaskDescription, TaskId};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    description: String,
    completed: bool,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    tags: Tags,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning user.
    pub owner: UserId,
    /// Persisted description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted tags.
    pub tags: Tags,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            description: data.description,
            completed: data.completed,
            priority: data.priority,
            due_date: data.due_date,
            tags: data.tags,
            created_at: data.created_at,
            updated_at: data.updated_at.max(data.created_at),
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` when the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, or `None` when the task has no due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the normalized tags.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies validated changes and refreshes `updated_at`.
    pub fn apply(&mut self, changes: &TaskChanges) {
        if let Some(description) = &changes.description {
            description.as_str().clone_into(&mut self.description);
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(tags) = &changes.tags {
            self.tags = tags.clone();
        }
        self.touch(changes.updated_at);
    }

    /// Flips the completion flag.
    pub fn toggle_complete(&mut self, at: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(at);
    }

    /// Moves the task to another owner.
    pub fn reassign(&mut self, owner: UserId, at: DateTime<Utc>) {
        self.owner = owner;
        self.touch(at);
    }

    /// Refreshes `updated_at`, never moving it before `created_at`.
    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at.max(self.created_at);
    }
}

/// Validated values for a task that has not been stored yet.
///
/// Repositories turn a draft into a [`Task`] by assigning an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    owner: UserId,
    description: TaskDescription,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    tags: Tags,
    created_at: DateTime<Utc>,
}

impl TaskDraft {
    /// Creates a draft with medium priority and no due date.
    #[must_use]
    pub fn new(
        owner: UserId,
        description: TaskDescription,
        tags: Tags,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            owner,
            description,
            priority: Priority::default(),
            due_date: None,
            tags,
            created_at,
        }
    }

    /// Sets the initial priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the initial due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the initial priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the initial due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the normalized tags.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Builds the stored task under the given identifier.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            owner: self.owner,
            description: self.description.into_inner(),
            completed: false,
            priority: self.priority,
            due_date: self.due_date,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Validated partial update for an existing task.
///
/// Each field is either left untouched (`None`) or replaced. The due date
/// distinguishes "leave untouched" from "clear" from "set".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    description: Option<TaskDescription>,
    completed: Option<bool>,
    priority: Option<Priority>,
    due_date: Option<Option<DateTime<Utc>>>,
    tags: Option<Tags>,
    updated_at: DateTime<Utc>,
}

impl TaskChanges {
    /// Creates an empty change set stamped with the modification time.
    #[must_use]
    pub const fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            description: None,
            completed: None,
            priority: None,
            due_date: None,
            tags: None,
            updated_at,
        }
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: TaskDescription) -> Self {
        self.description = Some(description);
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

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Returns the modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

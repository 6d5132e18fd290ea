//! Diesel row models for task persistence.

use super::schema::tasks;
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Owning user identifier.
    pub user_id: i64,
    /// Task description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority.
    pub priority: String,
    /// Optional due date in microseconds.
    pub due_date: Option<i64>,
    /// Tags JSON payload.
    pub tags: String,
    /// Creation timestamp in microseconds.
    pub created_at: i64,
    /// Last update timestamp in microseconds.
    pub updated_at: i64,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning user identifier.
    pub user_id: i64,
    /// Task description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority.
    pub priority: String,
    /// Optional due date in microseconds.
    pub due_date: Option<i64>,
    /// Tags JSON payload.
    pub tags: String,
    /// Creation timestamp in microseconds.
    pub created_at: i64,
    /// Last update timestamp in microseconds.
    pub updated_at: i64,
}

/// Full-row changeset written after a read-modify-write cycle.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangesetRow {
    /// Owning user identifier.
    pub user_id: i64,
    /// Task description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority.
    pub priority: String,
    /// Optional due date in microseconds.
    pub due_date: Option<i64>,
    /// Tags JSON payload.
    pub tags: String,
    /// Last update timestamp in microseconds.
    pub updated_at: i64,
}

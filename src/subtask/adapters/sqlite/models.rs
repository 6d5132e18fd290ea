//! Diesel row models for subtask persistence.

use super::schema::subtasks;
use diesel::prelude::*;

/// Query result row for subtask records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subtasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubtaskRow {
    pub id: i64,
    pub task_id: i64,
    pub description: String,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Insert model for subtask records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subtasks)]
pub struct NewSubtaskRow {
    pub task_id: i64,
    pub description: String,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

//! `SQLite` repository implementation for subtask storage.

use super::{
    models::{NewSubtaskRow, SubtaskRow},
    schema::subtasks,
};
use crate::storage::{SqlitePool, from_micros, id_from_key, key_from_id, to_micros};
use crate::subtask::{
    domain::{PersistedSubtaskData, Subtask, SubtaskDraft, SubtaskId},
    ports::{SubtaskRepository, SubtaskRepositoryError, SubtaskRepositoryResult},
};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

/// `SQLite`-backed subtask repository.
///
/// The parent task is enforced by a foreign key, and deleting a task removes
/// its subtasks.
#[derive(Debug, Clone)]
pub struct SqliteSubtaskRepository {
    pool: SqlitePool,
}

impl SqliteSubtaskRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> SubtaskRepositoryResult<T>,
    ) -> SubtaskRepositoryResult<T> {
        let mut connection = self
            .pool
            .get()
            .map_err(SubtaskRepositoryError::persistence)?;
        f(&mut connection)
    }
}

impl From<DieselError> for SubtaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl SubtaskRepository for SqliteSubtaskRepository {
    fn insert(&self, draft: &SubtaskDraft) -> SubtaskRepositoryResult<Subtask> {
        let created_at = to_micros(draft.created_at());
        let new_row = NewSubtaskRow {
            task_id: key_from_id(draft.task_id().value()),
            description: draft.description().as_str().to_owned(),
            completed: false,
            created_at,
            updated_at: created_at,
        };
        self.with_connection(|connection| {
            let row = diesel::insert_into(subtasks::table)
                .values(&new_row)
                .returning(SubtaskRow::as_returning())
                .get_result::<SubtaskRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        SubtaskRepositoryError::ParentNotFound(draft.task_id())
                    }
                    _ => SubtaskRepositoryError::persistence(err),
                })?;
            row_to_subtask(row)
        })
    }

    fn find_by_id(&self, id: SubtaskId) -> SubtaskRepositoryResult<Option<Subtask>> {
        self.with_connection(|connection| {
            let row = subtasks::table
                .find(key_from_id(id.value()))
                .select(SubtaskRow::as_select())
                .first::<SubtaskRow>(connection)
                .optional()?;
            row.map(row_to_subtask).transpose()
        })
    }

    fn find_by_task(&self, task_id: TaskId) -> SubtaskRepositoryResult<Vec<Subtask>> {
        self.with_connection(|connection| {
            subtasks::table
                .filter(subtasks::task_id.eq(key_from_id(task_id.value())))
                .order(subtasks::id.asc())
                .select(SubtaskRow::as_select())
                .load::<SubtaskRow>(connection)?
                .into_iter()
                .map(row_to_subtask)
                .collect()
        })
    }

    fn toggle_complete(
        &self,
        id: SubtaskId,
        at: DateTime<Utc>,
    ) -> SubtaskRepositoryResult<Subtask> {
        // Flipped in SQL so concurrent toggles cannot read a stale flag.
        self.with_connection(|connection| {
            let row = diesel::update(subtasks::table.find(key_from_id(id.value())))
                .set((
                    subtasks::completed.eq(diesel::dsl::not(subtasks::completed)),
                    subtasks::updated_at.eq(to_micros(at)),
                ))
                .returning(SubtaskRow::as_returning())
                .get_result::<SubtaskRow>(connection)
                .optional()?
                .ok_or(SubtaskRepositoryError::NotFound(id))?;
            row_to_subtask(row)
        })
    }

    fn delete(&self, id: SubtaskId) -> SubtaskRepositoryResult<()> {
        self.with_connection(|connection| {
            let deleted = diesel::delete(subtasks::table.find(key_from_id(id.value())))
                .execute(connection)?;
            if deleted == 0 {
                return Err(SubtaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
    }
}

fn row_to_subtask(row: SubtaskRow) -> SubtaskRepositoryResult<Subtask> {
    let SubtaskRow {
        id,
        task_id,
        description,
        completed,
        created_at,
        updated_at,
    } = row;

    let data = PersistedSubtaskData {
        id: SubtaskId::new(id_from_key(id).map_err(SubtaskRepositoryError::persistence)?),
        task_id: TaskId::new(id_from_key(task_id).map_err(SubtaskRepositoryError::persistence)?),
        description,
        completed,
        created_at: from_micros(created_at).map_err(SubtaskRepositoryError::persistence)?,
        updated_at: from_micros(updated_at).map_err(SubtaskRepositoryError::persistence)?,
    };
    Ok(Subtask::from_persisted(data))
}

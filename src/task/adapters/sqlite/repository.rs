//! `SQLite` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangesetRow, TaskRow},
    schema::tasks,
};
use crate::storage::{SqlitePool, from_micros, id_from_key, key_from_id, to_micros};
use crate::task::{
    domain::{PersistedTaskData, Priority, Tags, Task, TaskChanges, TaskDraft, TaskId, TaskQuery},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;

/// `SQLite`-backed task repository.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> TaskRepositoryResult<T>,
    ) -> TaskRepositoryResult<T> {
        let mut connection = self.pool.get().map_err(TaskRepositoryError::persistence)?;
        f(&mut connection)
    }

    /// Reads a task, mutates it, and writes it back inside one immediate
    /// transaction so concurrent writers cannot interleave.
    fn modify(&self, id: TaskId, mutate: impl FnOnce(&mut Task)) -> TaskRepositoryResult<Task> {
        self.with_connection(|connection| {
            connection.immediate_transaction(|tx| {
                let key = key_from_id(id.value());
                let mut task = tasks::table
                    .find(key)
                    .select(TaskRow::as_select())
                    .first::<TaskRow>(tx)
                    .optional()?
                    .map(row_to_task)
                    .transpose()?
                    .ok_or(TaskRepositoryError::NotFound(id))?;
                mutate(&mut task);
                let row = diesel::update(tasks::table.find(key))
                    .set(&to_changeset(&task)?)
                    .returning(TaskRow::as_returning())
                    .get_result::<TaskRow>(tx)?;
                row_to_task(row)
            })
        })
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl TaskRepository for SqliteTaskRepository {
    fn insert(&self, draft: &TaskDraft) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(draft)?;
        self.with_connection(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)?;
            row_to_task(row)
        })
    }

    fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.with_connection(|connection| {
            let row = tasks::table
                .find(key_from_id(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
    }

    fn find(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let filter = query.filter();
        let mut statement = tasks::table.select(TaskRow::as_select()).into_boxed();
        if let Some(owner) = query.owner() {
            statement = statement.filter(tasks::user_id.eq(key_from_id(owner.value())));
        }
        if let Some(completed) = filter.completed() {
            statement = statement.filter(tasks::completed.eq(completed));
        }
        if let Some(priority) = filter.priority() {
            statement = statement.filter(tasks::priority.eq(priority.as_str()));
        }
        if let Some(from) = filter.due_from_bound() {
            statement = statement.filter(tasks::due_date.ge(to_micros(from)));
        }
        if let Some(to) = filter.due_to_bound() {
            statement = statement.filter(tasks::due_date.le(to_micros(to)));
        }
        match filter.has_due_date() {
            Some(true) => statement = statement.filter(tasks::due_date.is_not_null()),
            Some(false) => statement = statement.filter(tasks::due_date.is_null()),
            None => {}
        }

        // Tag membership is case-insensitive over a JSON column, so it is
        // evaluated on decoded rows rather than in SQL.
        self.with_connection(move |connection| {
            let rows = statement.load::<TaskRow>(connection)?;
            let mut matching = Vec::with_capacity(rows.len());
            for row in rows {
                let task = row_to_task(row)?;
                if query.matches(&task) {
                    matching.push(task);
                }
            }
            Ok(matching)
        })
    }

    fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskRepositoryResult<Task> {
        self.modify(id, |task| task.apply(changes))
    }

    fn toggle_complete(&self, id: TaskId, at: DateTime<Utc>) -> TaskRepositoryResult<Task> {
        self.modify(id, |task| task.toggle_complete(at))
    }

    fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.with_connection(|connection| {
            let deleted =
                diesel::delete(tasks::table.find(key_from_id(id.value()))).execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
    }

    fn reassign_owner(
        &self,
        from: UserId,
        to: UserId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64> {
        self.with_connection(|connection| {
            let owned_by_source = tasks::table.filter(tasks::user_id.eq(key_from_id(from.value())));
            let moved = diesel::update(owned_by_source)
                .set((
                    tasks::user_id.eq(key_from_id(to.value())),
                    tasks::updated_at.eq(to_micros(at)),
                ))
                .execute(connection)?;
            Ok(u64::try_from(moved).unwrap_or(u64::MAX))
        })
    }
}

fn encode_tags(tags: &Tags) -> TaskRepositoryResult<String> {
    serde_json::to_string(tags).map_err(TaskRepositoryError::persistence)
}

fn to_new_row(draft: &TaskDraft) -> TaskRepositoryResult<NewTaskRow> {
    let created_at = to_micros(draft.created_at());
    Ok(NewTaskRow {
        user_id: key_from_id(draft.owner().value()),
        description: draft.description().as_str().to_owned(),
        completed: false,
        priority: draft.priority().as_str().to_owned(),
        due_date: draft.due_date().map(to_micros),
        tags: encode_tags(draft.tags())?,
        created_at,
        updated_at: created_at,
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangesetRow> {
    Ok(TaskChangesetRow {
        user_id: key_from_id(task.owner().value()),
        description: task.description().to_owned(),
        completed: task.is_completed(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date().map(to_micros),
        tags: encode_tags(task.tags())?,
        updated_at: to_micros(task.updated_at()),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        user_id,
        description,
        completed,
        priority: persisted_priority,
        due_date,
        tags: persisted_tags,
        created_at,
        updated_at,
    } = row;

    let priority =
        Priority::try_from(persisted_priority.as_str()).map_err(TaskRepositoryError::persistence)?;
    let tags = serde_json::from_str::<Tags>(&persisted_tags)
        .map_err(TaskRepositoryError::persistence)?;
    let data = PersistedTaskData {
        id: TaskId::new(id_from_key(id).map_err(TaskRepositoryError::persistence)?),
        owner: UserId::new(id_from_key(user_id).map_err(TaskRepositoryError::persistence)?),
        description,
        completed,
        priority,
        due_date: due_date
            .map(from_micros)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        tags,
        created_at: from_micros(created_at).map_err(TaskRepositoryError::persistence)?,
        updated_at: from_micros(updated_at).map_err(TaskRepositoryError::persistence)?,
    };
    Ok(Task::from_persisted(data))
}

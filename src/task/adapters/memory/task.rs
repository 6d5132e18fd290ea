//! In-memory repository for task storage.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::task::{
    domain::{Task, TaskChanges, TaskDraft, TaskId, TaskQuery},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;

/// Thread-safe in-memory task repository.
///
/// All state sits behind one mutex held for the duration of a single call,
/// so operations on the same task are serialized. Identifiers come from a
/// monotonic counter starting at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<Mutex<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    last_id: u64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> TaskRepositoryResult<MutexGuard<'_, InMemoryTaskState>> {
        self.state.lock().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Applies `mutate` to a stored task and returns the updated copy.
fn modify(
    state: &mut InMemoryTaskState,
    id: TaskId,
    mutate: impl FnOnce(&mut Task),
) -> TaskRepositoryResult<Task> {
    let task = state
        .tasks
        .get_mut(&id)
        .ok_or(TaskRepositoryError::NotFound(id))?;
    mutate(task);
    Ok(task.clone())
}

impl TaskRepository for InMemoryTaskRepository {
    fn insert(&self, draft: &TaskDraft) -> TaskRepositoryResult<Task> {
        let mut state = self.lock()?;
        let next = state.last_id.checked_add(1).ok_or_else(|| {
            TaskRepositoryError::persistence(std::io::Error::other("task id space exhausted"))
        })?;
        state.last_id = next;
        let task = draft.clone().into_task(TaskId::new(next));
        state.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.lock()?;
        Ok(state.tasks.get(&id).cloned())
    }

    fn find(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.lock()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect())
    }

    fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskRepositoryResult<Task> {
        let mut state = self.lock()?;
        modify(&mut state, id, |task| task.apply(changes))
    }

    fn toggle_complete(&self, id: TaskId, at: DateTime<Utc>) -> TaskRepositoryResult<Task> {
        let mut state = self.lock()?;
        modify(&mut state, id, |task| task.toggle_complete(at))
    }

    fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.lock()?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    fn reassign_owner(
        &self,
        from: UserId,
        to: UserId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64> {
        let mut state = self.lock()?;
        let mut moved = 0_u64;
        for task in state.tasks.values_mut().filter(|task| task.owner() == from) {
            task.reassign(to, at);
            moved = moved.saturating_add(1);
        }
        Ok(moved)
    }
}

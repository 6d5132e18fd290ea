//! In-memory repository for subtask storage.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::subtask::{
    domain::{Subtask, SubtaskDraft, SubtaskId},
    ports::{SubtaskRepository, SubtaskRepositoryError, SubtaskRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory subtask repository.
///
/// Parent tasks are not checked. Identifiers are monotonic from 1, so id
/// order is creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubtaskRepository {
    state: Arc<Mutex<InMemorySubtaskState>>,
}

#[derive(Debug, Default)]
struct InMemorySubtaskState {
    subtasks: BTreeMap<SubtaskId, Subtask>,
    last_id: u64,
}

impl InMemorySubtaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> SubtaskRepositoryResult<MutexGuard<'_, InMemorySubtaskState>> {
        self.state.lock().map_err(|err| {
            SubtaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl SubtaskRepository for InMemorySubtaskRepository {
    fn insert(&self, draft: &SubtaskDraft) -> SubtaskRepositoryResult<Subtask> {
        let mut state = self.lock()?;
        let next = state.last_id.checked_add(1).ok_or_else(|| {
            SubtaskRepositoryError::persistence(std::io::Error::other(
                "subtask id space exhausted",
            ))
        })?;
        state.last_id = next;
        let subtask = draft.clone().into_subtask(SubtaskId::new(next));
        state.subtasks.insert(subtask.id(), subtask.clone());
        Ok(subtask)
    }

    fn find_by_id(&self, id: SubtaskId) -> SubtaskRepositoryResult<Option<Subtask>> {
        let state = self.lock()?;
        Ok(state.subtasks.get(&id).cloned())
    }

    fn find_by_task(&self, task_id: TaskId) -> SubtaskRepositoryResult<Vec<Subtask>> {
        let state = self.lock()?;
        Ok(state
            .subtasks
            .values()
            .filter(|subtask| subtask.task_id() == task_id)
            .cloned()
            .collect())
    }

    fn toggle_complete(
        &self,
        id: SubtaskId,
        at: DateTime<Utc>,
    ) -> SubtaskRepositoryResult<Subtask> {
        let mut state = self.lock()?;
        let subtask = state
            .subtasks
            .get_mut(&id)
            .ok_or(SubtaskRepositoryError::NotFound(id))?;
        subtask.toggle_complete(at);
        Ok(subtask.clone())
    }

    fn delete(&self, id: SubtaskId) -> SubtaskRepositoryResult<()> {
        let mut state = self.lock()?;
        state
            .subtasks
            .remove(&id)
            .map(|_| ())
            .ok_or(SubtaskRepositoryError::NotFound(id))
    }
}

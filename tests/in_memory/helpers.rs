//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use rstest::fixture;
use taskkeeper::subtask::{
    adapters::memory::InMemorySubtaskRepository, services::SubtaskManager,
};
use taskkeeper::task::{adapters::memory::InMemoryTaskRepository, services::TaskManager};
use taskkeeper::user::{adapters::memory::InMemoryUserRepository, services::UserManager};

use crate::test_helpers::{FixedClock, date};

/// In-memory task manager.
pub type Tasks = TaskManager<InMemoryTaskRepository, FixedClock>;
/// In-memory subtask manager.
pub type Subtasks = SubtaskManager<InMemorySubtaskRepository, FixedClock>;
/// In-memory user manager.
pub type Users = UserManager<InMemoryUserRepository, FixedClock>;

/// One clock shared by a full set of in-memory managers.
pub struct Managers {
    pub clock: Arc<FixedClock>,
    pub tasks: Tasks,
    pub subtasks: Subtasks,
    pub users: Users,
}

/// Provides managers pinned to 2026-09-14, local noon.
#[fixture]
pub fn managers() -> Managers {
    let clock = Arc::new(FixedClock::local_noon(date(2026, 9, 14)));
    Managers {
        tasks: TaskManager::in_memory(Arc::clone(&clock)),
        subtasks: SubtaskManager::in_memory(Arc::clone(&clock)),
        users: UserManager::in_memory(Arc::clone(&clock)),
        clock,
    }
}

//! Temporary `SQLite` databases for integration tests.

use std::sync::Arc;

use rstest::fixture;
use taskkeeper::storage::{SqliteConfig, open_pool};
use taskkeeper::subtask::{adapters::sqlite::SqliteSubtaskRepository, services::SubtaskManager};
use taskkeeper::task::{adapters::sqlite::SqliteTaskRepository, services::TaskManager};
use taskkeeper::user::{adapters::sqlite::SqliteUserRepository, services::UserManager};
use tempfile::TempDir;

use crate::test_helpers::{FixedClock, date};

/// `SQLite` task manager.
pub type Tasks = TaskManager<SqliteTaskRepository, FixedClock>;
/// `SQLite` subtask manager.
pub type Subtasks = SubtaskManager<SqliteSubtaskRepository, FixedClock>;
/// `SQLite` user manager.
pub type Users = UserManager<SqliteUserRepository, FixedClock>;

/// A database file that is removed when dropped, with managers over it.
pub struct TestDatabase {
    pub clock: Arc<FixedClock>,
    pub tasks: Tasks,
    pub subtasks: Subtasks,
    pub users: Users,
    dir: TempDir,
}

impl TestDatabase {
    /// Creates a fresh database in a temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the pool cannot be created.
    pub fn create() -> eyre::Result<Self> {
        let dir = tempfile::tempdir()?;
        let config = SqliteConfig::new(dir.path().join("tasks.db")).with_max_connections(4);
        let pool = open_pool(&config)?;
        let clock = Arc::new(FixedClock::local_noon(date(2026, 9, 14)));
        Ok(Self {
            tasks: TaskManager::new(
                Arc::new(SqliteTaskRepository::new(pool.clone())),
                Arc::clone(&clock),
            ),
            subtasks: SubtaskManager::new(
                Arc::new(SqliteSubtaskRepository::new(pool.clone())),
                Arc::clone(&clock),
            ),
            users: UserManager::new(
                Arc::new(SqliteUserRepository::new(pool)),
                Arc::clone(&clock),
            ),
            clock,
            dir,
        })
    }

    /// Opens a second pool on the same file, as a restarted process would.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be opened.
    pub fn reopen_tasks(&self) -> eyre::Result<Tasks> {
        let config = SqliteConfig::new(self.dir.path().join("tasks.db"));
        let pool = open_pool(&config)?;
        Ok(TaskManager::new(
            Arc::new(SqliteTaskRepository::new(pool)),
            Arc::clone(&self.clock),
        ))
    }
}

/// Provides a fresh database per test.
#[fixture]
pub fn db() -> TestDatabase {
    TestDatabase::create().expect("temporary database")
}

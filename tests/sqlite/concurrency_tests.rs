//! Contended writes through one shared pool.

use std::collections::BTreeSet;
use std::thread;

use rstest::rstest;
use taskkeeper::task::{domain::TaskId, services::CreateTaskRequest};

use super::helpers::{TestDatabase, db};

#[rstest]
fn concurrent_toggles_lose_no_updates(db: TestDatabase) -> eyre::Result<()> {
    let id = db.tasks.create(CreateTaskRequest::new("contended"))?.id();
    let tasks = &db.tasks;

    thread::scope(|scope| {
        for _ in 0..21 {
            scope.spawn(|| tasks.toggle_complete(id).expect("toggle"));
        }
    });

    eyre::ensure!(tasks.get_by_id(id)?.is_completed(), "21 toggles must leave the task completed");
    Ok(())
}

#[rstest]
fn concurrent_creates_get_distinct_ids(db: TestDatabase) -> eyre::Result<()> {
    let tasks = &db.tasks;
    let ids: BTreeSet<TaskId> = thread::scope(|scope| {
        let handles: Vec<_> = (0..12)
            .map(|n| {
                scope.spawn(move || {
                    tasks
                        .create(CreateTaskRequest::new(format!("task {n}")))
                        .expect("create")
                        .id()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    eyre::ensure!(ids.len() == 12, "ids collided: {ids:?}");
    eyre::ensure!(db.tasks.get_all()?.len() == 12, "tasks lost");
    Ok(())
}

#[rstest]
fn concurrent_first_sight_creates_one_user(db: TestDatabase) -> eyre::Result<()> {
    let users = &db.users;
    let ids: BTreeSet<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    users
                        .get_or_create_by_chat_id(31_337)
                        .expect("resolve")
                        .id()
                        .value()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    eyre::ensure!(ids.len() == 1, "duplicate users: {ids:?}");
    Ok(())
}

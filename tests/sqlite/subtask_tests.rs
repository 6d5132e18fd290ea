//! `SQLite` integration tests for subtask persistence.

use rstest::rstest;
use taskkeeper::subtask::{domain::SubtaskId, services::SubtaskServiceError};
use taskkeeper::task::{domain::TaskId, services::CreateTaskRequest};

use super::helpers::{TestDatabase, db};

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn subtasks_are_listed_in_creation_order(db: TestDatabase) -> eyre::Result<()> {
    let parent = db.tasks.create(CreateTaskRequest::new("trip"))?;
    let first = db.subtasks.create(parent.id(), "book hotel")?;
    db.subtasks.create(parent.id(), "book train")?;
    db.subtasks.toggle_complete(first.id())?;

    let listed = db.subtasks.get_by_task(parent.id())?;
    let summary: Vec<(&str, bool)> = listed
        .iter()
        .map(|s| (s.description(), s.is_completed()))
        .collect();
    assert_eq!(summary, vec![("book hotel", true), ("book train", false)]);
    eyre::ensure!(db.subtasks.get_by_id(first.id())?.is_completed(), "toggle not stored");
    Ok(())
}

#[rstest]
fn missing_parent_is_rejected_by_the_store(db: TestDatabase) {
    assert!(matches!(
        db.subtasks.create(TaskId::new(77), "orphan"),
        Err(SubtaskServiceError::ParentNotFound(id)) if id == TaskId::new(77)
    ));
}

#[rstest]
fn deleting_a_task_cascades_to_subtasks(db: TestDatabase) -> eyre::Result<()> {
    let parent = db.tasks.create(CreateTaskRequest::new("cleanup"))?;
    let child = db.subtasks.create(parent.id(), "step")?;

    db.tasks.delete(parent.id())?;

    eyre::ensure!(db.subtasks.get_by_task(parent.id())?.is_empty(), "subtasks left behind");
    eyre::ensure!(
        matches!(db.subtasks.get_by_id(child.id()), Err(SubtaskServiceError::NotFound(_))),
        "cascade did not remove the subtask"
    );
    Ok(())
}

#[rstest]
fn missing_subtasks_are_not_found(db: TestDatabase) {
    assert!(matches!(
        db.subtasks.toggle_complete(SubtaskId::new(9)),
        Err(SubtaskServiceError::NotFound(_))
    ));
    assert!(matches!(
        db.subtasks.delete(SubtaskId::new(9)),
        Err(SubtaskServiceError::NotFound(_))
    ));
}

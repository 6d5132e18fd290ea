//! In-memory integration tests for subtasks alongside tasks.

use rstest::rstest;
use taskkeeper::subtask::domain::Subtask;
use taskkeeper::task::services::CreateTaskRequest;

use super::helpers::{Managers, managers};

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn subtasks_follow_their_parent(managers: Managers) -> eyre::Result<()> {
    let parent = managers.tasks.create(CreateTaskRequest::new("move house"))?;
    let pack = managers.subtasks.create(parent.id(), "pack boxes")?;
    managers.subtasks.create(parent.id(), "book van")?;
    managers.subtasks.toggle_complete(pack.id())?;

    let listed = managers.subtasks.get_by_task(parent.id())?;
    let summary: Vec<(&str, bool)> = listed
        .iter()
        .map(|s: &Subtask| (s.description(), s.is_completed()))
        .collect();
    assert_eq!(summary, vec![("pack boxes", true), ("book van", false)]);
    Ok(())
}

#[rstest]
fn deleting_a_task_leaves_subtasks_in_memory(managers: Managers) -> eyre::Result<()> {
    let parent = managers.tasks.create(CreateTaskRequest::new("temporary"))?;
    managers.subtasks.create(parent.id(), "step")?;
    managers.tasks.delete(parent.id())?;

    eyre::ensure!(
        managers.subtasks.get_by_task(parent.id())?.len() == 1,
        "the task manager does not cascade"
    );
    Ok(())
}

//! `SQLite` integration tests for task persistence.

use chrono::Duration;
use rstest::rstest;
use taskkeeper::task::{
    domain::{Priority, Task, TaskFilter, TaskId},
    services::{CreateTaskRequest, TaskPatch, TaskServiceError},
};
use taskkeeper::user::domain::UserId;

use super::helpers::{TestDatabase, db};
use crate::test_helpers::{date, local_day_at};

fn descriptions(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(Task::description).collect()
}

#[rstest]
fn created_task_survives_reopen(db: TestDatabase) -> eyre::Result<()> {
    let due = local_day_at(date(2026, 9, 14), 2, 90);
    let created = db.tasks.create(
        CreateTaskRequest::new("renew passport")
            .with_tags(["Admin", "admin", " travel "])
            .with_priority(Priority::High)
            .with_due_date(due),
    )?;

    let reopened = db.reopen_tasks()?;
    let loaded = reopened.get_by_id(created.id())?;

    eyre::ensure!(loaded == created, "stored task differs: {loaded:?} vs {created:?}");
    eyre::ensure!(loaded.tags().as_slice() == ["Admin", "travel"], "tags not normalized");
    eyre::ensure!(loaded.due_date() == Some(due), "due date lost");
    Ok(())
}

#[rstest]
fn ids_come_from_the_store_and_are_not_reused(db: TestDatabase) -> eyre::Result<()> {
    let first = db.tasks.create(CreateTaskRequest::new("one"))?;
    let second = db.tasks.create(CreateTaskRequest::new("two"))?;
    db.tasks.delete(second.id())?;
    let third = db.tasks.create(CreateTaskRequest::new("three"))?;

    eyre::ensure!(first.id() == TaskId::new(1), "first id");
    eyre::ensure!(third.id() == TaskId::new(3), "AUTOINCREMENT must not reuse ids");
    Ok(())
}

#[rstest]
fn update_and_toggle_refresh_updated_at(db: TestDatabase) -> eyre::Result<()> {
    let created = db.tasks.create(CreateTaskRequest::new("draft"))?;
    db.clock.advance(Duration::minutes(5));

    let updated = db.tasks.update(
        created.id(),
        TaskPatch::new()
            .with_description("final")
            .with_tags(["x", "X"]),
    )?;
    eyre::ensure!(updated.description() == "final", "description not updated");
    eyre::ensure!(updated.tags().as_slice() == ["x"], "tags not renormalized");
    eyre::ensure!(updated.updated_at() > created.updated_at(), "updated_at not refreshed");

    let toggled = db.tasks.toggle_complete(created.id())?;
    eyre::ensure!(toggled.is_completed(), "toggle lost");
    eyre::ensure!(db.tasks.get_by_id(created.id())? == toggled, "returned task differs from stored");
    Ok(())
}

#[rstest]
fn missing_tasks_are_not_found(db: TestDatabase) {
    let missing = TaskId::new(404);
    assert!(matches!(
        db.tasks.update(missing, TaskPatch::new().with_completed(true)),
        Err(TaskServiceError::NotFound(id)) if id == missing
    ));
    assert!(matches!(db.tasks.delete(missing), Err(TaskServiceError::NotFound(_))));
    assert!(matches!(
        db.tasks.toggle_complete(missing),
        Err(TaskServiceError::NotFound(_))
    ));
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn filters_match_in_memory_semantics(db: TestDatabase) -> eyre::Result<()> {
    let today = date(2026, 9, 14);
    db.tasks.create(CreateTaskRequest::new("a low").with_tags(["A"]).with_priority(Priority::Low))?;
    db.tasks.create(
        CreateTaskRequest::new("b high dated")
            .with_tags(["b"])
            .with_priority(Priority::High)
            .with_due_date(local_day_at(today, 3, 0)),
    )?;
    db.tasks.create(
        CreateTaskRequest::new("ab high")
            .with_tags(["a", "b"])
            .with_priority(Priority::High),
    )?;
    db.tasks.create(CreateTaskRequest::new("untagged dated").with_due_date(local_day_at(today, 1, 0)))?;

    let any = db.tasks.filter(&TaskFilter::new().with_any_tag(["a", "B"]))?;
    assert_eq!(descriptions(&any), vec!["a low", "b high dated", "ab high"]);

    let high = db.tasks.filter(
        &TaskFilter::new()
            .with_any_tag(["a", "b"])
            .with_priority(Priority::High),
    )?;
    assert_eq!(descriptions(&high), vec!["b high dated", "ab high"]);

    let ranged = db.tasks.filter(
        &TaskFilter::new()
            .due_from(local_day_at(today, 0, 0))
            .due_to(local_day_at(today, 3, 0)),
    )?;
    assert_eq!(descriptions(&ranged), vec!["untagged dated", "b high dated"]);

    let undated = db.tasks.filter(&TaskFilter::new().with_has_due_date(false))?;
    assert_eq!(descriptions(&undated), vec!["a low", "ab high"]);
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn upcoming_uses_calendar_days(db: TestDatabase) -> eyre::Result<()> {
    let today = date(2026, 9, 14);
    db.tasks.create(CreateTaskRequest::new("day 7").with_due_date(local_day_at(today, 7, 23 * 60)))?;
    db.tasks.create(CreateTaskRequest::new("day 8").with_due_date(local_day_at(today, 8, 0)))?;
    db.tasks.create(CreateTaskRequest::new("today").with_due_date(local_day_at(today, 0, 0)))?;
    db.tasks.create(CreateTaskRequest::new("undated"))?;

    let upcoming = db.tasks.upcoming_within_days(7)?;
    assert_eq!(descriptions(&upcoming), vec!["today", "day 7"]);
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn all_tags_span_every_task(db: TestDatabase) -> eyre::Result<()> {
    db.tasks.create(CreateTaskRequest::new("1").with_tags(["zeta", "Alpha"]))?;
    db.tasks.create(CreateTaskRequest::new("2").with_tags(["alpha", "beta"]))?;
    assert_eq!(db.tasks.all_tags()?, vec!["Alpha", "beta", "zeta"]);
    Ok(())
}

#[rstest]
fn reassign_owner_is_a_bulk_update(db: TestDatabase) -> eyre::Result<()> {
    db.tasks.create(CreateTaskRequest::new("legacy 1"))?;
    db.tasks.create(CreateTaskRequest::new("legacy 2"))?;
    let user = db.users.get_or_create_by_device_id("phone")?;
    db.tasks.create(CreateTaskRequest::new("already mine").for_owner(user.id()))?;

    let moved = db.tasks.reassign_owner(UserId::LEGACY, user.id())?;

    eyre::ensure!(moved == 2, "moved {moved} tasks");
    eyre::ensure!(db.tasks.get_all_for_user(user.id())?.len() == 3, "tasks not reassigned");
    Ok(())
}

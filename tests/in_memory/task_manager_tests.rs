//! In-memory integration tests for task operations.

use chrono::Duration;
use rstest::rstest;
use taskkeeper::task::{
    domain::{Priority, Task, TaskFilter, TaskId},
    services::{CreateTaskRequest, TaskPatch, TaskServiceError},
};
use taskkeeper::user::domain::UserId;

use super::helpers::{Managers, managers};
use crate::test_helpers::{date, local_day_at};

fn descriptions(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(Task::description).collect()
}

#[rstest]
fn task_lifecycle_round_trip(managers: Managers) -> eyre::Result<()> {
    let tasks = &managers.tasks;
    let created = tasks.create(CreateTaskRequest::new("water plants").with_tags(["home"]))?;
    eyre::ensure!(created.id() == TaskId::new(1), "first id should be 1");

    managers.clock.advance(Duration::hours(1));
    let updated = tasks.update(
        created.id(),
        TaskPatch::new()
            .with_description("water all plants")
            .with_priority(Priority::High),
    )?;
    eyre::ensure!(updated.created_at() == created.created_at(), "createdAt changed");
    eyre::ensure!(updated.updated_at() > created.updated_at(), "updatedAt not refreshed");

    let toggled = tasks.toggle_complete(created.id())?;
    eyre::ensure!(toggled.is_completed(), "toggle should complete the task");

    tasks.delete(created.id())?;
    eyre::ensure!(
        matches!(tasks.get_by_id(created.id()), Err(TaskServiceError::NotFound(_))),
        "deleted task must be gone"
    );
    Ok(())
}

#[rstest]
fn tag_normalization_keeps_first_literal_form(managers: Managers) -> eyre::Result<()> {
    let task = managers.tasks.create(
        CreateTaskRequest::new("normalize").with_tags([" Tag ", "tag", "TAG", "", "  "]),
    )?;
    eyre::ensure!(task.tags().as_slice() == ["Tag"], "got {:?}", task.tags());
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn filter_and_or_semantics(managers: Managers) -> eyre::Result<()> {
    let tasks = &managers.tasks;
    tasks.create(CreateTaskRequest::new("only a").with_tags(["a"]))?;
    tasks.create(CreateTaskRequest::new("only b").with_tags(["b"]))?;
    tasks.create(
        CreateTaskRequest::new("both")
            .with_tags(["a", "b"])
            .with_priority(Priority::High),
    )?;

    let any = tasks.filter(&TaskFilter::new().with_any_tag(["a", "b"]))?;
    assert_eq!(descriptions(&any), vec!["only a", "only b", "both"]);

    let high = tasks.filter(
        &TaskFilter::new()
            .with_any_tag(["a", "b"])
            .with_priority(Priority::High),
    )?;
    assert_eq!(descriptions(&high), vec!["both"]);
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn upcoming_boundaries(managers: Managers) -> eyre::Result<()> {
    let tasks = &managers.tasks;
    let today = date(2026, 9, 14);
    tasks.create(CreateTaskRequest::new("in seven days").with_due_date(local_day_at(today, 7, 12 * 60)))?;
    tasks.create(CreateTaskRequest::new("in eight days").with_due_date(local_day_at(today, 8, 12 * 60)))?;
    tasks.create(CreateTaskRequest::new("no date"))?;
    let done = tasks.create(CreateTaskRequest::new("done tomorrow").with_due_date(local_day_at(today, 1, 60)))?;
    tasks.toggle_complete(done.id())?;
    tasks.create(CreateTaskRequest::new("early today").with_due_date(local_day_at(today, 0, 1)))?;

    let upcoming = tasks.upcoming_within_days(7)?;
    assert_eq!(descriptions(&upcoming), vec!["early today", "in seven days"]);
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn due_range_filter_sorts_dated_before_dateless(managers: Managers) -> eyre::Result<()> {
    let tasks = &managers.tasks;
    let today = date(2026, 9, 14);
    tasks.create(CreateTaskRequest::new("undated"))?;
    tasks.create(CreateTaskRequest::new("friday").with_due_date(local_day_at(today, 4, 0)))?;
    tasks.create(CreateTaskRequest::new("tuesday").with_due_date(local_day_at(today, 1, 0)))?;

    let dated = tasks.filter(&TaskFilter::new().with_has_due_date(true))?;
    assert_eq!(descriptions(&dated), vec!["tuesday", "friday"]);

    let undated = tasks.filter(&TaskFilter::new().with_has_due_date(false))?;
    assert_eq!(descriptions(&undated), vec!["undated"]);
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "test asserts while propagating setup errors with ?"
)]
fn user_scoped_listing(managers: Managers) -> eyre::Result<()> {
    let user = managers.users.get_or_create_by_device_id("laptop")?;
    managers
        .tasks
        .create(CreateTaskRequest::new("mine").for_owner(user.id()))?;
    managers.tasks.create(CreateTaskRequest::new("legacy"))?;

    let mine = managers.tasks.get_all_for_user(user.id())?;
    assert_eq!(descriptions(&mine), vec!["mine"]);

    let filtered = managers
        .tasks
        .filter_for_user(UserId::LEGACY, &TaskFilter::new().with_completed(false))?;
    assert_eq!(descriptions(&filtered), vec!["legacy"]);
    Ok(())
}

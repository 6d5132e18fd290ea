//! Subtask manager behaviour over the in-memory store.

use std::sync::Arc;
use std::thread;

use chrono::Duration;
use rstest::{fixture, rstest};

use crate::config::ManagerConfig;
use crate::observability::{ClassifyError, ErrorKind, Operation, OperationCounters};
use crate::subtask::{
    adapters::memory::InMemorySubtaskRepository,
    domain::{SubtaskDescription, SubtaskDomainError, SubtaskId},
    services::{SubtaskManager, SubtaskServiceError},
};
use crate::task::domain::TaskId;
use crate::test_support::{FixedClock, date};

type TestManager = SubtaskManager<InMemorySubtaskRepository, FixedClock>;

struct Harness {
    clock: Arc<FixedClock>,
    manager: TestManager,
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(FixedClock::local_noon(date(2026, 6, 1)));
    let manager = SubtaskManager::in_memory(Arc::clone(&clock));
    Harness { clock, manager }
}

#[rstest]
fn get_by_task_returns_creation_order_for_that_task_only(harness: Harness) {
    let parent = TaskId::new(1);
    let other = TaskId::new(2);
    harness.manager.create(parent, "first").expect("create");
    harness.manager.create(other, "elsewhere").expect("create");
    harness.manager.create(parent, "second").expect("create");

    let descriptions: Vec<String> = harness
        .manager
        .get_by_task(parent)
        .expect("list")
        .iter()
        .map(|s| s.description().to_owned())
        .collect();
    assert_eq!(descriptions, vec!["first", "second"]);
}

#[rstest]
fn parent_existence_is_not_checked_in_memory(harness: Harness) {
    let orphan = harness
        .manager
        .create(TaskId::new(999), "orphan")
        .expect("in-memory store accepts any parent");
    assert_eq!(orphan.task_id(), TaskId::new(999));
    assert!(!orphan.is_completed());
}

#[rstest]
#[case::empty("")]
#[case::blank(" \t ")]
fn blank_descriptions_are_rejected(harness: Harness, #[case] description: &str) {
    assert!(matches!(
        harness.manager.create(TaskId::new(1), description),
        Err(SubtaskServiceError::Validation(SubtaskDomainError::EmptyDescription))
    ));
}

#[rstest]
fn configured_limit_applies_to_subtasks() {
    let clock = Arc::new(FixedClock::local_noon(date(2026, 6, 1)));
    let manager = SubtaskManager::in_memory(clock)
        .with_config(ManagerConfig::default().with_max_description_chars(3));
    let err = manager.create(TaskId::new(1), "four").expect_err("too long");
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[rstest]
fn toggle_refreshes_updated_at(harness: Harness) {
    let created = harness.manager.create(TaskId::new(1), "step").expect("create");
    harness.clock.advance(Duration::seconds(30));

    let toggled = harness.manager.toggle_complete(created.id()).expect("toggle");

    assert!(toggled.is_completed());
    assert_eq!(toggled.created_at(), created.created_at());
    assert_eq!(toggled.updated_at(), created.created_at() + Duration::seconds(30));
}

#[rstest]
fn missing_subtasks_are_not_found(harness: Harness) {
    let missing = SubtaskId::new(5);
    assert!(matches!(
        harness.manager.toggle_complete(missing),
        Err(SubtaskServiceError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        harness.manager.delete(missing),
        Err(SubtaskServiceError::NotFound(_))
    ));
    assert!(matches!(
        harness.manager.get_by_id(missing),
        Err(SubtaskServiceError::NotFound(_))
    ));
}

#[rstest]
fn delete_removes_the_subtask(harness: Harness) {
    let id = harness.manager.create(TaskId::new(1), "gone").expect("create").id();
    harness.manager.delete(id).expect("delete");
    assert!(harness.manager.get_by_task(TaskId::new(1)).expect("list").is_empty());
}

#[rstest]
fn concurrent_toggles_keep_parity(harness: Harness) {
    let id = harness.manager.create(TaskId::new(1), "busy").expect("create").id();
    let manager = &harness.manager;
    thread::scope(|scope| {
        for _ in 0..33 {
            scope.spawn(|| manager.toggle_complete(id).expect("toggle"));
        }
    });
    assert!(manager.get_by_id(id).expect("get").is_completed());
}

#[rstest]
fn operations_are_observed() {
    let counters = Arc::new(OperationCounters::new());
    let manager = SubtaskManager::in_memory(Arc::new(FixedClock::local_noon(date(2026, 6, 1))))
        .with_observer(counters.clone());

    let id = manager.create(TaskId::new(1), "watched").expect("create").id();
    manager.toggle_complete(id).expect("toggle");
    manager.delete(id).expect("delete");
    manager.delete(id).expect_err("already gone");

    assert_eq!(counters.tally(Operation::CreateSubtask).successes, 1);
    assert_eq!(counters.tally(Operation::ToggleSubtask).successes, 1);
    let deletes = counters.tally(Operation::DeleteSubtask);
    assert_eq!((deletes.successes, deletes.failures), (1, 1));
}

#[rstest]
#[case::blank(r#""  ""#.to_owned())]
#[case::over_limit(format!("\"{}\"", "s".repeat(1001)))]
fn deserialized_descriptions_are_validated(#[case] json: String) {
    assert!(serde_json::from_str::<SubtaskDescription>(&json).is_err());
}

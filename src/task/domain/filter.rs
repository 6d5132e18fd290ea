//! Storage-agnostic task filtering and ordering.
//!
//! A [`TaskFilter`] is a fixed set of independent predicates. Supplied
//! predicates are combined with logical AND; the tag predicate itself matches
//! when a task carries any of the requested tags. Tasks without a due date
//! never satisfy a due-date interval and always sort after dated tasks.

use super::{Priority, Task, TaskDomainError, tag_key};
use crate::user::domain::UserId;
use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Result ordering for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskOrder {
    /// Ascending identifier.
    #[default]
    Id,
    /// Ascending due date, dateless tasks last, ties by ascending identifier.
    DueDate,
}

impl TaskOrder {
    /// Sorts tasks in place.
    pub fn sort(self, tasks: &mut [Task]) {
        match self {
            Self::Id => tasks.sort_by_key(Task::id),
            Self::DueDate => tasks.sort_by(compare_by_due_date),
        }
    }
}

/// Orders dated tasks before dateless ones, then by date, then by id.
#[must_use]
pub fn compare_by_due_date(left: &Task, right: &Task) -> Ordering {
    let due = match (left.due_date(), right.due_date()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    due.then_with(|| left.id().cmp(&right.id()))
}

/// Independent task predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    completed: Option<bool>,
    priority: Option<Priority>,
    tags: Vec<String>,
    tag_keys: HashSet<String>,
    due_from: Option<DateTime<Utc>>,
    due_to: Option<DateTime<Utc>>,
    has_due_date: Option<bool>,
    order: Option<TaskOrder>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches tasks with the given completion state.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Matches tasks with the given priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Matches tasks carrying any of the given tags, ignoring case and
    /// surrounding whitespace. Blank entries are ignored.
    #[must_use]
    pub fn with_any_tag<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            let key = tag_key(tag.as_ref());
            if !key.is_empty() && self.tag_keys.insert(key) {
                self.tags.push(tag.as_ref().trim().to_owned());
            }
        }
        self
    }

    /// Matches tasks due at or after `from`.
    #[must_use]
    pub const fn due_from(mut self, from: DateTime<Utc>) -> Self {
        self.due_from = Some(from);
        self
    }

    /// Matches tasks due at or before `to`.
    #[must_use]
    pub const fn due_to(mut self, to: DateTime<Utc>) -> Self {
        self.due_to = Some(to);
        self
    }

    /// Matches tasks that have (or lack) a due date.
    #[must_use]
    pub const fn with_has_due_date(mut self, has_due_date: bool) -> Self {
        self.has_due_date = Some(has_due_date);
        self
    }

    /// Requests an explicit result ordering.
    #[must_use]
    pub const fn ordered_by(mut self, order: TaskOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the completion predicate.
    #[must_use]
    pub const fn completed(&self) -> Option<bool> {
        self.completed
    }

    /// Returns the priority predicate.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the requested tags in first-seen form.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the inclusive lower due-date bound.
    #[must_use]
    pub const fn due_from_bound(&self) -> Option<DateTime<Utc>> {
        self.due_from
    }

    /// Returns the inclusive upper due-date bound.
    #[must_use]
    pub const fn due_to_bound(&self) -> Option<DateTime<Utc>> {
        self.due_to
    }

    /// Returns the due-date presence predicate.
    #[must_use]
    pub const fn has_due_date(&self) -> Option<bool> {
        self.has_due_date
    }

    /// Returns `true` when any predicate inspects due dates.
    #[must_use]
    pub const fn is_date_aware(&self) -> bool {
        self.due_from.is_some() || self.due_to.is_some() || self.has_due_date.is_some()
    }

    /// Returns the effective ordering: the explicit one, otherwise due-date
    /// order for date-aware filters and identifier order for the rest.
    #[must_use]
    pub const fn order(&self) -> TaskOrder {
        match self.order {
            Some(order) => order,
            None if self.is_date_aware() => TaskOrder::DueDate,
            None => TaskOrder::Id,
        }
    }

    /// Checks that the predicates are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDueRange`] when the lower due-date
    /// bound lies after the upper bound.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        match (self.due_from, self.due_to) {
            (Some(from), Some(to)) if from > to => Err(TaskDomainError::InvalidDueRange { from, to }),
            _ => Ok(()),
        }
    }

    /// Returns `true` when the task satisfies every supplied predicate.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.completed.is_none_or(|c| task.is_completed() == c)
            && self.priority.is_none_or(|p| task.priority() == p)
            && (self.tag_keys.is_empty() || task.tags().contains_any(&self.tag_keys))
            && self
                .has_due_date
                .is_none_or(|has| task.due_date().is_some() == has)
            && self.matches_due_range(task)
    }

    fn matches_due_range(&self, task: &Task) -> bool {
        if self.due_from.is_none() && self.due_to.is_none() {
            return true;
        }
        task.due_date().is_some_and(|due| {
            self.due_from.is_none_or(|from| due >= from) && self.due_to.is_none_or(|to| due <= to)
        })
    }
}

/// A filter optionally scoped to one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    owner: Option<UserId>,
    filter: TaskFilter,
}

impl TaskQuery {
    /// Matches every task of every owner.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Wraps a filter without owner scoping.
    #[must_use]
    pub const fn from_filter(filter: TaskFilter) -> Self {
        Self {
            owner: None,
            filter,
        }
    }

    /// Restricts the query to one owner.
    #[must_use]
    pub const fn owned_by(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Returns the owner scope.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Returns the predicates.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Returns `true` when the task is in scope and satisfies the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.owner.is_none_or(|owner| task.owner() == owner) && self.filter.matches(task)
    }
}

/// Half-open interval of local calendar days used for upcoming tasks.
///
/// The window for `days = n` starting on day `d` covers
/// `[d 00:00, (d + n + 1) 00:00)` in local time, so "today" is always the
/// whole calendar day rather than a rolling 24-hour period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl UpcomingWindow {
    /// Builds the window covering `today` and the following `days` days.
    #[must_use]
    pub fn starting(today: NaiveDate, days: u32) -> Self {
        let last_exclusive = today
            .checked_add_days(Days::new(u64::from(days) + 1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start: local_midnight(today),
            end: local_midnight(last_exclusive),
        }
    }

    /// Returns the inclusive start instant.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the exclusive end instant.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns `true` when `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Returns the instant of local midnight starting `date`.
///
/// When local midnight does not exist (a DST gap), the UTC midnight of the
/// same date is used.
#[must_use]
pub fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    naive
        .and_local_timezone(Local)
        .earliest()
        .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc))
}

//! Error types for task domain validation and parsing.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while validating task input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The description exceeds the configured character limit.
    #[error("task description has {length} characters, maximum is {max}")]
    DescriptionTooLong {
        /// Character count of the rejected description.
        length: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The priority value is not one of `low`, `medium`, or `high`.
    #[error("unknown task priority: {0}")]
    InvalidPriority(String),

    /// The due-date interval has its lower bound after its upper bound.
    #[error("due-date range starts at {from} which is after its end {to}")]
    InvalidDueRange {
        /// Inclusive lower bound.
        from: DateTime<Utc>,
        /// Inclusive upper bound.
        to: DateTime<Utc>,
    },
}

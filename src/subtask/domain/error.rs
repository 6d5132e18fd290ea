//! Domain errors for subtask validation.

use thiserror::Error;

/// Validation failures for subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubtaskDomainError {
    /// The description is empty or whitespace.
    #[error("subtask description must not be empty")]
    EmptyDescription,

    /// The description exceeds the configured limit.
    #[error("subtask description has {length} characters, limit is {max}")]
    DescriptionTooLong {
        /// Length of the rejected description, in characters.
        length: usize,
        /// Configured limit.
        max: usize,
    },
}

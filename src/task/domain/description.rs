//! Validated task descriptions.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upper bound on description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Non-blank task description within a character limit.
///
/// Descriptions are stored exactly as supplied; they are never truncated or
/// trimmed.
///
/// Deserialization validates against [`MAX_DESCRIPTION_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Validates a description against `max_chars`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the value is blank
    /// and [`TaskDomainError::DescriptionTooLong`] when it has more than
    /// `max_chars` characters.
    pub fn parse(value: impl Into<String>, max_chars: usize) -> Result<Self, TaskDomainError> {
        let description = value.into();
        if description.trim().is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        let length = description.chars().count();
        if length > max_chars {
            return Err(TaskDomainError::DescriptionTooLong {
                length,
                max: max_chars,
            });
        }
        Ok(Self(description))
    }

    /// Returns the description text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Consumes the wrapper and returns the text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for TaskDescription {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value, MAX_DESCRIPTION_CHARS)
    }
}

impl From<TaskDescription> for String {
    fn from(description: TaskDescription) -> Self {
        description.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

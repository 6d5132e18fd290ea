//! Chat platform identity.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identity assigned by the chat platform.
///
/// Zero is the platform's "no identity" value and is rejected, so an absent
/// chat identity is always `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ChatId(i64);

impl ChatId {
    /// Validates a raw chat identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::ZeroChatId`] for zero.
    pub const fn new(value: i64) -> Result<Self, UserDomainError> {
        if value == 0 {
            return Err(UserDomainError::ZeroChatId);
        }
        Ok(Self(value))
    }

    /// Interprets a stored value where zero means "unset".
    #[must_use]
    pub const fn from_optional(value: i64) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ChatId {
    type Error = UserDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChatId> for i64 {
    fn from(value: ChatId) -> Self {
        value.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Manager configuration.

use crate::task::domain::MAX_DESCRIPTION_CHARS;
use crate::user::domain::UserId;

/// Settings shared by the task and subtask managers.
///
/// # Examples
///
/// ```
/// use taskkeeper::config::ManagerConfig;
/// use taskkeeper::user::domain::UserId;
///
/// let config = ManagerConfig::default();
/// assert_eq!(config.max_description_chars(), 1000);
/// assert_eq!(config.default_owner(), UserId::LEGACY);
///
/// let strict = ManagerConfig::default().with_max_description_chars(140);
/// assert_eq!(strict.max_description_chars(), 140);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    max_description_chars: usize,
    default_owner: UserId,
}

impl ManagerConfig {
    /// Sets the description length limit, in characters.
    #[must_use]
    pub const fn with_max_description_chars(mut self, max: usize) -> Self {
        self.max_description_chars = max;
        self
    }

    /// Sets the owner attached to tasks created without a user context.
    #[must_use]
    pub const fn with_default_owner(mut self, owner: UserId) -> Self {
        self.default_owner = owner;
        self
    }

    /// Returns the description length limit.
    #[must_use]
    pub const fn max_description_chars(&self) -> usize {
        self.max_description_chars
    }

    /// Returns the fallback owner.
    #[must_use]
    pub const fn default_owner(&self) -> UserId {
        self.default_owner
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_description_chars: MAX_DESCRIPTION_CHARS,
            default_owner: UserId::LEGACY,
        }
    }
}

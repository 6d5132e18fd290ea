//! Repository port for user persistence and identity lookup.

use crate::user::domain::{ChatId, DeviceId, User, UserDraft, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
///
/// Device and chat identities are unique across users. Implementations
/// reject a write that would break this with a duplicate-identity error
/// instead of storing a second record.
pub trait UserRepository: Send + Sync {
    /// Stores a new user and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateDeviceId`] or
    /// [`UserRepositoryError::DuplicateChatId`] when an identity is taken.
    fn insert(&self, draft: &UserDraft) -> UserRepositoryResult<User>;

    /// Finds a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Persistence`] when storage fails.
    fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by device identity.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Persistence`] when storage fails.
    fn find_by_device_id(&self, device_id: &DeviceId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by chat platform identity.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Persistence`] when storage fails.
    fn find_by_chat_id(&self, chat_id: ChatId) -> UserRepositoryResult<Option<User>>;

    /// Overwrites a stored user and returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist
    /// or a duplicate-identity error when the new identities are taken.
    fn update(&self, user: &User) -> UserRepositoryResult<User>;

    /// Records or clears the push token of a stored user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    fn set_push_token(
        &self,
        id: UserId,
        token: Option<&str>,
        at: DateTime<Utc>,
    ) -> UserRepositoryResult<User>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Another user already has this device identity.
    #[error("device identifier already registered: {0}")]
    DuplicateDeviceId(DeviceId),

    /// Another user already has this chat identity.
    #[error("chat identifier already registered: {0}")]
    DuplicateChatId(ChatId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for duplicate-identity errors.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateDeviceId(_) | Self::DuplicateChatId(_))
    }
}

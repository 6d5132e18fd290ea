//! User manager: resolves external identities to user records.

use crate::observability::{
    ClassifyError, ErrorKind, NoopObserver, Operation, OperationEvent, OperationObserver,
    outcome_of,
};
use crate::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{ChatId, DeviceId, User, UserDomainError, UserDraft, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Service-level errors for user operations.
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// An identity failed validation.
    #[error(transparent)]
    Validation(#[from] UserDomainError),
    /// The user does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),
    /// The identity belongs to another user.
    #[error(transparent)]
    Conflict(UserRepositoryError),
    /// The repository failed.
    #[error(transparent)]
    Storage(UserRepositoryError),
}

impl From<UserRepositoryError> for UserServiceError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::NotFound(id) => Self::NotFound(id),
            UserRepositoryError::DuplicateDeviceId(_) | UserRepositoryError::DuplicateChatId(_) => {
                Self::Conflict(err)
            }
            UserRepositoryError::Persistence(_) => Self::Storage(err),
        }
    }
}

impl ClassifyError for UserServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for user service operations.
pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// Mints a fresh random device identity for a front-end that has none.
#[must_use]
pub fn generate_device_id() -> DeviceId {
    DeviceId::generate()
}

/// Identity resolution service.
///
/// `get_or_create_*` operations look up first and create only on a miss. If
/// a concurrent caller creates the same identity in between, the insert is
/// rejected as a duplicate and the winner's record is returned instead.
#[derive(Clone)]
pub struct UserManager<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    observer: Arc<dyn OperationObserver>,
}

impl<C> UserManager<InMemoryUserRepository, C>
where
    C: Clock + Send + Sync,
{
    /// Creates a manager over a fresh in-memory user store.
    #[must_use]
    pub fn in_memory(clock: Arc<C>) -> Self {
        Self::new(Arc::new(InMemoryUserRepository::new()), clock)
    }
}

impl<R, C> UserManager<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user manager over the given repository.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replaces the operation observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn OperationObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the user with this device identity, creating it if unseen.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Validation`] for a blank identity or
    /// [`UserServiceError::Storage`] when the repository fails.
    pub fn get_or_create_by_device_id(&self, device_id: &str) -> UserServiceResult<User> {
        let device = DeviceId::parse(device_id)?;
        if let Some(user) = self.repository.find_by_device_id(&device)? {
            return Ok(user);
        }
        match self.insert(&UserDraft::new(device.clone(), None, self.clock.utc())) {
            Err(UserServiceError::Conflict(_)) => self
                .repository
                .find_by_device_id(&device)?
                .ok_or_else(|| {
                    UserServiceError::Conflict(UserRepositoryError::DuplicateDeviceId(device))
                }),
            other => other,
        }
    }

    /// Returns the user linked to this chat identity, creating it if unseen.
    ///
    /// New users receive the device identity `telegram_<chat id>`.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Validation`] for a zero chat identity,
    /// [`UserServiceError::Conflict`] when the derived device identity is
    /// held by a different user, or [`UserServiceError::Storage`] when the
    /// repository fails.
    pub fn get_or_create_by_chat_id(&self, chat_id: i64) -> UserServiceResult<User> {
        let chat = ChatId::new(chat_id)?;
        if let Some(user) = self.repository.find_by_chat_id(chat)? {
            return Ok(user);
        }
        let draft = UserDraft::new(DeviceId::for_chat(chat), Some(chat), self.clock.utc());
        match self.insert(&draft) {
            Err(UserServiceError::Conflict(err)) => self
                .repository
                .find_by_chat_id(chat)?
                .ok_or(UserServiceError::Conflict(err)),
            other => other,
        }
    }

    /// Creates a user with explicit identities.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Validation`] for invalid identities,
    /// [`UserServiceError::Conflict`] when either identity is taken, or
    /// [`UserServiceError::Storage`] when the repository fails.
    pub fn create_user(&self, device_id: &str, chat_id: Option<i64>) -> UserServiceResult<User> {
        let device = DeviceId::parse(device_id)?;
        let chat = chat_id.map(ChatId::new).transpose()?;
        self.insert(&UserDraft::new(device, chat, self.clock.utc()))
    }

    /// Returns one user.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::NotFound`] when the user does not exist or
    /// [`UserServiceError::Storage`] when the repository fails.
    pub fn get_by_id(&self, id: UserId) -> UserServiceResult<User> {
        self.repository
            .find_by_id(id)?
            .ok_or(UserServiceError::NotFound(id))
    }

    /// Looks up a user by device identity without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Validation`] for a blank identity or
    /// [`UserServiceError::Storage`] when the repository fails.
    pub fn find_by_device_id(&self, device_id: &str) -> UserServiceResult<Option<User>> {
        let device = DeviceId::parse(device_id)?;
        Ok(self.repository.find_by_device_id(&device)?)
    }

    /// Looks up a user by chat identity without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Validation`] for a zero chat identity or
    /// [`UserServiceError::Storage`] when the repository fails.
    pub fn find_by_chat_id(&self, chat_id: i64) -> UserServiceResult<Option<User>> {
        let chat = ChatId::new(chat_id)?;
        Ok(self.repository.find_by_chat_id(chat)?)
    }

    /// Stores a modified user, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::NotFound`] when the user does not exist,
    /// [`UserServiceError::Conflict`] when a changed identity is taken, or
    /// [`UserServiceError::Storage`] when the repository fails.
    pub fn update(&self, user: &User) -> UserServiceResult<User> {
        self.observed(Operation::UpdateUser, || {
            let mut changed = user.clone();
            changed.touch(self.clock.utc());
            let stored = self.repository.update(&changed)?;
            tracing::debug!(user_id = %stored.id(), "user updated");
            Ok(stored)
        })
    }

    /// Records a push notification token, or clears it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::NotFound`] when the user does not exist or
    /// [`UserServiceError::Storage`] when the repository fails.
    pub fn set_push_token(&self, id: UserId, token: Option<&str>) -> UserServiceResult<User> {
        self.observed(Operation::UpdateUser, || {
            let stored = self.repository.set_push_token(id, token, self.clock.utc())?;
            tracing::debug!(user_id = %id, has_token = token.is_some(), "push token set");
            Ok(stored)
        })
    }

    fn insert(&self, draft: &UserDraft) -> UserServiceResult<User> {
        self.observed(Operation::CreateUser, || {
            let user = self.repository.insert(draft)?;
            tracing::info!(
                user_id = %user.id(),
                device_id = %user.device_id(),
                "user created"
            );
            Ok(user)
        })
    }

    fn observed<T>(
        &self,
        operation: Operation,
        run: impl FnOnce() -> UserServiceResult<T>,
    ) -> UserServiceResult<T> {
        let started = Instant::now();
        let result = run();
        self.observer.observe(&OperationEvent::new(
            operation,
            outcome_of(&result),
            started.elapsed(),
        ));
        result
    }
}

//! In-memory repository for user storage.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::user::{
    domain::{ChatId, DeviceId, LEGACY_DEVICE_ID, PersistedUserData, User, UserDraft, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
///
/// Starts with the legacy user (id 1) already stored, mirroring the durable
/// store's seed row, so new users receive ids from 2 upwards.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    state: Arc<Mutex<InMemoryUserState>>,
}

#[derive(Debug)]
struct InMemoryUserState {
    users: BTreeMap<UserId, User>,
    last_id: u64,
}

impl InMemoryUserState {
    fn ensure_unique(&self, candidate: &User) -> UserRepositoryResult<()> {
        for existing in self.users.values().filter(|user| user.id() != candidate.id()) {
            if existing.device_id() == candidate.device_id() {
                return Err(UserRepositoryError::DuplicateDeviceId(
                    candidate.device_id().clone(),
                ));
            }
            if let Some(chat_id) = candidate.chat_id().filter(|id| existing.chat_id() == Some(*id)) {
                return Err(UserRepositoryError::DuplicateChatId(chat_id));
            }
        }
        Ok(())
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a repository holding only the legacy user.
    #[must_use]
    pub fn new() -> Self {
        let mut users = BTreeMap::new();
        if let Some(legacy) = legacy_user() {
            users.insert(legacy.id(), legacy);
        }
        Self {
            state: Arc::new(Mutex::new(InMemoryUserState {
                users,
                last_id: UserId::LEGACY.value(),
            })),
        }
    }

    fn lock(&self) -> UserRepositoryResult<MutexGuard<'_, InMemoryUserState>> {
        self.state.lock().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn legacy_user() -> Option<User> {
    let device_id = DeviceId::parse(LEGACY_DEVICE_ID).ok()?;
    Some(User::from_persisted(PersistedUserData {
        id: UserId::LEGACY,
        device_id,
        chat_id: None,
        push_token: None,
        created_at: DateTime::UNIX_EPOCH,
        updated_at: DateTime::UNIX_EPOCH,
    }))
}

impl UserRepository for InMemoryUserRepository {
    fn insert(&self, draft: &UserDraft) -> UserRepositoryResult<User> {
        let mut state = self.lock()?;
        let next = state.last_id.checked_add(1).ok_or_else(|| {
            UserRepositoryError::persistence(std::io::Error::other("user id space exhausted"))
        })?;
        let user = draft.clone().into_user(UserId::new(next));
        state.ensure_unique(&user)?;
        state.last_id = next;
        state.users.insert(user.id(), user.clone());
        Ok(user)
    }

    fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.lock()?;
        Ok(state.users.get(&id).cloned())
    }

    fn find_by_device_id(&self, device_id: &DeviceId) -> UserRepositoryResult<Option<User>> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|user| user.device_id() == device_id)
            .cloned())
    }

    fn find_by_chat_id(&self, chat_id: ChatId) -> UserRepositoryResult<Option<User>> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|user| user.chat_id() == Some(chat_id))
            .cloned())
    }

    fn update(&self, user: &User) -> UserRepositoryResult<User> {
        let mut state = self.lock()?;
        let created_at = state
            .users
            .get(&user.id())
            .map(User::created_at)
            .ok_or(UserRepositoryError::NotFound(user.id()))?;
        state.ensure_unique(user)?;
        // Creation time belongs to the store; only mutable fields are taken.
        let stored = User::from_persisted(PersistedUserData {
            id: user.id(),
            device_id: user.device_id().clone(),
            chat_id: user.chat_id(),
            push_token: user.push_token().map(str::to_owned),
            created_at,
            updated_at: user.updated_at(),
        });
        state.users.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    fn set_push_token(
        &self,
        id: UserId,
        token: Option<&str>,
        at: DateTime<Utc>,
    ) -> UserRepositoryResult<User> {
        let mut state = self.lock()?;
        let user = state
            .users
            .get_mut(&id)
            .ok_or(UserRepositoryError::NotFound(id))?;
        user.set_push_token(token.map(str::to_owned));
        user.touch(at);
        Ok(user.clone())
    }
}

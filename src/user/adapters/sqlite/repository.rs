//! `SQLite` repository implementation for user storage.

use super::{
    models::{NewUserRow, UserChangesetRow, UserRow},
    schema::users,
};
use crate::storage::{SqlitePool, from_micros, id_from_key, key_from_id, to_micros};
use crate::user::{
    domain::{ChatId, DeviceId, PersistedUserData, User, UserDraft, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

/// `SQLite`-backed user repository.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> UserRepositoryResult<T>,
    ) -> UserRepositoryResult<T> {
        let mut connection = self.pool.get().map_err(UserRepositoryError::persistence)?;
        f(&mut connection)
    }

    fn find_one<P>(&self, predicate: P) -> UserRepositoryResult<Option<User>>
    where
        P: FnOnce(&mut SqliteConnection) -> QueryResult<Option<UserRow>>,
    {
        self.with_connection(|connection| predicate(connection)?.map(row_to_user).transpose())
    }
}

impl From<DieselError> for UserRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl UserRepository for SqliteUserRepository {
    fn insert(&self, draft: &UserDraft) -> UserRepositoryResult<User> {
        let created_at = to_micros(draft.created_at());
        let new_row = NewUserRow {
            device_id: draft.device_id().as_str().to_owned(),
            telegram_id: draft.chat_id().map(ChatId::value),
            created_at,
            updated_at: created_at,
        };
        self.with_connection(|connection| {
            let row = diesel::insert_into(users::table)
                .values(&new_row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .map_err(|err| map_write_error(err, draft.device_id(), draft.chat_id()))?;
            row_to_user(row)
        })
    }

    fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.find_one(|connection| {
            users::table
                .find(key_from_id(id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
        })
    }

    fn find_by_device_id(&self, device_id: &DeviceId) -> UserRepositoryResult<Option<User>> {
        self.find_one(|connection| {
            users::table
                .filter(users::device_id.eq(device_id.as_str()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
        })
    }

    fn find_by_chat_id(&self, chat_id: ChatId) -> UserRepositoryResult<Option<User>> {
        self.find_one(|connection| {
            users::table
                .filter(users::telegram_id.eq(chat_id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
        })
    }

    fn update(&self, user: &User) -> UserRepositoryResult<User> {
        let changeset = UserChangesetRow {
            device_id: user.device_id().as_str().to_owned(),
            telegram_id: user.chat_id().map(ChatId::value),
            push_token: user.push_token().map(str::to_owned),
            updated_at: to_micros(user.updated_at()),
        };
        self.with_connection(|connection| {
            let row = diesel::update(users::table.find(key_from_id(user.id().value())))
                .set(&changeset)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .optional()
                .map_err(|err| map_write_error(err, user.device_id(), user.chat_id()))?
                .ok_or(UserRepositoryError::NotFound(user.id()))?;
            row_to_user(row)
        })
    }

    fn set_push_token(
        &self,
        id: UserId,
        token: Option<&str>,
        at: DateTime<Utc>,
    ) -> UserRepositoryResult<User> {
        self.with_connection(|connection| {
            let row = diesel::update(users::table.find(key_from_id(id.value())))
                .set((
                    users::push_token.eq(token),
                    users::updated_at.eq(to_micros(at)),
                ))
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .optional()?
                .ok_or(UserRepositoryError::NotFound(id))?;
            row_to_user(row)
        })
    }
}

fn is_chat_id_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.message().contains("users.telegram_id")
}

fn map_write_error(
    err: DieselError,
    device_id: &DeviceId,
    chat_id: Option<ChatId>,
) -> UserRepositoryError {
    match (err, chat_id) {
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info), Some(chat))
            if is_chat_id_unique_violation(info.as_ref()) =>
        {
            UserRepositoryError::DuplicateChatId(chat)
        }
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), _) => {
            UserRepositoryError::DuplicateDeviceId(device_id.clone())
        }
        (other, _) => UserRepositoryError::persistence(other),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        device_id,
        telegram_id,
        push_token,
        created_at,
        updated_at,
    } = row;

    let data = PersistedUserData {
        id: UserId::new(id_from_key(id).map_err(UserRepositoryError::persistence)?),
        device_id: DeviceId::parse(device_id).map_err(UserRepositoryError::persistence)?,
        chat_id: telegram_id.and_then(ChatId::from_optional),
        push_token,
        created_at: from_micros(created_at).map_err(UserRepositoryError::persistence)?,
        updated_at: from_micros(updated_at).map_err(UserRepositoryError::persistence)?,
    };
    Ok(User::from_persisted(data))
}

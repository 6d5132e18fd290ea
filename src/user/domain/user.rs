//! User aggregate.

use super::{ChatId, DeviceId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Internal user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    device_id: DeviceId,
    chat_id: Option<ChatId>,
    push_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone)]
pub struct PersistedUserData {
    /// User identifier.
    pub id: UserId,
    /// Device identity.
    pub device_id: DeviceId,
    /// Chat platform identity.
    pub chat_id: Option<ChatId>,
    /// Push notification token.
    pub push_token: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            device_id: data.device_id,
            chat_id: data.chat_id,
            push_token: data.push_token,
            created_at: data.created_at,
            updated_at: data.updated_at.max(data.created_at),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the device identity.
    #[must_use]
    pub const fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the chat platform identity, if linked.
    #[must_use]
    pub const fn chat_id(&self) -> Option<ChatId> {
        self.chat_id
    }

    /// Returns the push notification token, if any.
    #[must_use]
    pub fn push_token(&self) -> Option<&str> {
        self.push_token.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the device identity.
    pub fn set_device_id(&mut self, device_id: DeviceId) {
        self.device_id = device_id;
    }

    /// Links or unlinks a chat platform identity.
    pub const fn set_chat_id(&mut self, chat_id: Option<ChatId>) {
        self.chat_id = chat_id;
    }

    /// Records or clears the push notification token.
    pub fn set_push_token(&mut self, token: Option<String>) {
        self.push_token = token;
    }

    /// Refreshes the update timestamp, never moving it before creation.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at.max(self.created_at);
    }
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    device_id: DeviceId,
    chat_id: Option<ChatId>,
    created_at: DateTime<Utc>,
}

impl UserDraft {
    /// Creates a draft for a new user.
    #[must_use]
    pub const fn new(device_id: DeviceId, chat_id: Option<ChatId>, created_at: DateTime<Utc>) -> Self {
        Self {
            device_id,
            chat_id,
            created_at,
        }
    }

    /// Returns the device identity.
    #[must_use]
    pub const fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the chat platform identity.
    #[must_use]
    pub const fn chat_id(&self) -> Option<ChatId> {
        self.chat_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Materializes the draft under an assigned identifier.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            device_id: self.device_id,
            chat_id: self.chat_id,
            push_token: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

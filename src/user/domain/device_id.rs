//! Opaque device identity.

use super::{ChatId, UserDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Device identifier of the seeded legacy user.
pub const LEGACY_DEVICE_ID: &str = "default_legacy_user";

/// Prefix of device identifiers minted for chat-platform users.
pub const CHAT_DEVICE_ID_PREFIX: &str = "telegram_";

/// Opaque, unique device identity supplied by a front-end.
///
/// # Examples
///
/// ```
/// use taskkeeper::user::domain::{ChatId, DeviceId};
///
/// let device = DeviceId::parse("  phone-1 ").expect("valid device id");
/// assert_eq!(device.as_str(), "phone-1");
///
/// let chat = ChatId::new(42).expect("non-zero chat id");
/// assert_eq!(DeviceId::for_chat(chat).as_str(), "telegram_42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Validates a device identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyDeviceId`] when nothing remains after
    /// trimming.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, UserDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyDeviceId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Mints a random 128-bit identity, hex encoded.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the device identity used for users first seen on chat.
    #[must_use]
    pub fn for_chat(chat_id: ChatId) -> Self {
        Self(format!("{CHAT_DEVICE_ID_PREFIX}{chat_id}"))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceId {
    type Error = UserDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DeviceId> for String {
    fn from(value: DeviceId) -> Self {
        value.0
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Domain model for users and their external identities.

mod chat_id;
mod device_id;
mod error;
mod ids;
mod user;

pub use chat_id::ChatId;
pub use device_id::{CHAT_DEVICE_ID_PREFIX, DeviceId, LEGACY_DEVICE_ID};
pub use error::UserDomainError;
pub use ids::UserId;
pub use user::{PersistedUserData, User, UserDraft};

//! Domain errors for user identities.

use thiserror::Error;

/// Validation failures for user identities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDomainError {
    /// The device identifier is empty or whitespace.
    #[error("device identifier must not be empty")]
    EmptyDeviceId,

    /// Chat identifiers are non-zero; zero means "unset".
    #[error("chat identifier must not be zero")]
    ZeroChatId,
}

//! Application services for user identity resolution.

mod manager;

pub use manager::{UserManager, UserServiceError, UserServiceResult, generate_device_id};

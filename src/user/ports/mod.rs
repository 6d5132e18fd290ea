//! Port contracts for user persistence.

mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};

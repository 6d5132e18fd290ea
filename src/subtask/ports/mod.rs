//! Port contracts for subtask persistence.

mod repository;

pub use repository::{SubtaskRepository, SubtaskRepositoryError, SubtaskRepositoryResult};

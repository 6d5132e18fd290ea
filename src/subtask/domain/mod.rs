//! Domain model for subtasks.

mod error;
mod ids;
mod subtask;

pub use error::SubtaskDomainError;
pub use ids::SubtaskId;
pub use subtask::{PersistedSubtaskData, Subtask, SubtaskDescription, SubtaskDraft};

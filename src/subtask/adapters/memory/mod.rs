//! In-memory subtask adapter.

mod subtask;

pub use subtask::InMemorySubtaskRepository;

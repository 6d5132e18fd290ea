//! `SQLite` adapter for subtask persistence.

mod models;
mod repository;
mod schema;

pub use repository::SqliteSubtaskRepository;

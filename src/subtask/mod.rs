//! Subtasks: simple checklist items scoped to one parent task.
//!
//! Subtasks have no priority, tags, or due date. The in-memory store does
//! not check that the parent task exists; the `SQLite` store enforces it with
//! a foreign key and removes subtasks together with their parent.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

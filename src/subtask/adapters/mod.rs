//! Adapter implementations of the subtask ports.

pub mod memory;
pub mod sqlite;

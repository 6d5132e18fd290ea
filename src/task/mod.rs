//! Task tracking.
//!
//! Tasks carry a description, a completion flag, a priority, an optional due
//! date, and a set of case-insensitively unique tags. The module follows
//! hexagonal architecture:
//!
//! - Domain types and the storage-agnostic filter engine in [`domain`]
//! - Port contracts in [`ports`]
//! - In-memory and `SQLite` adapters in [`adapters`]
//! - The [`services::TaskManager`] entry point in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Taskkeeper: the task-tracking core behind the web, chat, and command-line
//! front-ends.
//!
//! The crate stores, mutates, and queries to-do items and their subtasks,
//! and resolves external identities to internal users. Front-ends call the
//! managers directly from as many threads as they like; each manager is
//! backed either by a transient in-process store or by `SQLite`.
//!
//! # Architecture
//!
//! Each aggregate follows hexagonal architecture:
//!
//! - **Domain**: validation, normalization, and the filter engine
//! - **Ports**: synchronous repository traits
//! - **Adapters**: in-memory and `SQLite` implementations of the ports
//! - **Services**: the managers front-ends talk to
//!
//! # Modules
//!
//! - [`task`]: tasks, tags, filtering, and upcoming-deadline queries
//! - [`subtask`]: checklist items under a task
//! - [`user`]: device and chat identity resolution
//! - [`storage`]: shared `SQLite` pool and schema setup
//! - [`observability`]: the operation-observer seam for metrics exporters
//! - [`config`]: manager settings

pub mod config;
pub mod observability;
pub mod storage;
pub mod subtask;
pub mod task;
pub mod user;

#[cfg(test)]
mod test_support;

//! User identity resolution.
//!
//! Front-ends know a caller only by an opaque device identifier or a chat
//! platform identifier. This module maps either one to an internal user
//! record, creating the record on first sight, so task queries can be scoped
//! per user.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

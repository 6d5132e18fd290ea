//! Unit tests for user identity resolution.

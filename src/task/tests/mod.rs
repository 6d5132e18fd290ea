//! Unit tests for the task aggregate.

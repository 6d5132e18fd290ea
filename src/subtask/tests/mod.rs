//! Unit tests for the subtask aggregate.

mod manager_tests;

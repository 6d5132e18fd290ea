//! Diesel schema for subtask persistence.

diesel::table! {
    /// Subtask records.
    subtasks (id) {
        /// Subtask identifier.
        id -> BigInt,
        /// Parent task identifier.
        task_id -> BigInt,
        /// Description text.
        description -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Creation timestamp in microseconds since the Unix epoch.
        created_at -> BigInt,
        /// Last update timestamp in microseconds since the Unix epoch.
        updated_at -> BigInt,
    }
}

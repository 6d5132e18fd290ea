//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> BigInt,
        /// Owning user identifier.
        user_id -> BigInt,
        /// Task description.
        description -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Priority (`low`, `medium`, `high`).
        priority -> Text,
        /// Due date in microseconds since the Unix epoch.
        due_date -> Nullable<BigInt>,
        /// Normalized tags as a JSON array.
        tags -> Text,
        /// Creation timestamp in microseconds since the Unix epoch.
        created_at -> BigInt,
        /// Last update timestamp in microseconds since the Unix epoch.
        updated_at -> BigInt,
    }
}

//! Diesel schema for user persistence.

diesel::table! {
    /// User records.
    users (id) {
        /// User identifier.
        id -> BigInt,
        /// Unique device identity.
        device_id -> Text,
        /// Unique chat platform identity.
        telegram_id -> Nullable<BigInt>,
        /// Push notification token.
        push_token -> Nullable<Text>,
        /// Creation timestamp in microseconds since the Unix epoch.
        created_at -> BigInt,
        /// Last update timestamp in microseconds since the Unix epoch.
        updated_at -> BigInt,
    }
}

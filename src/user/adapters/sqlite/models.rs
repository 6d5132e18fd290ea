//! Diesel row models for user persistence.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: i64,
    pub device_id: String,
    pub telegram_id: Option<i64>,
    pub push_token: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub device_id: String,
    pub telegram_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Full-row changeset for user updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct UserChangesetRow {
    pub device_id: String,
    pub telegram_id: Option<i64>,
    pub push_token: Option<String>,
    pub updated_at: i64,
}

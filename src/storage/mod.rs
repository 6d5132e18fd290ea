//! Shared `SQLite` plumbing for the durable adapters.
//!
//! One database file holds tasks, subtasks, and users. [`open_pool`] prepares
//! the file once (WAL journaling and schema) and then hands out an `r2d2`
//! pool whose connections enforce foreign keys and wait on busy locks instead
//! of failing immediately.

use chrono::{DateTime, Utc};
use diesel::ConnectionError;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::sqlite::SqliteConnection;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// `SQLite` connection pool shared by the durable repositories.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Schema for tasks, subtasks, and users.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_todo_tables/up.sql");

/// Settings for opening the durable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Database file path.
    pub path: PathBuf,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// How long a connection waits for a competing writer.
    pub busy_timeout: Duration,
}

impl SqliteConfig {
    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 8,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets the busy timeout.
    #[must_use]
    pub const fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    fn database_url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Errors raised while opening the durable store.
#[derive(Debug, Error)]
pub enum StorageSetupError {
    /// The database file could not be opened.
    #[error("failed to open database: {0}")]
    Connection(#[from] ConnectionError),

    /// Schema setup failed.
    #[error("failed to prepare schema: {0}")]
    Schema(#[from] diesel::result::Error),

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// Per-connection pragmas applied whenever the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let pragmas = format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        );
        connection
            .batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens (creating if needed) the database and returns a connection pool.
///
/// # Errors
///
/// Returns [`StorageSetupError`] when the file cannot be opened, the schema
/// cannot be applied, or the pool cannot be built.
pub fn open_pool(config: &SqliteConfig) -> Result<SqlitePool, StorageSetupError> {
    let url = config.database_url();
    {
        let mut connection = SqliteConnection::establish(&url)?;
        connection.batch_execute("PRAGMA journal_mode = WAL;")?;
        connection.batch_execute(CREATE_SCHEMA_SQL)?;
    }

    let pool = Pool::builder()
        .max_size(config.max_connections)
        .connection_customizer(Box::new(ConnectionPragmas {
            busy_timeout: config.busy_timeout,
        }))
        .build(ConnectionManager::<SqliteConnection>::new(url))?;
    tracing::debug!(path = %config.path.display(), "sqlite pool ready");
    Ok(pool)
}

/// Timestamp value that does not fit the storage representation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("stored timestamp {0} is out of range")]
pub struct InvalidTimestamp(pub i64);

/// Stored identifier that is not a positive integer.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("stored identifier {0} is not a positive integer")]
pub struct InvalidStoredId(pub i64);

/// Converts a timestamp to microseconds since the Unix epoch.
#[must_use]
pub fn to_micros(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_micros()
}

/// Converts microseconds since the Unix epoch back to a timestamp.
///
/// # Errors
///
/// Returns [`InvalidTimestamp`] when the value is out of range.
pub fn from_micros(micros: i64) -> Result<DateTime<Utc>, InvalidTimestamp> {
    DateTime::from_timestamp_micros(micros).ok_or(InvalidTimestamp(micros))
}

/// Converts a stored key to an identifier value.
///
/// # Errors
///
/// Returns [`InvalidStoredId`] when the key is zero or negative.
pub fn id_from_key(key: i64) -> Result<u64, InvalidStoredId> {
    u64::try_from(key)
        .ok()
        .filter(|value| *value > 0)
        .ok_or(InvalidStoredId(key))
}

/// Converts an identifier value to a stored key.
///
/// Identifiers beyond the key range cannot exist in storage, so they map to
/// a key that matches nothing.
#[must_use]
pub fn key_from_id(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(-1)
}

//! Key-value slot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read, replace and delete string payloads addressed by a fixed key.
//!
//! # Invariants
//! - `write_slot` is an upsert that replaces the whole payload.
//! - Missing keys read as `None`, not as an error.

use crate::db::DbError;
use crate::model::note::NoteValidationError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A note failed validation before being written.
    Validation(NoteValidationError),
    /// Serializing the note list failed.
    Encode(serde_json::Error),
    /// The connection has not been migrated to the slot schema.
    SchemaNotReady(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
            Self::SchemaNotReady(table) => {
                write!(f, "storage schema is not ready: missing table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::SchemaNotReady(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Storage contract for one string payload per key.
pub trait SlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes the slot; returns whether it existed.
    fn delete_slot(&self, key: &str) -> RepoResult<bool>;
}

impl<T: SlotRepository + ?Sized> SlotRepository for &T {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write_slot(key, value)
    }

    fn delete_slot(&self, key: &str) -> RepoResult<bool> {
        (**self).delete_slot(key)
    }
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let ready: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_slots'
            );",
            [],
            |row| row.get(0),
        )?;
        if ready != 1 {
            return Err(RepoError::SchemaNotReady("kv_slots"));
        }
        Ok(Self { conn })
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_slot(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

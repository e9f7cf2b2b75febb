//! Key-value store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the `read`/`write`/`delete` surface the metric tracker persists
//!   through.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `write` replaces the whole value stored under a key.
//! - `delete` of a missing key succeeds.

use crate::db::DbError;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for store access and decoding.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("invalid persisted data under `{key}`: {message}")]
    InvalidData { key: String, message: String },
    #[error("missing required table `{0}`")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string-valued key-value storage.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> RepoResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> RepoResult<()>;
    fn delete(&self, key: &str) -> RepoResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write(key, value)
    }

    fn delete(&self, key: &str) -> RepoResult<()> {
        (**self).delete(key)
    }
}

/// SQLite-backed key-value store over the `kv_store` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// Fails with `MissingRequiredTable` when the connection was not opened
    /// through [`crate::db::open_db`] or [`crate::db::open_db_in_memory`].
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "kv_store")? {
            return Err(RepoError::MissingRequiredTable("kv_store"));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        let result = self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        );
        match result {
            Ok(_) => {
                debug!("event=kv_write module=repo status=ok key={key}");
                Ok(())
            }
            Err(err) => {
                error!("event=kv_write module=repo status=error key={key} error={err}");
                Err(err.into())
            }
        }
    }

    fn delete(&self, key: &str) -> RepoResult<()> {
        match self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])
        {
            Ok(removed) => {
                debug!("event=kv_delete module=repo status=ok key={key} removed={removed}");
                Ok(())
            }
            Err(err) => {
                error!("event=kv_delete module=repo status=error key={key} error={err}");
                Err(err.into())
            }
        }
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

//! Database bootstrap and the connection-scoped transaction helper

use rusqlite::{Connection, Transaction};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

const SCHEMA: &str = include_str!("schema.sql");

/// Handle to the on-disk database.
///
/// Holds only the path; every storage call opens its own connection and
/// transaction, so there is no shared state between calls.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

/// Open (or create) the database file at the given path.
///
/// Schema setup is a separate step; see
/// [`ProjectService::create_schema`](crate::services::ProjectService::create_schema).
pub fn open_database(path: &Path) -> Result<Database> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    info!("Opening database at {:?}", path);

    let db = Database {
        path: path.to_path_buf(),
    };

    // Fail early if the file cannot be opened at all.
    db.connect()?;

    Ok(db)
}

/// The schema split into individual statements, in creation order.
pub(crate) fn schema_statements() -> Vec<&'static str> {
    SCHEMA
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .collect()
}

impl Database {
    /// Open a fresh connection with foreign keys enabled.
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(conn)
    }

    /// Run `body` inside a fresh connection-scoped transaction.
    ///
    /// Commits on `Ok`, rolls back on `Err`; the connection is released on
    /// all paths.
    pub fn with_transaction<T, F>(&self, body: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        match body(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                // Dropping an uncommitted transaction rolls it back.
                drop(tx);
                Err(e)
            }
        }
    }
}

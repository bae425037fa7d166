use rusqlite::Connection;
use std::path::Path;
use tokio::task;

use crate::error::{Result, WikigraphError};

/// Database connection wrapper
pub struct Db {
    path: std::path::PathBuf,
}

impl Db {
    /// Create a new database connection manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Open a new database connection with the pragmas the importer relies on.
    ///
    /// foreign_keys must be ON for the triple-table FK constraints to bite;
    /// WAL + NORMAL sync trade durability detail for batch-insert speed.
    pub fn open_connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path).map_err(WikigraphError::Database)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; \
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(conn)
    }

    /// Execute a closure with a database connection in a blocking task
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let mut conn = Connection::open(&path).map_err(WikigraphError::Database)?;
            conn.execute_batch(
                "PRAGMA journal_mode = WAL; \
                 PRAGMA synchronous = NORMAL; \
                 PRAGMA foreign_keys = ON;",
            )?;
            f(&mut conn)
        })
        .await
        .map_err(|_e| WikigraphError::Database(rusqlite::Error::InvalidParameterCount(0, 0)))?
    }
}

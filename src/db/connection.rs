use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::error::{self, Error, StoreContext};

/// Create the three billing tables if they do not exist yet. Amounts are
/// stored as canonical decimal TEXT so they read back exactly as written.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address TEXT,
            phone TEXT,
            email TEXT NOT NULL UNIQUE
        )",
        [],
    )
    .context("failed to create customers table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS bills (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id INTEGER NOT NULL,
            bill_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            total_amount TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            FOREIGN KEY(customer_id) REFERENCES customers(id)
        )",
        [],
    )
    .context("failed to create bills table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS bill_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_id INTEGER NOT NULL,
            item_name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            unit_price TEXT NOT NULL,
            total_item_price TEXT NOT NULL,
            FOREIGN KEY(bill_id) REFERENCES bills(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create bill_items table")?;

    Ok(())
}

/// Hands out one SQLite connection per request. The handle itself is only a
/// path, so it is cheap to clone into the router state.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Make sure the data directory and tables exist. Called once at startup.
    pub fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("failed to create data directory")?;
            }
        }

        let conn = self.connect().context("failed to open SQLite database")?;
        ensure_schema(&conn)?;
        tracing::info!(path = %self.path.display(), "database ready");
        Ok(())
    }

    /// Open a fresh connection with foreign keys enforced.
    pub fn connect(&self) -> error::Result<Connection> {
        let conn = Connection::open(&self.path).store_context("failed to open database")?;
        conn.execute("PRAGMA foreign_keys = ON", [])
            .store_context("failed to enable foreign keys")?;
        Ok(conn)
    }

    /// Run one request's worth of store work on the blocking pool. The
    /// connection is opened right before `work` and closed when it returns,
    /// whether it succeeded or not.
    pub async fn run<F, T>(&self, work: F) -> error::Result<T>
    where
        F: FnOnce(&mut Connection) -> error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db.connect()?;
            work(&mut conn)
        })
        .await
        .map_err(|err| Error::Worker(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(tables, ["bill_items", "bills", "customers"]);
    }

    #[tokio::test]
    async fn run_opens_a_connection_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("nested").join("billing.sqlite"));
        db.initialize().unwrap();

        let fk: i64 = db
            .run(|conn| {
                conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))
                    .store_context("failed to read pragma")
            })
            .await
            .unwrap();
        assert_eq!(fk, 1);

        let failed = db
            .run(|_conn| -> error::Result<()> {
                Err(Error::NotFound {
                    entity: "Bill",
                    id: 1,
                })
            })
            .await;
        assert!(matches!(failed, Err(Error::NotFound { .. })));
    }
}

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::StorageError;
use crate::domain::traits::VariableStore;

/// SQLite-backed variable store
///
/// One row per variable in `variables`, one row per candidate value in
/// `"values"`. Queries are short, so the connection sits behind a plain mutex
/// and the async trait methods run them inline on the calling runtime thread.
/// Move them onto `tokio::task::spawn_blocking` if queries ever get heavier.
pub struct SqliteVariableStore {
    conn: Mutex<Connection>,
}

impl SqliteVariableStore {
    pub fn new(path: impl AsRef<Path>) -> SqliteResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> SqliteResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> SqliteResult<Self> {
        init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Unavailable("Lock poisoned".to_string()))
    }

    /// Add a candidate value, creating the variable on first use
    pub fn add_value(&self, name: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO variables (name) VALUES (?1)",
            [name],
        )?;
        tx.execute(
            r#"INSERT INTO "values" (var_id, value)
               SELECT id, ?2 FROM variables WHERE name = ?1"#,
            [name, value],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a variable and all its values
    pub fn remove_variable(&self, name: &str) -> Result<bool, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"DELETE FROM "values"
               WHERE var_id IN (SELECT id FROM variables WHERE name = ?1)"#,
            [name],
        )?;
        let rows = tx.execute("DELETE FROM variables WHERE name = ?1", [name])?;
        tx.commit()?;
        Ok(rows > 0)
    }
}

fn init_tables(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS variables (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        )",
        [],
    )?;

    conn.execute(
        r#"CREATE TABLE IF NOT EXISTS "values" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            var_id INTEGER NOT NULL,
            value TEXT NOT NULL,
            FOREIGN KEY (var_id) REFERENCES variables(id)
        )"#,
        [],
    )?;

    conn.execute(
        r#"CREATE INDEX IF NOT EXISTS idx_values_var ON "values"(var_id)"#,
        [],
    )?;

    Ok(())
}

#[async_trait]
impl VariableStore for SqliteVariableStore {
    async fn resolve_random(&self, name: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                r#"SELECT v.value FROM variables AS va
                   INNER JOIN "values" AS v ON va.id = v.var_id
                   WHERE va.name = ?1
                   ORDER BY random() LIMIT 1"#,
                [name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn list_names(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM variables ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for name in rows {
            match name {
                Ok(name) => names.push(name),
                Err(e) => tracing::warn!("Skipping unreadable variable row: {}", e),
            }
        }
        Ok(names)
    }
}

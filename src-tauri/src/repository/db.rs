//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection handle used by every repository
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
///
/// The connection slot starts empty and is filled once migrations ran,
/// so the window can open before the database is ready.
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether a migrated connection has been installed
    pub async fn is_ready(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

/// Error for calls that arrive before `init_db` finished
pub(crate) fn not_initialized() -> DomainError {
    DomainError::Storage("Database not initialized".to_string())
}

/// Id of the row just inserted through `conn`
pub(crate) fn inserted_id(conn: &Connection) -> DomainResult<u32> {
    let rowid = conn.last_insert_rowid();
    u32::try_from(rowid).map_err(|_| DomainError::Storage(format!("row id {} out of range", rowid)))
}

/// Open (or create) the database at `db_path` and run migrations.
///
/// `":memory:"` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };

    run_migrations(&conn)?;

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);

    log::info!("database ready at {}", db_path.display());
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS nodes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS node_clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            node_id INTEGER NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            updated_at INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS client_users (
            client_id INTEGER NOT NULL REFERENCES node_clients(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            enable INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (client_id, user_id)
        );",
    )?;

    // Added after the first release
    if !column_exists(conn, "nodes", "address")? {
        conn.execute("ALTER TABLE nodes ADD COLUMN address TEXT", ())?;
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_node_clients_node ON node_clients(node_id);
        CREATE INDEX IF NOT EXISTS idx_client_users_user ON client_users(user_id, sort_order);",
    )?;

    Ok(())
}

/// Milliseconds since epoch for `updated_at` columns
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let state = init_db(Path::new(":memory:")).await.unwrap();
        let guard = state.conn.lock().await;
        let conn = guard.as_ref().unwrap();

        run_migrations(conn).unwrap();
        assert!(column_exists(conn, "nodes", "address").unwrap());
        assert!(column_exists(conn, "client_users", "sort_order").unwrap());
    }

    #[tokio::test]
    async fn test_new_state_is_not_ready() {
        assert!(!DbState::new().is_ready().await);
        assert!(init_db(Path::new(":memory:")).await.unwrap().is_ready().await);
    }
}

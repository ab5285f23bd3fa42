//! Database connection management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use super::errors::StoreResult;

/// Default database file name
pub const DEFAULT_DATABASE_FILE: &str = "trivia.db";

/// How long SQLite waits on a locked database before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQL function lowering text with Unicode case rules
pub const CASEFOLD_FUNCTION: &str = "casefold";

/// Location of the trivia database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPath {
    path: PathBuf,
}

impl DbPath {
    /// Create a DbPath from any path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path as a reference.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Check if the database file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for DbPath {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_FILE)
    }
}

/// Open a connection to the database at the given path.
///
/// Foreign keys are switched on for every connection, so a question can only
/// point at an existing category.
pub fn open(path: &DbPath, busy_timeout: Duration) -> StoreResult<Connection> {
    let conn = Connection::open(path.as_path())?;
    configure(&conn, busy_timeout)?;
    Ok(conn)
}

/// Open an in-memory database, used by tests and throwaway servers.
pub fn open_in_memory() -> StoreResult<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn, DEFAULT_BUSY_TIMEOUT)?;
    Ok(conn)
}

fn configure(conn: &Connection, busy_timeout: Duration) -> StoreResult<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(busy_timeout)?;
    register_casefold(conn)?;
    Ok(())
}

/// SQLite's `lower()` and `LIKE` only fold ASCII letters.
fn register_casefold(conn: &Connection) -> StoreResult<()> {
    conn.create_scalar_function(
        CASEFOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

use rusqlite::Connection;

use crate::BoxError;

pub type StoreResult<T> = std::result::Result<T, BoxError>;

/// A connection capable of executing arbitrary SQL text and answering
/// simple single-column queries.
///
/// The runner owns the store exclusively for the duration of a run; both
/// ledger access and migration statements go through this one handle.
pub trait SqlStore {
    /// Execute a statement, discarding any result rows.
    fn execute(&mut self, sql: &str) -> StoreResult<()>;

    /// Run a query and return the first column of every row as text.
    fn query_strings(&mut self, sql: &str) -> StoreResult<Vec<String>>;
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl SqlStore for SqliteStore {
    fn execute(&mut self, sql: &str) -> StoreResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query_strings(&mut self, sql: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

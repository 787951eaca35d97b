use std::collections::HashSet;

use crate::store::SqlStore;
use crate::{Result, SqlMigrateError};

pub const DEFAULT_LEDGER_TABLE: &str = "schema_migrations";

/// Append-only record of successfully applied migrations.
///
/// The engine only ever writes success rows; a failed script never reaches
/// the write step, so the ledger doubles as the source of truth for
/// "already applied" checks. Rows are never updated or deleted.
pub struct Ledger {
    table: String,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_TABLE)
    }
}

impl Ledger {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Create the ledger table if it does not exist. Safe to call every run.
    ///
    /// The minimal shape carries no uniqueness constraint on `version`; the
    /// runner is the dedup authority. A pre-created table with stronger
    /// constraints is left alone.
    pub fn ensure_schema(&self, store: &mut dyn SqlStore) -> Result<()> {
        store.execute(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                version TEXT NOT NULL,
                description TEXT NOT NULL,
                checksum TEXT NOT NULL,
                installed_on TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                execution_time_ms INTEGER NOT NULL,
                success INTEGER NOT NULL DEFAULT 1
            )",
            self.table
        ))?;
        Ok(())
    }

    /// Versions with a recorded success row.
    pub fn applied_versions(&self, store: &mut dyn SqlStore) -> Result<HashSet<u32>> {
        let rows = store.query_strings(&format!(
            "SELECT version FROM {} WHERE success = 1",
            self.table
        ))?;
        rows.iter()
            .map(|v| {
                v.parse::<u32>().map_err(|_| {
                    SqlMigrateError::Ledger(format!("non-numeric version in ledger: {v}"))
                })
            })
            .collect()
    }

    /// The checksum recorded for `version`, or `None` if never recorded.
    pub fn checksum_for(&self, store: &mut dyn SqlStore, version: u32) -> Result<Option<String>> {
        let rows = store.query_strings(&format!(
            "SELECT checksum FROM {} WHERE version = '{}'",
            self.table, version
        ))?;
        Ok(rows.into_iter().next())
    }

    /// Append one success row. `installed_on` is assigned by the store.
    pub fn record(
        &self,
        store: &mut dyn SqlStore,
        version: u32,
        description: &str,
        checksum: &str,
        execution_time_ms: u64,
    ) -> Result<()> {
        store.execute(&format!(
            "INSERT INTO {} (version, description, checksum, execution_time_ms, success) \
             VALUES ('{}', '{}', '{}', {}, 1)",
            self.table,
            version,
            sql_escape(description),
            checksum,
            execution_time_ms
        ))?;
        Ok(())
    }
}

/// Double embedded single quotes so a slug can be inlined as a SQL literal.
/// The store seam is text-only, so the ledger has no parameter binding.
fn sql_escape(s: &str) -> String {
    s.replace('\'', "''")
}

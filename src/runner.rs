use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::checksum::checksum;
use crate::ledger::Ledger;
use crate::retry::{RetryError, RetryPolicy, Shutdown};
use crate::script::{self, MigrationScript};
use crate::source::ScriptSource;
use crate::splitter::split_statements;
use crate::store::SqlStore;
use crate::{Result, SqlMigrateError};

/// Applies pending migration scripts to a store, exactly once each.
///
/// The runner owns the store for the duration of a run; nothing else may
/// issue statements through it while a run is in progress. One runner
/// instance per deployment: the ledger is not protected against concurrent
/// writers from other processes.
pub struct MigrationRunner<S: SqlStore> {
    store: S,
    ledger: Ledger,
    retry: RetryPolicy,
    shutdown: Shutdown,
}

impl<S: SqlStore> MigrationRunner<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ledger: Ledger::default(),
            retry: RetryPolicy::default(),
            shutdown: Shutdown::new(),
        }
    }

    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Apply every pending script in ascending version order.
    ///
    /// Returns the versions applied by this run. Scripts already in the
    /// ledger are skipped; a checksum mismatch against the ledger is logged
    /// as drift but never re-executed. The first statement to exhaust its
    /// retries aborts the whole run: nothing is recorded for the failing
    /// script and no later script is attempted.
    pub fn run(&mut self, source: &dyn ScriptSource) -> Result<Vec<u32>> {
        self.ledger.ensure_schema(&mut self.store)?;

        let scripts = script::discover(source)?;
        if scripts.is_empty() {
            info!("No migration scripts found");
            return Ok(vec![]);
        }

        let applied = self.ledger.applied_versions(&mut self.store)?;

        let mut newly_applied = Vec::new();
        for script in &scripts {
            if applied.contains(&script.version) {
                self.check_drift(script)?;
                continue;
            }
            self.apply(script)?;
            newly_applied.push(script.version);
        }

        Ok(newly_applied)
    }

    /// Compare the current content hash against the recorded one.
    ///
    /// A mismatch means the script was edited after it was applied. The run
    /// continues past it; re-executing would double-apply the old version.
    fn check_drift(&mut self, script: &MigrationScript) -> Result<()> {
        let recorded = self.ledger.checksum_for(&mut self.store, script.version)?;
        let current = checksum(script.content.as_bytes());
        if let Some(recorded) = recorded {
            if recorded != current {
                warn!(
                    "Checksum mismatch for migration {} - expected: {}, actual: {}",
                    script.file_name, recorded, current
                );
            }
        }
        debug!("Skipping already applied migration: {}", script.file_name);
        Ok(())
    }

    fn apply(&mut self, script: &MigrationScript) -> Result<()> {
        info!("Applying migration: {}", script.file_name);
        let start = Instant::now();

        for statement in split_statements(&script.content) {
            if self.shutdown.is_triggered() {
                return Err(SqlMigrateError::Interrupted {
                    script: script.file_name.clone(),
                });
            }
            self.execute_statement(script, &statement)?;
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        self.ledger.record(
            &mut self.store,
            script.version,
            &script.description,
            &checksum(script.content.as_bytes()),
            elapsed_ms,
        )?;
        info!("Applied migration {} in {} ms", script.file_name, elapsed_ms);
        Ok(())
    }

    fn execute_statement(&mut self, script: &MigrationScript, statement: &str) -> Result<()> {
        let store = &mut self.store;
        self.retry
            .run(&self.shutdown, &script.file_name, || store.execute(statement))
            .map_err(|e| match e {
                RetryError::Exhausted { attempts, source } => {
                    error!(
                        "Failed to execute statement in {} after {} attempts: {}",
                        script.file_name, attempts, source
                    );
                    SqlMigrateError::StatementFailed {
                        script: script.file_name.clone(),
                        attempts,
                        source,
                    }
                }
                RetryError::Interrupted => SqlMigrateError::Interrupted {
                    script: script.file_name.clone(),
                },
            })
    }
}

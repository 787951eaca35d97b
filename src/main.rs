use anyhow::Result;
use tracing::{error, info};

use sqlmigrate::config::Config;
use sqlmigrate::ledger::Ledger;
use sqlmigrate::retry::Shutdown;
use sqlmigrate::runner::MigrationRunner;
use sqlmigrate::source::DirSource;
use sqlmigrate::store::SqliteStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.clone())
        .init();

    info!("sqlmigrate v{}", env!("CARGO_PKG_VERSION"));

    // A ctrl-c mid-run aborts cleanly: the backoff sleep wakes up and the
    // engine reports the interruption without recording a partial script.
    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown requested, aborting migration run");
            shutdown.trigger();
        });
    }

    let conn = rusqlite::Connection::open(&config.database)
        .map_err(|e| anyhow::anyhow!("Failed to open database: {}", e))?;

    let source = DirSource::new(&config.scripts_dir);
    let mut runner = MigrationRunner::new(SqliteStore::new(conn))
        .with_ledger(Ledger::new(config.ledger_table.as_str()))
        .with_retry(config.retry_policy())
        .with_shutdown(shutdown);

    let result = tokio::task::spawn_blocking(move || runner.run(&source)).await?;

    match result {
        Ok(applied) if applied.is_empty() => {
            info!("No pending migrations. Ledger is up to date.");
        }
        Ok(applied) => {
            info!("Successfully applied {} migrations: {:?}", applied.len(), applied);
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

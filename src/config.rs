use clap::Parser;
use std::time::Duration;

use crate::retry::RetryPolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "sqlmigrate")]
#[command(about = "Versioned SQL schema migrations with checksum drift detection", long_about = None)]
pub struct Config {
    #[arg(short, long, default_value = "sqlite.db", env = "SQLMIGRATE_DATABASE")]
    pub database: String,

    #[arg(short, long, default_value = "migrations", env = "SQLMIGRATE_SCRIPTS_DIR", help = "Directory containing V<version>__<description>.sql scripts")]
    pub scripts_dir: String,

    #[arg(long, default_value = "schema_migrations", env = "SQLMIGRATE_LEDGER_TABLE", help = "Table recording applied migrations")]
    pub ledger_table: String,

    #[arg(long, default_value = "5", env = "SQLMIGRATE_MAX_RETRIES", help = "Attempts per statement before aborting the run")]
    pub max_retries: u32,

    #[arg(long, default_value = "3000", env = "SQLMIGRATE_INITIAL_BACKOFF_MS", help = "First retry delay in ms; doubles after every failed attempt")]
    pub initial_backoff_ms: u64,

    #[arg(long, default_value = "info", env = "SQLMIGRATE_LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Get a configuration instance with all values resolved from CLI args and environment variables
    pub fn load() -> Self {
        Config::parse()
    }

    /// Get the retry policy configured for this run
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.initial_backoff_ms),
        )
    }
}

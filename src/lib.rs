pub mod checksum;
pub mod config;
pub mod ledger;
pub mod retry;
pub mod runner;
pub mod script;
pub mod source;
pub mod splitter;
pub mod store;

use thiserror::Error;

/// Boxed error produced by a pluggable store backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum SqlMigrateError {
    #[error("Invalid migration script name: {name}")]
    InvalidScriptName { name: String },

    #[error("Duplicate migration version {version}: {first} and {second}")]
    DuplicateVersion {
        version: u32,
        first: String,
        second: String,
    },

    #[error("Statement in {script} failed after {attempts} attempts: {source}")]
    StatementFailed {
        script: String,
        attempts: u32,
        #[source]
        source: BoxError,
    },

    #[error("Migration run interrupted while applying {script}")]
    Interrupted { script: String },

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Store error: {0}")]
    Store(#[from] BoxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SqlMigrateError>;

pub use ledger::Ledger;
pub use retry::{RetryPolicy, Shutdown};
pub use runner::MigrationRunner;
pub use script::MigrationScript;
pub use source::{DirSource, ScriptSource};
pub use store::{SqlStore, SqliteStore};

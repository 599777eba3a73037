//! Error types for relaydb-store

use std::path::PathBuf;

use relaydb_core::TimezoneError;
use thiserror::Error;

use crate::dialect::UnsupportedDialect;

pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Startup failures. Each variant names the bootstrap step that failed.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("timezone init failed: {0}")]
    Timezone(#[from] TimezoneError),

    #[error("get database dialect failed: {0}")]
    Dialect(#[from] UnsupportedDialect),

    #[error("create sqlite data directory {path:?} failed: {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("connect to {dialect} database failed: {source}")]
    ConnectionOpen {
        dialect: &'static str,
        source: sqlx::Error,
    },

    #[error("{statement} failed: {source}")]
    Pragma {
        statement: &'static str,
        source: sqlx::Error,
    },

    #[error("schema sync failed: {0}")]
    SchemaSync(#[source] sqlx::Error),
}

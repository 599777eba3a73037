//! Connection bootstrap
//!
//! One-time, sequential startup: timezone, dialect, DSN, data directory,
//! pool, sqlite pragmas, schema sync. Any failing step aborts the rest.

use relaydb_core::{timezone, Settings};
use tracing::{debug, info};

use crate::connector::{DbPool, OpenOptions, StatementLog, DEFAULT_MAX_CONNECTIONS};
use crate::dialect::{get_dialect, DialectKind};
use crate::dsn::SqliteDsn;
use crate::error::{BootstrapError, BootstrapResult};
use crate::schema::SchemaSync;

/// Pragmas every sqlite connection gets at startup, in order.
pub const SQLITE_PRAGMAS: [&str; 2] = ["PRAGMA journal_mode=WAL", "PRAGMA foreign_keys=ON"];

/// Bring up a configured pool and synchronize the schema.
///
/// # Errors
///
/// Returns the [`BootstrapError`] of the first step that fails.
pub async fn init_db(settings: &Settings, schema: &dyn SchemaSync) -> BootstrapResult<DbPool> {
    // Timezone first: DSN construction depends on it
    let tz = timezone::init(&settings.timezone)?;

    let dialect = get_dialect(&settings.database.db_type)?;
    info!(dialect = dialect.name(), timezone = %tz, mode = %settings.server.mode, "initializing database");

    let options = open_options(settings);
    let dsn = dialect.dsn_with_timezone(&settings.database.connection_string(), tz.name());

    if dialect.kind() == DialectKind::Sqlite {
        ensure_data_dir(&dsn)?;
    }

    let pool = dialect
        .connector(&dsn)
        .open(&options)
        .await
        .map_err(|source| BootstrapError::ConnectionOpen {
            dialect: dialect.name(),
            source,
        })?;

    if dialect.kind() == DialectKind::Sqlite {
        apply_sqlite_pragmas(&pool).await?;
    }

    schema
        .sync(&pool, dialect)
        .await
        .map_err(BootstrapError::SchemaSync)?;

    info!(dialect = dialect.name(), "database ready");
    Ok(pool)
}

fn open_options(settings: &Settings) -> OpenOptions {
    let statement_log = if settings.server.mode.is_debug() {
        StatementLog::Verbose
    } else {
        StatementLog::Default
    };

    OpenOptions {
        max_connections: settings
            .database
            .max_connections
            .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        statement_log,
        enforce_sqlite_pragmas: true,
        ..OpenOptions::default()
    }
}

/// Create the directory holding the sqlite file named by `dsn`.
fn ensure_data_dir(dsn: &str) -> BootstrapResult<()> {
    let Some(dir) = SqliteDsn::parse(dsn).parent_dir() else {
        return Ok(());
    };

    debug!(path = %dir.display(), "ensuring sqlite data directory");
    std::fs::create_dir_all(&dir)
        .map_err(|source| BootstrapError::DirectoryCreation { path: dir, source })
}

async fn apply_sqlite_pragmas(pool: &DbPool) -> BootstrapResult<()> {
    for statement in SQLITE_PRAGMAS {
        pool.execute(statement)
            .await
            .map_err(|source| BootstrapError::Pragma { statement, source })?;
        debug!(statement, "applied sqlite pragma");
    }
    Ok(())
}

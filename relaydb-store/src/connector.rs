//! Connectors and the opened pool
//!
//! A [`Connector`] is what a dialect hands out: a backend tag plus the DSN.
//! Opening it yields a [`DbPool`], a thin wrapper over the sqlx pool for that
//! backend. Pooling policy beyond the connection cap belongs to sqlx.

use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{ConnectOptions, Database, Postgres, Sqlite};
use tracing::warn;

use crate::dialect::DialectKind;
use crate::dsn::SqliteDsn;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time to wait for a pooled connection.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// How loudly sqlx logs executed statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatementLog {
    /// sqlx defaults (statements at DEBUG)
    #[default]
    Default,
    /// Every statement at INFO
    Verbose,
}

/// Pool settings passed to [`Connector::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub statement_log: StatementLog,
    /// Open every sqlite connection with WAL and foreign keys on,
    /// overriding `_fk`/`_foreign_keys` in the DSN
    pub enforce_sqlite_pragmas: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            statement_log: StatementLog::Default,
            enforce_sqlite_pragmas: false,
        }
    }
}

/// Backend-specific descriptor for opening a connection pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connector {
    Postgres { dsn: String },
    Sqlite { dsn: String },
}

impl Connector {
    pub fn postgres(dsn: impl Into<String>) -> Self {
        Self::Postgres { dsn: dsn.into() }
    }

    pub fn sqlite(dsn: impl Into<String>) -> Self {
        Self::Sqlite { dsn: dsn.into() }
    }

    pub fn kind(&self) -> DialectKind {
        match self {
            Self::Postgres { .. } => DialectKind::Postgres,
            Self::Sqlite { .. } => DialectKind::Sqlite,
        }
    }

    pub fn dsn(&self) -> &str {
        match self {
            Self::Postgres { dsn } | Self::Sqlite { dsn } => dsn,
        }
    }

    /// Open a pool against this connector's DSN.
    ///
    /// # Errors
    ///
    /// Returns an error if the DSN is malformed or the first connection fails.
    pub async fn open(&self, options: &OpenOptions) -> Result<DbPool, sqlx::Error> {
        match self {
            Self::Postgres { dsn } => {
                let mut connect = PgConnectOptions::from_str(dsn)?;
                if options.statement_log == StatementLog::Verbose {
                    connect = connect.log_statements(LevelFilter::Info);
                }

                let pool = PgPoolOptions::new()
                    .max_connections(options.max_connections)
                    .acquire_timeout(options.acquire_timeout)
                    .connect_with(connect)
                    .await?;
                Ok(DbPool::Postgres(pool))
            }
            Self::Sqlite { dsn } => {
                let mut connect = sqlite_connect_options(dsn)?;
                if options.enforce_sqlite_pragmas {
                    connect = connect
                        .journal_mode(SqliteJournalMode::Wal)
                        .foreign_keys(true);
                }
                if options.statement_log == StatementLog::Verbose {
                    connect = connect.log_statements(LevelFilter::Info);
                }

                let pool = SqlitePoolOptions::new()
                    .max_connections(options.max_connections)
                    .acquire_timeout(options.acquire_timeout)
                    .connect_with(connect)
                    .await?;
                Ok(DbPool::Sqlite(pool))
            }
        }
    }
}

/// Translate a sqlite DSN into sqlx options.
///
/// Understands `mode` (ro/rw/rwc/memory), `cache`, `_fk`/`_foreign_keys` and
/// `_busy_timeout` (milliseconds). Missing files are created unless the mode
/// says otherwise.
fn sqlite_connect_options(dsn: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    let parsed = SqliteDsn::parse(dsn);

    let mut options = if parsed.is_memory() {
        SqliteConnectOptions::from_str("sqlite::memory:")?
    } else {
        SqliteConnectOptions::new()
            .filename(parsed.path)
            .create_if_missing(true)
    };

    for (key, value) in parsed.params() {
        options = match key {
            "mode" => match value {
                "ro" => options.read_only(true).create_if_missing(false),
                "rw" => options.create_if_missing(false),
                "rwc" => options.create_if_missing(true),
                "memory" => options,
                other => {
                    return Err(sqlx::Error::Configuration(
                        format!("unknown sqlite mode '{other}' in dsn").into(),
                    ))
                }
            },
            "cache" => options.shared_cache(value == "shared"),
            "_fk" | "_foreign_keys" => options.foreign_keys(is_truthy(value)),
            "_busy_timeout" => {
                let millis = value.parse::<u64>().map_err(|e| {
                    sqlx::Error::Configuration(format!("invalid _busy_timeout '{value}': {e}").into())
                })?;
                options.busy_timeout(Duration::from_millis(millis))
            }
            other => {
                warn!(param = other, "ignoring unrecognized sqlite dsn parameter");
                options
            }
        };
    }

    Ok(options)
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

/// A connection that can report which backend it talks to.
pub trait BackendIdentity {
    /// Backend name as the driver reports it (e.g. `"PostgreSQL"`, `"SQLite"`).
    fn backend_name(&self) -> &str;
}

/// An open pool for one of the supported backends.
#[derive(Debug, Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    pub fn kind(&self) -> DialectKind {
        match self {
            Self::Postgres(_) => DialectKind::Postgres,
            Self::Sqlite(_) => DialectKind::Sqlite,
        }
    }

    pub fn as_postgres(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(pool) => Some(pool),
            Self::Sqlite(_) => None,
        }
    }

    pub fn as_sqlite(&self) -> Option<&SqlitePool> {
        match self {
            Self::Sqlite(pool) => Some(pool),
            Self::Postgres(_) => None,
        }
    }

    /// Execute a statement, returning the affected row count.
    pub async fn execute(&self, sql: &str) -> Result<u64, sqlx::Error> {
        let result = match self {
            Self::Postgres(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
            Self::Sqlite(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
        };
        Ok(result)
    }

    /// Close the pool gracefully.
    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Self::Postgres(pool) => pool.is_closed(),
            Self::Sqlite(pool) => pool.is_closed(),
        }
    }
}

impl BackendIdentity for DbPool {
    fn backend_name(&self) -> &str {
        match self {
            Self::Postgres(_) => Postgres::NAME,
            Self::Sqlite(_) => Sqlite::NAME,
        }
    }
}

impl BackendIdentity for PgPool {
    fn backend_name(&self) -> &str {
        Postgres::NAME
    }
}

impl BackendIdentity for SqlitePool {
    fn backend_name(&self) -> &str {
        Sqlite::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_reports_kind_and_dsn() {
        let connector = Connector::sqlite("data/app.db?_fk=1");
        assert_eq!(connector.kind(), DialectKind::Sqlite);
        assert_eq!(connector.dsn(), "data/app.db?_fk=1");
    }

    #[test]
    fn sqlite_options_reject_unknown_mode() {
        let err = sqlite_connect_options("app.db?mode=bogus").unwrap_err();
        assert!(matches!(err, sqlx::Error::Configuration(_)));
    }

    #[test]
    fn sqlite_options_reject_bad_busy_timeout() {
        assert!(sqlite_connect_options("app.db?_busy_timeout=soon").is_err());
        assert!(sqlite_connect_options("app.db?_busy_timeout=5000&_fk=1").is_ok());
    }

    #[tokio::test]
    async fn opens_in_memory_sqlite() {
        let pool = Connector::sqlite(":memory:")
            .open(&OpenOptions::default())
            .await
            .unwrap();
        assert_eq!(pool.kind(), DialectKind::Sqlite);
        assert_eq!(pool.backend_name(), "SQLite");

        // Verify we can execute a query
        let row: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(pool.as_sqlite().unwrap())
            .await
            .unwrap();
        assert_eq!(row.0, 1);

        pool.close().await;
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn creates_missing_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");
        let dsn = format!("{}?_fk=1", path.display());

        let pool = Connector::sqlite(dsn)
            .open(&OpenOptions::default())
            .await
            .unwrap();
        assert!(path.exists());

        let row: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(pool.as_sqlite().unwrap())
            .await
            .unwrap();
        assert_eq!(row.0, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn enforced_pragmas_override_dsn_on_every_connection() {
        let dir = tempfile::tempdir().unwrap();
        let dsn = format!("{}?_fk=0", dir.path().join("fk.db").display());
        let options = OpenOptions {
            enforce_sqlite_pragmas: true,
            ..OpenOptions::default()
        };

        let pool = Connector::sqlite(dsn).open(&options).await.unwrap();
        let sqlite = pool.as_sqlite().unwrap();

        // Hold the connections so each query lands on a different one
        let mut held = Vec::new();
        for _ in 0..3 {
            held.push(sqlite.acquire().await.unwrap());
        }
        for conn in &mut held {
            let (fk,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(fk, 1);

            let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(mode.to_lowercase(), "wal");
        }

        drop(held);
        pool.close().await;
    }

    #[tokio::test]
    async fn read_only_mode_does_not_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let dsn = format!("sqlite://{}?mode=ro", path.display());

        let result = Connector::sqlite(dsn).open(&OpenOptions::default()).await;
        assert!(result.is_err());
        assert!(!path.exists());
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p relaydb-store

    #[tokio::test]
    #[ignore = "requires database"]
    async fn opens_postgres() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = Connector::postgres(url)
            .open(&OpenOptions::default())
            .await
            .expect("pool creation failed");

        assert_eq!(pool.backend_name(), "PostgreSQL");
        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(pool.as_postgres().unwrap())
            .await
            .expect("query failed");
        assert_eq!(result.0, 1);
    }
}

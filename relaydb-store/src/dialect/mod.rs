//! SQL dialects for the supported backends
//!
//! Each dialect is a stateless strategy that supplies the small SQL fragments
//! that differ between PostgreSQL and SQLite. Resolve one with
//! [`get_dialect`]; the returned reference points at a static instance.

mod postgres;
mod sqlite;

pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::connector::Connector;

/// Canonical names accepted by [`get_dialect`], in display order.
pub const SUPPORTED_DIALECTS: [&str; 2] = ["postgres", "sqlite"];

static POSTGRES: PostgresDialect = PostgresDialect;
static SQLITE: SqliteDialect = SqliteDialect;

/// Closed set of backends a [`Dialect`] can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    Postgres,
    Sqlite,
}

/// Backend-specific SQL syntax.
pub trait Dialect: Send + Sync {
    /// Canonical lowercase identifier.
    fn name(&self) -> &'static str;

    fn kind(&self) -> DialectKind;

    /// Descriptor the pool layer uses to open a physical connection.
    fn connector(&self, dsn: &str) -> Connector;

    /// Operator token for case-insensitive pattern matching.
    fn case_insensitive_like(&self) -> &'static str;

    /// Expression extracting the text value at `key` from a JSON column.
    fn json_extract(&self, column: &str, key: &str) -> String;

    /// Whether the backend has a native array column type.
    fn supports_array_type(&self) -> bool;

    /// Connection string adjusted so the session runs in timezone `tz`.
    fn dsn_with_timezone(&self, dsn: &str, tz: &str) -> String;
}

impl std::fmt::Debug for dyn Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dialect").field(&self.name()).finish()
    }
}

/// The backend type string matched no supported dialect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported database type: {db_type} (supported: {})", .supported.join(", "))]
pub struct UnsupportedDialect {
    pub db_type: String,
    pub supported: &'static [&'static str],
}

/// Resolve a backend type (case-insensitive, with aliases) to its dialect.
///
/// Accepts `postgres`/`postgresql` and `sqlite`/`sqlite3`. Anything else is
/// an error; there is no default.
pub fn get_dialect(db_type: &str) -> Result<&'static dyn Dialect, UnsupportedDialect> {
    match db_type.to_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(&POSTGRES),
        "sqlite" | "sqlite3" => Ok(&SQLITE),
        _ => Err(UnsupportedDialect {
            db_type: db_type.to_string(),
            supported: &SUPPORTED_DIALECTS,
        }),
    }
}

/// The static dialect for `kind`.
pub fn dialect_for(kind: DialectKind) -> &'static dyn Dialect {
    match kind {
        DialectKind::Postgres => &POSTGRES,
        DialectKind::Sqlite => &SQLITE,
    }
}

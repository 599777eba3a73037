use super::{Dialect, DialectKind};
use crate::connector::Connector;

/// SQLite dialect.
///
/// SQLite's `LIKE` folds case for ASCII letters only, so
/// [`Dialect::case_insensitive_like`] matches PostgreSQL's `ILIKE` for ASCII
/// patterns but not for other scripts (`'É' LIKE 'é'` is false).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn connector(&self, dsn: &str) -> Connector {
        Connector::sqlite(dsn)
    }

    fn case_insensitive_like(&self) -> &'static str {
        "LIKE"
    }

    fn json_extract(&self, column: &str, key: &str) -> String {
        format!("json_extract({column}, '$.{key}')")
    }

    fn supports_array_type(&self) -> bool {
        false
    }

    // No session timezone in sqlite
    fn dsn_with_timezone(&self, dsn: &str, _tz: &str) -> String {
        dsn.to_string()
    }
}

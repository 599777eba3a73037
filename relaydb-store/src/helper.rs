//! Dialect-aware SQL fragments for the repository tier
//!
//! Repositories build queries with these fragments so the same code runs on
//! either backend:
//!
//! ```ignore
//! let helper = DbHelper::new(&pool);
//! let sql = format!(
//!     "SELECT id FROM users WHERE {}",
//!     helper.case_insensitive_like_multiple(&["email", "username"])
//! );
//! ```

use tracing::warn;

use crate::connector::BackendIdentity;
use crate::dialect::{get_dialect, Dialect, DialectKind, UnsupportedDialect};

/// Fragment builder bound to one resolved dialect.
///
/// # Fallback
///
/// [`DbHelper::new`] resolves unrecognized backend names to PostgreSQL
/// instead of failing, and logs a warning when it does. Against a
/// non-PostgreSQL connection that produces PostgreSQL syntax, so queries fail
/// at execution rather than at construction. Use [`DbHelper::try_new`] to get
/// the factory error instead.
#[derive(Debug, Clone, Copy)]
pub struct DbHelper {
    dialect: &'static dyn Dialect,
}

impl DbHelper {
    /// Build a helper from a live connection's reported backend name.
    pub fn new(conn: &impl BackendIdentity) -> Self {
        let backend = conn.backend_name();
        match get_dialect(backend) {
            Ok(dialect) => Self { dialect },
            Err(err) => {
                warn!(backend, error = %err, "unrecognized database backend, using postgres dialect");
                Self::from_dialect(crate::dialect::dialect_for(DialectKind::Postgres))
            }
        }
    }

    /// Like [`DbHelper::new`] but fails on an unrecognized backend name.
    pub fn try_new(conn: &impl BackendIdentity) -> Result<Self, UnsupportedDialect> {
        get_dialect(conn.backend_name()).map(Self::from_dialect)
    }

    pub fn from_dialect(dialect: &'static dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    /// `"<column> <op> ?"`, with one placeholder to bind to the pattern.
    pub fn case_insensitive_like(&self, column: &str) -> String {
        format!("{} {} ?", column, self.dialect.case_insensitive_like())
    }

    /// OR of [`DbHelper::case_insensitive_like`] over `columns`, in order.
    ///
    /// Binds one pattern per column. Returns an empty string for no columns;
    /// callers must treat that as "no condition" and omit the clause.
    pub fn case_insensitive_like_multiple<S: AsRef<str>>(&self, columns: &[S]) -> String {
        columns
            .iter()
            .map(|column| self.case_insensitive_like(column.as_ref()))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    pub fn json_extract(&self, column: &str, key: &str) -> String {
        self.dialect.json_extract(column, key)
    }

    pub fn supports_array_type(&self) -> bool {
        self.dialect.supports_array_type()
    }

    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }
}

//! relaydb-store: SQL dialects and connection bootstrap
//!
//! Lets repository code build the same queries against PostgreSQL and
//! SQLite. [`get_dialect`] maps a backend type to its [`Dialect`],
//! [`DbHelper`] turns a live pool into ready-made SQL fragments, and
//! [`init_db`] brings up a configured pool at startup.

pub mod bootstrap;
pub mod connector;
pub mod dialect;
pub mod dsn;
pub mod error;
pub mod helper;
pub mod schema;

pub use bootstrap::{init_db, SQLITE_PRAGMAS};
pub use connector::{BackendIdentity, Connector, DbPool, OpenOptions, StatementLog};
pub use dialect::{
    dialect_for, get_dialect, Dialect, DialectKind, PostgresDialect, SqliteDialect,
    UnsupportedDialect, SUPPORTED_DIALECTS,
};
pub use dsn::SqliteDsn;
pub use error::{BootstrapError, BootstrapResult};
pub use helper::DbHelper;
pub use schema::{Column, ColumnType, Schema, SchemaSync, Table};

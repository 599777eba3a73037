//! Additive schema synchronization
//!
//! [`Schema::sync`] creates missing tables and adds missing columns. It never
//! drops, renames or retypes anything, so running it on every startup is
//! safe.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::connector::DbPool;
use crate::dialect::{Dialect, DialectKind};

/// Applies the application's expected structure to an open pool.
#[async_trait]
pub trait SchemaSync: Send + Sync {
    async fn sync(&self, pool: &DbPool, dialect: &dyn Dialect) -> Result<(), sqlx::Error>;
}

/// Portable column types, rendered per dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-incrementing 64-bit key
    BigSerial,
    BigInt,
    Integer,
    Text,
    Boolean,
    Timestamp,
    Json,
    /// Native `TEXT[]` where supported, JSON-encoded text otherwise
    TextArray,
}

impl ColumnType {
    pub fn render(self, dialect: &dyn Dialect) -> &'static str {
        match (self, dialect.kind()) {
            (Self::BigSerial, DialectKind::Postgres) => "BIGSERIAL",
            (Self::BigSerial, DialectKind::Sqlite) => "INTEGER",
            (Self::BigInt, _) => "BIGINT",
            (Self::Integer, _) => "INTEGER",
            (Self::Text, _) => "TEXT",
            (Self::Boolean, DialectKind::Postgres) => "BOOLEAN",
            (Self::Boolean, DialectKind::Sqlite) => "INTEGER",
            (Self::Timestamp, DialectKind::Postgres) => "TIMESTAMPTZ",
            (Self::Timestamp, DialectKind::Sqlite) => "DATETIME",
            (Self::Json, DialectKind::Postgres) => "JSONB",
            (Self::Json, DialectKind::Sqlite) => "TEXT",
            (Self::TextArray, _) if dialect.supports_array_type() => "TEXT[]",
            (Self::TextArray, _) => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    /// Raw SQL default expression
    pub default: Option<String>,
}

impl Column {
    /// A nullable, non-key column.
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            primary_key: false,
            default: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default_sql(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    fn definition(&self, dialect: &dyn Dialect, in_create: bool) -> String {
        let mut sql = format!("{} {}", self.name, self.ty.render(dialect));

        if self.primary_key && in_create {
            sql.push_str(" PRIMARY KEY");
            if self.ty == ColumnType::BigSerial && dialect.kind() == DialectKind::Sqlite {
                sql.push_str(" AUTOINCREMENT");
            }
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn create_sql(&self, dialect: &dyn Dialect) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| c.definition(dialect, true))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({})", self.name, columns)
    }

    pub fn add_column_sql(&self, column: &Column, dialect: &dyn Dialect) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.name,
            column.definition(dialect, false)
        )
    }
}

/// Expected structure of the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }
}

async fn existing_columns(pool: &DbPool, table: &str) -> Result<Vec<String>, sqlx::Error> {
    match pool {
        DbPool::Postgres(pool) => {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT column_name::text
                FROM information_schema.columns
                WHERE table_schema = current_schema() AND table_name = $1
                "#,
            )
            .bind(table)
            .fetch_all(pool)
            .await
        }
        DbPool::Sqlite(pool) => {
            sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info(?1)")
                .bind(table)
                .fetch_all(pool)
                .await
        }
    }
}

#[async_trait]
impl SchemaSync for Schema {
    async fn sync(&self, pool: &DbPool, dialect: &dyn Dialect) -> Result<(), sqlx::Error> {
        info!(tables = self.tables.len(), dialect = dialect.name(), "synchronizing schema");

        for table in &self.tables {
            pool.execute(&table.create_sql(dialect)).await?;

            let existing = existing_columns(pool, &table.name).await?;
            for column in &table.columns {
                if existing.iter().any(|name| name.eq_ignore_ascii_case(&column.name)) {
                    continue;
                }

                debug!(table = %table.name, column = %column.name, "adding missing column");
                pool.execute(&table.add_column_sql(column, dialect)).await?;
            }
        }

        info!("schema synchronized");
        Ok(())
    }
}

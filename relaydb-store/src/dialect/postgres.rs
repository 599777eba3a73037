use super::{Dialect, DialectKind};
use crate::connector::Connector;

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn connector(&self, dsn: &str) -> Connector {
        Connector::postgres(dsn)
    }

    fn case_insensitive_like(&self) -> &'static str {
        "ILIKE"
    }

    /// `->>` yields the field as text.
    fn json_extract(&self, column: &str, key: &str) -> String {
        format!("{column}->>'{key}'")
    }

    fn supports_array_type(&self) -> bool {
        true
    }

    /// Adds `options=-c TimeZone=<tz>` unless the DSN already sets a TimeZone.
    fn dsn_with_timezone(&self, dsn: &str, tz: &str) -> String {
        if tz.is_empty() || sets_timezone(dsn) {
            return dsn.to_string();
        }

        let separator = if dsn.contains('?') { '&' } else { '?' };
        let options = format!("-c TimeZone={tz}");
        format!("{dsn}{separator}options={}", urlencoding::encode(&options))
    }
}

/// Whether the query string already carries a `timezone` key or an
/// `options` value with `TimeZone=`. Host, path and credentials are ignored.
fn sets_timezone(dsn: &str) -> bool {
    let Some((_, query)) = dsn.split_once('?') else {
        return false;
    };

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| {
            let key = key.to_lowercase();
            key == "timezone"
                || (key == "options"
                    && urlencoding::decode(value)
                        .map(|options| options.to_lowercase().contains("timezone="))
                        .unwrap_or(false))
        })
}

//! SQLite connection-string parsing
//!
//! A sqlite DSN is an optional scheme, a file path and an optional query
//! string: `sqlite://data/app.db?mode=rwc`, `data/app.db?_fk=1`, `:memory:`.

use std::path::{Path, PathBuf};

const SCHEMES: [&str; 3] = ["sqlite://", "sqlite:", "file:"];

/// A sqlite DSN split into its path and query parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqliteDsn<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> SqliteDsn<'a> {
    pub fn parse(dsn: &'a str) -> Self {
        let rest = SCHEMES
            .iter()
            .find_map(|scheme| dsn.strip_prefix(scheme))
            .unwrap_or(dsn);

        match rest.split_once('?') {
            Some((path, query)) => Self {
                path,
                query: Some(query).filter(|q| !q.is_empty()),
            },
            None => Self { path: rest, query: None },
        }
    }

    /// In-memory databases have no backing file.
    pub fn is_memory(&self) -> bool {
        self.path.is_empty()
            || self.path == ":memory:"
            || self.params().any(|(k, v)| k == "mode" && v == "memory")
    }

    /// `key=value` pairs of the query string, in order. Keys without `=`
    /// yield an empty value.
    pub fn params(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
    }

    /// Directory holding the database file, if one must exist on disk.
    ///
    /// `None` for in-memory databases and for files in the working directory.
    pub fn parent_dir(&self) -> Option<PathBuf> {
        if self.is_memory() {
            return None;
        }

        Path::new(self.path)
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty() && *dir != Path::new("."))
            .map(Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_query() {
        let dsn = SqliteDsn::parse("sqlite://data/app.db?mode=rwc");
        assert_eq!(dsn.path, "data/app.db");
        assert_eq!(dsn.query, Some("mode=rwc"));

        let dsn = SqliteDsn::parse("sqlite:data/app.db");
        assert_eq!(dsn.path, "data/app.db");
        assert_eq!(dsn.query, None);

        let dsn = SqliteDsn::parse("file:/var/lib/app.db?cache=shared");
        assert_eq!(dsn.path, "/var/lib/app.db");
    }

    #[test]
    fn parent_dir_ignores_query_suffix() {
        let dsn = SqliteDsn::parse("data/db/app.db?_fk=1");
        assert_eq!(dsn.parent_dir(), Some(PathBuf::from("data/db")));

        // Several query parameters
        let dsn = SqliteDsn::parse("data/db/app.db?_fk=1&_busy_timeout=5000");
        assert_eq!(dsn.parent_dir(), Some(PathBuf::from("data/db")));

        let dsn = SqliteDsn::parse("data/db/app.db");
        assert_eq!(dsn.parent_dir(), Some(PathBuf::from("data/db")));
    }

    #[test]
    fn no_parent_for_bare_or_memory() {
        assert_eq!(SqliteDsn::parse("app.db?_fk=1").parent_dir(), None);
        assert_eq!(SqliteDsn::parse("./app.db").parent_dir(), None);
        assert_eq!(SqliteDsn::parse(":memory:").parent_dir(), None);
        assert_eq!(SqliteDsn::parse("sqlite::memory:").parent_dir(), None);
        assert_eq!(SqliteDsn::parse("file:shared?mode=memory").parent_dir(), None);
    }

    #[test]
    fn params_split_pairs() {
        let dsn = SqliteDsn::parse("app.db?_fk=1&cache=shared&immutable");
        let params: Vec<_> = dsn.params().collect();
        assert_eq!(
            params,
            vec![("_fk", "1"), ("cache", "shared"), ("immutable", "")]
        );
    }
}

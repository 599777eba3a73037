use proptest::prelude::*;
use relaydb_store::{get_dialect, DbHelper, Dialect, PostgresDialect, SqliteDialect};

/// Randomize the case of each character in `s` using `mask`.
fn recase(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    /// Property: every alias resolves to its canonical name in any case
    #[test]
    fn prop_aliases_resolve_in_any_case(
        (alias, canonical) in prop_oneof![
            Just(("postgres", "postgres")),
            Just(("postgresql", "postgres")),
            Just(("sqlite", "sqlite")),
            Just(("sqlite3", "sqlite")),
        ],
        mask in prop::collection::vec(any::<bool>(), 1..12),
    ) {
        let input = recase(alias, &mask);
        let dialect = get_dialect(&input).unwrap();
        prop_assert_eq!(dialect.name(), canonical);
    }

    /// Property: anything outside the alias set is rejected, naming the input
    #[test]
    fn prop_unknown_types_rejected(input in "[a-zA-Z0-9_ ]{0,16}") {
        let lowered = input.to_lowercase();
        prop_assume!(!matches!(lowered.as_str(), "postgres" | "postgresql" | "sqlite" | "sqlite3"));

        let err = get_dialect(&input).unwrap_err();
        prop_assert_eq!(&err.db_type, &input);
        prop_assert_eq!(
            err.to_string(),
            format!("unsupported database type: {input} (supported: postgres, sqlite)")
        );
    }

    /// Property: multi-column LIKE has one placeholder per column, in order
    #[test]
    fn prop_like_multiple_preserves_columns(
        columns in prop::collection::vec("[a-z][a-z_]{0,10}", 0..8),
    ) {
        let helper = DbHelper::from_dialect(&SqliteDialect);
        let sql = helper.case_insensitive_like_multiple(&columns[..]);

        if columns.is_empty() {
            prop_assert_eq!(sql, "");
        } else {
            let parts: Vec<&str> = sql.split(" OR ").collect();
            prop_assert_eq!(parts.len(), columns.len());
            for (part, column) in parts.iter().zip(&columns) {
                prop_assert_eq!(*part, format!("{column} LIKE ?"));
            }
        }
    }

    /// Property: JSON extraction embeds column and key verbatim
    #[test]
    fn prop_json_extract_shapes(column in "[a-z_]{1,12}", key in "[a-z_]{1,12}") {
        prop_assert_eq!(
            PostgresDialect.json_extract(&column, &key),
            format!("{column}->>'{key}'")
        );
        prop_assert_eq!(
            SqliteDialect.json_extract(&column, &key),
            format!("json_extract({column}, '$.{key}')")
        );
    }
}

//! Property and scenario tests for canonical statement parsing.

use percolate_dynsql::parser::{parse, strip_comments};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,12}".prop_filter("keywords are not identifiers", |s| {
        s != "select" && s != "from"
    })
}

fn separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(","), Just(", "), Just(" , "), Just(",\n    "), Just(",\t")]
}

fn quote() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("`"), Just("\""), Just("'")]
}

fn column_list() -> impl Strategy<Value = Vec<(String, &'static str, &'static str)>> {
    prop::collection::vec((identifier(), quote(), separator()), 1..8)
}

fn render_columns(columns: &[(String, &'static str, &'static str)]) -> String {
    let mut out = String::new();
    for (i, (name, q, sep)) in columns.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(q);
        out.push_str(name);
        out.push_str(q);
    }
    out
}

proptest! {
    #[test]
    fn well_formed_statements_parse(
        columns in column_list(),
        table in identifier(),
        keyword_case in prop_oneof![Just(("SELECT", "FROM")), Just(("select", "from")), Just(("Select", "From"))],
        semicolon in any::<bool>(),
    ) {
        let stmt = format!(
            "{} {} {} {}{}",
            keyword_case.0,
            render_columns(&columns),
            keyword_case.1,
            table,
            if semicolon { ";" } else { "" }
        );
        let meta = parse(&stmt);

        let expected: Vec<String> = columns.iter().map(|(name, _, _)| name.clone()).collect();
        prop_assert_eq!(meta.columns, expected);
        prop_assert_eq!(meta.table, table);
    }

    #[test]
    fn comments_and_line_breaks_are_ignored(
        columns in column_list(),
        table in identifier(),
    ) {
        let stmt = format!(
            "-- name: ListThings :many\n/* generated\n   do not edit */\nSELECT\n  {} -- projected\nFROM /* source */ {}\n",
            render_columns(&columns),
            table
        );
        let meta = parse(&stmt);

        let expected: Vec<String> = columns.iter().map(|(name, _, _)| name.clone()).collect();
        prop_assert_eq!(meta.columns, expected);
        prop_assert_eq!(meta.table, table);
    }

    #[test]
    fn parsing_is_idempotent(stmt in ".{0,80}") {
        prop_assert_eq!(parse(&stmt), parse(&stmt));
    }

    #[test]
    fn statements_without_select_yield_nothing(
        verb in prop_oneof![Just("INSERT INTO"), Just("UPDATE"), Just("DELETE FROM")],
        table in identifier(),
    ) {
        let meta = parse(&format!("{} {} WHERE id = 1", verb, table));
        prop_assert!(meta.is_empty());
    }

    #[test]
    fn strip_comments_without_markers_is_identity(text in "[a-zA-Z0-9 ,;\n]{0,60}") {
        prop_assert_eq!(strip_comments(&text), text);
    }
}

#[test]
fn test_generated_header_and_inline_comment() {
    let stmt = "-- name: ListUsers :many\nSELECT id, name, -- display name\n  email\nFROM users\n";
    let meta = parse(stmt);
    assert_eq!(meta.table, "users");
    assert_eq!(meta.columns, vec!["id", "name", "email"]);
}

#[test]
fn test_simple_statement() {
    let meta = parse("SELECT a,b,c FROM test;");
    assert_eq!(meta.table, "test");
    assert_eq!(meta.columns, vec!["a", "b", "c"]);
}

#[test]
fn test_missing_from_yields_nothing() {
    assert!(parse("SELECT 1").is_empty());
    assert!(parse("").is_empty());
    assert!(parse("-- only a comment").is_empty());
}

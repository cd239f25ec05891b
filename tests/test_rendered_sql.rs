//! Rendered skeletons must be valid SQL for the target dialect.

use percolate_dynsql::{Order, PlaceholderFormat, Predicate, SelectBuilder};
use serde_json::json;
use sqlparser::dialect::{Dialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

fn assert_valid(dialect: &dyn Dialect, sql: &str) {
    let statements = Parser::parse_sql(dialect, sql)
        .unwrap_or_else(|e| panic!("{:?} rejected {:?}: {}", dialect, sql, e));
    assert_eq!(statements.len(), 1, "one statement for {:?}", sql);
}

fn skeletons() -> Vec<SelectBuilder> {
    let base = SelectBuilder::from_canonical(
        "-- name: ListUsers :many\nSELECT id, name, email, age FROM users\n",
    )
    .unwrap();

    vec![
        base.clone(),
        base.clone().filter(Predicate::is_null("deleted_at")).limit(500),
        base.clone()
            .filter(Predicate::eq("name", "ada"))
            .filter(Predicate::Ne("email".to_string(), json!(null)))
            .filter(Predicate::In("age".to_string(), vec![json!(30), json!(31)]))
            .filter(Predicate::NotIn("id".to_string(), vec![]))
            .order_by("name", Order::Asc)
            .order_by("id", Order::Desc)
            .limit(20)
            .offset(40),
        base.clone()
            .filter(Predicate::Or(vec![
                Predicate::Like("name".to_string(), "a%".to_string()),
                Predicate::Not(Box::new(Predicate::Lt("age".to_string(), json!(18)))),
            ]))
            .filter(Predicate::And(vec![]))
            .filter(Predicate::raw("age BETWEEN ? AND ?", vec![json!(18), json!(65)])),
        base.filter(Predicate::None).order_by_expr("created_at DESC"),
    ]
}

#[test]
fn test_question_placeholders_parse_as_mysql() {
    for sb in skeletons() {
        let (sql, _) = sb.to_sql().unwrap();
        assert_valid(&MySqlDialect {}, &sql);
    }
}

#[test]
fn test_dollar_placeholders_parse_as_postgres() {
    for sb in skeletons() {
        let (sql, args) = sb.placeholder(PlaceholderFormat::Dollar).to_sql().unwrap();
        assert_valid(&PostgreSqlDialect {}, &sql);
        if !args.is_empty() {
            assert!(sql.contains(&format!("${}", args.len())));
            assert!(!sql.contains(&format!("${}", args.len() + 1)));
        }
    }
}

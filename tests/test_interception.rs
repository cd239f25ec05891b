//! End-to-end interception tests over the dry-run executor.

use percolate_dynsql::executor::{
    select, select_for_query, DryRunExecutor, Executor, Passthrough, QueryContext,
};
use percolate_dynsql::otel::DbOperation;
use percolate_dynsql::types::Row;
use percolate_dynsql::{Order, PlaceholderFormat, Predicate, SelectBuilder};
use serde_json::json;

fn skeleton() -> SelectBuilder {
    SelectBuilder::from_canonical("SELECT id, name FROM users")
        .unwrap()
        .filter(Predicate::is_null("deleted_at"))
        .filter(Predicate::gte("age", 21))
        .order_by("name", Order::Asc)
        .limit(10)
}

#[tokio::test]
async fn test_guard_selects_one_call_site() {
    let raw = DryRunExecutor::new();
    let db = select_for_query(&raw, "expected", skeleton());
    let ctx = QueryContext::new();

    db.query(&ctx, "other", &[json!(1), json!(2), json!(3)])
        .await
        .unwrap();
    db.query(&ctx, "expected", &[json!("ignored")]).await.unwrap();

    let calls = raw.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].sql, "other");
    assert_eq!(calls[0].args, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(
        calls[1].sql,
        "SELECT id, name FROM users WHERE deleted_at IS NULL AND age >= ? ORDER BY name ASC LIMIT 10"
    );
    assert_eq!(calls[1].args, vec![json!(21)]);
}

#[tokio::test]
async fn test_unguarded_override_replaces_any_read() {
    let raw = DryRunExecutor::new();
    let db = select_for_query(&raw, "", skeleton());
    let ctx = QueryContext::new();

    for sql in ["SELECT 1", "SELECT * FROM elsewhere", ""] {
        db.query(&ctx, sql, &[json!(true)]).await.unwrap();
        let _ = db.query_row(&ctx, sql, &[]).await;
    }

    let expected = skeleton().to_sql().unwrap();
    for call in raw.calls() {
        assert_eq!((call.sql, call.args), expected.clone());
    }
}

#[tokio::test]
async fn test_override_variant_covers_exec_but_not_prepare() {
    let raw = DryRunExecutor::new();
    let db = select(&raw, skeleton());
    let ctx = QueryContext::new();

    db.exec(&ctx, "DELETE FROM users", &[]).await.unwrap();
    let stmt = db.prepare(&ctx, "SELECT id FROM users WHERE id = ?").await.unwrap();

    let calls = raw.calls();
    assert_eq!(calls[0].operation, DbOperation::Exec);
    assert!(calls[0].sql.starts_with("SELECT id, name FROM users"));
    assert_eq!(calls[1].operation, DbOperation::Prepare);
    assert_eq!(calls[1].sql, "SELECT id FROM users WHERE id = ?");
    assert_eq!(stmt.sql, "SELECT id FROM users WHERE id = ?");
}

#[tokio::test]
async fn test_dollar_placeholders_renumber() {
    let raw = DryRunExecutor::new();
    let sb = skeleton()
        .filter(Predicate::In("role".to_string(), vec![json!("admin"), json!("staff")]))
        .placeholder(PlaceholderFormat::Dollar);
    let db = select(&raw, sb);

    db.query(&QueryContext::new(), "ignored", &[]).await.unwrap();

    let call = raw.last_call().unwrap();
    assert!(call.sql.contains("age >= $1 AND role IN ($2,$3)"));
    assert_eq!(call.args, vec![json!(21), json!("admin"), json!("staff")]);
}

#[tokio::test]
async fn test_query_row_falls_back_when_skeleton_is_malformed() {
    let raw = DryRunExecutor::new().with_rows(vec![Row::new(
        vec!["id".to_string()],
        vec![json!(5)],
    )
    .unwrap()]);
    let db = select_for_query(&raw, "", SelectBuilder::new().select(["id"]));
    let ctx = QueryContext::new();

    let row = db
        .query_row(&ctx, "SELECT id FROM users WHERE id = ?", &[json!(5)])
        .await
        .into_result()
        .unwrap();
    assert_eq!(row.get_by_name("id"), Some(&json!(5)));
    assert_eq!(raw.last_call().unwrap().sql, "SELECT id FROM users WHERE id = ?");

    let err = db.query(&ctx, "SELECT id FROM users", &[]).await.unwrap_err();
    assert!(err.to_string().contains("must specify a table"));
}

#[tokio::test]
async fn test_interceptors_stack() {
    let raw = DryRunExecutor::new();
    let inner = Passthrough::new(&raw);
    let db = select_for_query(inner, "SELECT id FROM t", skeleton());
    let ctx = QueryContext::new().with_namespace("tenant-1");

    db.query(&ctx, "SELECT id FROM t", &[]).await.unwrap();

    let call = raw.last_call().unwrap();
    assert!(call.sql.starts_with("SELECT id, name FROM users"));
    assert_eq!(call.namespace.as_deref(), Some("tenant-1"));
}

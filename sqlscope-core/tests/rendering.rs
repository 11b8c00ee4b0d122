use pretty_assertions::assert_eq;
use sqlscope_core::builder::{and, eq, is_null, like, or, param, raw, QueryBuilder};
use sqlscope_core::{Domain, Error, Render, SortDirection, Value, BOUND_PARAMS};

fn render_error(qb: &QueryBuilder) -> String {
    match qb.to_sql() {
        Err(err @ Error::Render { .. }) => err.to_string(),
        other => panic!("expected a render error, got {:?}", other),
    }
}

#[test]
fn test_select_from_round_trip() {
    let sql = QueryBuilder::new()
        .add_from("t1", "a")
        .add_col("a.x")
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT a.x FROM t1 AS a");
}

#[test]
fn test_join_on_condition() {
    let sql = QueryBuilder::new()
        .add_from("t1", "a")
        .add_col("a.x")
        .unwrap()
        .add_join("t2", "b", vec![eq("b.id", "a.id")])
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT a.x FROM t1 AS a JOIN t2 AS b ON (b.id = a.id)");
}

#[test]
fn test_duplicate_column_display_name() {
    let qb = QueryBuilder::new()
        .add_from("t1", "a")
        .add_join("t2", "b", vec![])
        .unwrap()
        .add_col("a.x")
        .unwrap()
        .add_col("b.x")
        .unwrap();
    assert_eq!(
        render_error(&qb),
        "Query::render() error : `x' definition is ambiguous: domain has 2 definitions with that name"
    );

    let qb = QueryBuilder::new()
        .add_from("t1", "a")
        .add_join("t2", "b", vec![])
        .unwrap()
        .add_col_as("a.x", "ax")
        .unwrap()
        .add_col("b.x")
        .unwrap();
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT a.x AS ax,b.x FROM t1 AS a JOIN t2 AS b"
    );
}

#[test]
fn test_duplicate_table_display_name() {
    let qb = QueryBuilder::new()
        .add_from("t1", None)
        .add_join("t1", None, vec![])
        .unwrap();
    assert!(render_error(&qb).contains("`t1' definition is ambiguous"));

    let qb = QueryBuilder::new()
        .add_from("t1", None)
        .add_join("t1", "again", vec![])
        .unwrap();
    assert_eq!(qb.to_sql().unwrap(), "FROM t1 JOIN t1 AS again");
}

#[test]
fn test_bare_column_resolves_to_from_table() {
    let (sql, params) = QueryBuilder::new()
        .add_from("t1", "a")
        .add_join("t2", "b", vec![eq("b.a_id", "a.id")])
        .unwrap()
        .add_col_as("a.x", "ax")
        .unwrap()
        .add_col_as("b.x", "bx")
        .unwrap()
        .add_where(eq("x", param(1)))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT a.x AS ax,b.x AS bx FROM t1 AS a JOIN t2 AS b ON (b.a_id = a.id) WHERE (a.x = ?)"
    );
    assert_eq!(params, vec![Value::I32(1)]);
}

#[test]
fn test_bare_column_ambiguous_across_from_tables() {
    let qb = QueryBuilder::new()
        .add_from("t1", "a")
        .add_from("t2", "b")
        .add_col_as("a.x", "ax")
        .unwrap()
        .add_col_as("b.x", "bx")
        .unwrap()
        .add_where(eq("x", param(1)))
        .unwrap();
    assert_eq!(
        render_error(&qb),
        "Query::render() error : `x' reference is ambiguous: domain has 2 definitions with that name or alias"
    );
}

#[test]
fn test_unknown_table_qualifier() {
    let qb = QueryBuilder::new()
        .add_from("t1", None)
        .add_where(eq("t9.x", param(1)))
        .unwrap();
    assert_eq!(
        render_error(&qb),
        "Query::render() error : column `x': table reference `t9' is not defined in the domain"
    );
}

#[test]
fn test_bind_values_follow_clause_order() {
    let (sql, params) = QueryBuilder::new()
        .add_from("t1", "a")
        .add_col("a.x")
        .unwrap()
        .add_where(eq("a.y", param(5)))
        .unwrap()
        .add_join("t2", "b", vec![eq("b.a_id", "a.id"), eq("b.kind", "?k")])
        .unwrap()
        .add_where(like("a.name", param("jo%")))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT a.x FROM t1 AS a JOIN t2 AS b ON ((b.a_id = a.id) AND (b.kind = ?)) \
         WHERE (a.y = ?) AND (a.name LIKE ?)"
    );
    assert_eq!(
        params,
        vec![Value::from("k"), Value::I32(5), Value::from("jo%")]
    );
}

#[test]
fn test_bound_params_readable_from_domain() {
    let qb = QueryBuilder::new()
        .add_from("t", None)
        .add_where(eq("t.id", param(3)))
        .unwrap();
    let mut domain = Domain::new();
    let sql = qb.query().render(&mut domain).unwrap();
    assert_eq!(sql, "FROM t WHERE (t.id = ?)");
    assert_eq!(domain.get(BOUND_PARAMS).unwrap().as_slice(), &[Value::I32(3)]);
}

#[test]
fn test_reusing_a_domain_accumulates_values() {
    let qb = QueryBuilder::new()
        .add_from("t", None)
        .add_where(eq("t.id", param(3)))
        .unwrap();
    let mut domain = Domain::new();
    qb.query().render(&mut domain).unwrap();
    qb.query().render(&mut domain).unwrap();
    assert_eq!(domain.bound_params().len(), 2);
}

#[test]
fn test_where_fold_is_left_associative() {
    let mut domain = Domain::new();
    let expr = and([raw("a"), raw("b"), raw("c")]);
    assert_eq!(expr.render(&mut domain).unwrap(), "(a AND b AND c)");
}

#[test]
fn test_limit_trails_other_clauses() {
    let sql = QueryBuilder::new()
        .set_limit(Some(10), Some(5))
        .add_from("t", None)
        .add_col("t.a")
        .unwrap()
        .add_where(is_null("t.deleted_at"))
        .unwrap()
        .add_group_by("t.a")
        .unwrap()
        .add_order("#1", SortDirection::Asc)
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT t.a FROM t WHERE (t.deleted_at IS NULL) GROUP BY t.a ORDER BY 1 ASC LIMIT 10 OFFSET 5"
    );
}

#[test]
fn test_default_limit_is_unbounded() {
    let sql = QueryBuilder::new()
        .add_from("t", None)
        .set_limit(None, Some(20))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "FROM t LIMIT 2147483647 OFFSET 20");
}

#[test]
fn test_empty_clauses_emit_no_keyword() {
    let sql = QueryBuilder::new()
        .add_from("t", None)
        .add_col("t.a")
        .unwrap()
        .to_sql()
        .unwrap();
    assert!(!sql.contains("WHERE"));
    assert!(!sql.contains("ORDER BY"));
    assert!(!sql.contains("LIMIT"));
    assert_eq!(sql, "SELECT t.a FROM t");
}

#[test]
fn test_nested_boolean_conditions() {
    let sql = QueryBuilder::new()
        .add_from("users", "u")
        .add_col("u.id")
        .unwrap()
        .add_where(or([
            eq("u.role", param("admin")),
            and([eq("u.role", param("staff")), is_null("u.suspended_at")]),
        ]))
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT u.id FROM users AS u WHERE ((u.role = ?) OR ((u.role = ?) AND (u.suspended_at IS NULL)))"
    );
}

#[test]
fn test_construction_errors_surface_immediately() {
    let err = QueryBuilder::new().add_group_by("#x").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = QueryBuilder::new()
        .add_order("=RAND()", SortDirection::Asc)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

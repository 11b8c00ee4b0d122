use sqlscope_core::builder::{col_def, eq, gt, in_, is_null, or, param, QueryBuilder};
use sqlscope_core::expression::{SqlFunction, Transform};
use sqlscope_core::SortDirection;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("sqlscope usage examples\n");

    // Simple select
    let sql = QueryBuilder::new()
        .add_from("users", "u")
        .add_cols("u", &["id", "name", "email"])?
        .to_sql()?;
    println!("1. Simple select:\n   {}\n", sql);

    // Joins and bound parameters
    let (sql, params) = QueryBuilder::new()
        .add_from("orders", "o")
        .add_col("o.id")?
        .add_col_as("c.name", "customer")?
        .add_left_join("customers", "c", vec![eq("c.id", "o.customer_id")])?
        .add_where(gt("o.total", param(100)))?
        .add_where(or([eq("o.status", param("open")), is_null("o.closed_at")]))?
        .add_order("o.id", SortDirection::Desc)?
        .set_limit(Some(20), Some(40))
        .build()?;
    println!("2. Join with bound parameters:\n   {}", sql);
    println!("   params: {:?}\n", params);

    // Ambiguous column name resolved against the single FROM table
    let sql = QueryBuilder::new()
        .add_from("posts", "p")
        .add_join("comments", "c", vec![eq("c.post_id", "p.id")])?
        .add_col_as("p.created_at", "posted")?
        .add_col_as("c.created_at", "commented")?
        .add_order("created_at", SortDirection::Desc)?
        .to_sql()?;
    println!("3. Auto-resolved column:\n   {}\n", sql);

    // Aggregates
    let sql = QueryBuilder::new()
        .add_from("orders", "o")
        .add_col("o.customer_id")?
        .add_col_with("o.total", Some("spent"), Some(Transform::Function(SqlFunction::Sum)))?
        .add_group_by("#1")?
        .to_sql()?;
    println!("4. Aggregates:\n   {}\n", sql);

    // Subquery in WHERE
    let vip = QueryBuilder::new()
        .add_from("customers", "c")
        .add_col("c.id")?
        .add_where(eq("c.tier", param("vip")))?;
    let (sql, params) = QueryBuilder::new()
        .add_from("orders", "o")
        .add_col("o.total")?
        .add_where(in_("o.customer_id", vip))?
        .build()?;
    println!("5. Subquery:\n   {}", sql);
    println!("   params: {:?}\n", params);

    // Raw fragments via "=expr"
    let sql = QueryBuilder::new()
        .add_from("events", None)
        .add_col_as("=NOW()", "now")?
        .add_col_with("events.id", Some("n"), None)?
        .to_sql()?;
    println!("6. Raw fragments:\n   {}\n", sql);

    // Construction errors surface immediately
    match QueryBuilder::new().add_where(col_def("users.id")) {
        Ok(_) => println!("7. unexpected success"),
        Err(e) => println!("7. Rejected at construction: {}", e),
    }

    Ok(())
}

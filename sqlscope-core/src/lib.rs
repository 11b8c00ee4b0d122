//! sqlscope core - scope-aware SELECT rendering
//!
//! A [`Query`] is a tree of clause statements holding expression nodes. Every
//! render threads a [`Domain`] through the tree: definitions check that their
//! names are unique among the tables and columns in scope, references resolve
//! against them (falling back on the single FROM table when a bare column name
//! is ambiguous), and bind decorators collect parameter values in encounter
//! order. Nested queries render in a child scope and only hand their bound
//! values back.
//!
//! ```
//! use sqlscope_core::builder::{eq, QueryBuilder};
//!
//! let sql = QueryBuilder::new()
//!     .add_from("t1", "a")
//!     .add_col("a.x")?
//!     .add_join("t2", "b", vec![eq("b.id", "a.id")])?
//!     .to_sql()?;
//! assert_eq!(sql, "SELECT a.x FROM t1 AS a JOIN t2 AS b ON (b.id = a.id)");
//! # Ok::<(), sqlscope_core::Error>(())
//! ```

pub mod builder;
pub mod domain;
pub mod entity;
pub mod error;
pub mod expression;
pub mod operator;
pub mod query;
pub mod statement;
pub mod value;

// Re-export main types
pub use builder::QueryBuilder;
pub use domain::{Domain, BOUND_PARAMS, COLUMNS, TABLES};
pub use entity::{Entity, JoinType, SortDirection};
pub use error::{Error, ParseError, ParseResult, Result};
pub use expression::{Aliasable, Clause, Expression, Render};
pub use operator::{op, Combinator, Operator};
pub use query::Query;
pub use statement::Statement;
pub use value::Value;

/// Create an empty query
pub fn query() -> Query {
    Query::new()
}

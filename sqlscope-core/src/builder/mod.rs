//! Shorthand notation and condition helpers
//!
//! Strings are read as follows:
//!
//! - `"table.col"` names a column of a table, split on the last `.`
//! - `"=expr"` is a raw SQL fragment
//! - `"?value"` binds `value` as a parameter (references only)
//! - `"#n"` is a column position (GROUP BY and ORDER BY only)
//!
//! ```
//! use sqlscope_core::builder::{eq, param, QueryBuilder};
//!
//! let (sql, params) = QueryBuilder::new()
//!     .add_from("users", "u")
//!     .add_col("u.name")?
//!     .add_where(eq("u.id", param(7)))?
//!     .build()?;
//! assert_eq!(sql, "SELECT u.name FROM users AS u WHERE (u.id = ?)");
//! assert_eq!(params.len(), 1);
//! # Ok::<(), sqlscope_core::Error>(())
//! ```

mod select;

pub use select::QueryBuilder;

use crate::expression::{
    Aliasable, Arithmetic, ColumnDefinition, ColumnPosition, ColumnReference, Decorator,
    Expression, SqlFunction, TableDefinition, WhereExpr,
};
use crate::operator::{Combinator, Operator};
use crate::query::Query;
use crate::{Error, Result, Value};

/// Anything usable as an operand of a condition helper.
///
/// Strings go through the reference notation, so `"a.id"` is a column of
/// `a` and `"?x"` binds `x`.
pub trait IntoOperand {
    fn into_operand(self) -> Expression;
}

impl IntoOperand for &str {
    fn into_operand(self) -> Expression {
        col_ref(self)
    }
}

impl IntoOperand for String {
    fn into_operand(self) -> Expression {
        col_ref(&self)
    }
}

impl IntoOperand for Expression {
    fn into_operand(self) -> Expression {
        self
    }
}

impl IntoOperand for WhereExpr {
    fn into_operand(self) -> Expression {
        self.into()
    }
}

impl IntoOperand for Decorator {
    fn into_operand(self) -> Expression {
        self.into()
    }
}

impl IntoOperand for Query {
    fn into_operand(self) -> Expression {
        self.into()
    }
}

impl IntoOperand for QueryBuilder {
    fn into_operand(self) -> Expression {
        self.into_query().into()
    }
}

fn split_qualified(spec: &str) -> (Option<&str>, &str) {
    match spec.rsplit_once('.') {
        Some((table, name)) => (Some(table), name),
        None => (None, spec),
    }
}

/// A table definition with an optional alias
pub fn table_def(name: &str, alias: Option<&str>) -> TableDefinition {
    match alias {
        Some(alias) => TableDefinition::aliased(name, alias),
        None => TableDefinition::new(name),
    }
}

/// A selectable column from `"table.col"`, `"col"` or `"=expr"`
pub fn col_def(spec: &str) -> Expression {
    if let Some(expr) = spec.strip_prefix('=') {
        return Arithmetic::new(expr).into();
    }
    match split_qualified(spec) {
        (Some(table), name) => ColumnDefinition::of(table, name).into(),
        (None, name) => ColumnDefinition::new(name).into(),
    }
}

/// A column use from `"table.col"`, `"col"`, `"=expr"` or `"?value"`
pub fn col_ref(spec: &str) -> Expression {
    if let Some(expr) = spec.strip_prefix('=') {
        return Arithmetic::new(expr).into();
    }
    if let Some(value) = spec.strip_prefix('?') {
        return param(value);
    }
    match split_qualified(spec) {
        (Some(table), name) => ColumnReference::of(table, name).into(),
        (None, name) => ColumnReference::new(name).into(),
    }
}

/// A grouping or ordering target, accepting `"#n"` on top of [`col_ref`]
pub fn position_or_ref(spec: &str) -> Result<Expression> {
    match spec.strip_prefix('#') {
        Some(n) => n
            .parse::<u32>()
            .map(|p| ColumnPosition::new(p).into())
            .map_err(|_| Error::invalid_argument(format!("invalid column position '{}'", spec))),
        None => Ok(col_ref(spec)),
    }
}

/// Set `alias` on an expression able to carry one
pub fn aliased(mut expr: Expression, alias: &str) -> Result<Expression> {
    expr.set_alias(Some(alias.to_string()))?;
    Ok(expr)
}

/// Bind a value as a parameter
pub fn param(value: impl Into<Value>) -> Expression {
    Decorator::bind(value).into()
}

/// A raw SQL fragment
pub fn raw(expr: &str) -> Expression {
    Arithmetic::new(expr).into()
}

fn fold(reduce: impl Into<Combinator>, operands: Vec<Expression>) -> Expression {
    WhereExpr::new(reduce, operands).into()
}

fn binary(op: Operator, left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    fold(op, vec![left.into_operand(), right.into_operand()])
}

pub fn and(operands: impl IntoIterator<Item = Expression>) -> Expression {
    fold(Combinator::AND, operands.into_iter().collect())
}

pub fn or(operands: impl IntoIterator<Item = Expression>) -> Expression {
    fold(Combinator::OR, operands.into_iter().collect())
}

pub fn eq(left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    binary(Operator::EQ, left, right)
}

pub fn ne(left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    binary(Operator::NE, left, right)
}

pub fn lt(left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    binary(Operator::LT, left, right)
}

pub fn gt(left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    binary(Operator::GT, left, right)
}

pub fn le(left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    binary(Operator::LE, left, right)
}

pub fn ge(left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    binary(Operator::GE, left, right)
}

pub fn like(left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    binary(Operator::LIKE, left, right)
}

/// `left IN right`, usually with a [`pair`] or a subquery on the right
pub fn in_(left: impl IntoOperand, right: impl IntoOperand) -> Expression {
    binary(Operator::IN, left, right)
}

pub fn is_null(operand: impl IntoOperand) -> Expression {
    fold(Combinator::IsNull, vec![operand.into_operand(), Expression::Null])
}

pub fn is_not_null(operand: impl IntoOperand) -> Expression {
    fold(Combinator::IsNotNull, vec![operand.into_operand(), Expression::Null])
}

/// Comma separated list, rendered `(a,b,c)`
pub fn pair(operands: impl IntoIterator<Item = Expression>) -> Expression {
    fold(Combinator::Pair, operands.into_iter().collect())
}

/// Full-text `MATCH(cols) AGAINST (query IN BOOLEAN MODE)`
pub fn matches(columns: impl IntoOperand, against: impl IntoOperand) -> Expression {
    fold(
        Combinator::Match,
        vec![columns.into_operand(), against.into_operand()],
    )
}

fn function(f: SqlFunction, inner: Expression) -> Expression {
    Decorator::new(inner, f).into()
}

pub fn count(inner: Expression) -> Expression {
    function(SqlFunction::Count, inner)
}

pub fn max(inner: Expression) -> Expression {
    function(SqlFunction::Max, inner)
}

pub fn min(inner: Expression) -> Expression {
    function(SqlFunction::Min, inner)
}

pub fn sum(inner: Expression) -> Expression {
    function(SqlFunction::Sum, inner)
}

pub fn avg(inner: Expression) -> Expression {
    function(SqlFunction::Avg, inner)
}

pub fn distinct(inner: Expression) -> Expression {
    function(SqlFunction::Distinct, inner)
}

//! Clause entities
//!
//! An entity is one item of a clause: a selected column, a FROM table, a
//! join, a condition, a grouping or ordering target, or the limit. Each
//! entity wraps exactly one expression and checks at construction that the
//! expression may appear in its clause.

use std::fmt;

use crate::domain::Domain;
use crate::error::{ParseError, ParseResult, Result};
use crate::expression::{Aliasable, Clause, Expression, Render, TableDefinition, WhereExpr};
use crate::operator::{is_wrapped, Combinator};

/// The statement an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    From,
    Join,
    Where,
    Group,
    Having,
    Order,
    Limit,
}

impl StatementKind {
    /// Text emitted before the first entity
    pub fn keyword(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT ",
            StatementKind::From | StatementKind::Join => "",
            StatementKind::Where => "WHERE ",
            StatementKind::Group => "GROUP BY ",
            StatementKind::Having => "HAVING ",
            StatementKind::Order => "ORDER BY ",
            StatementKind::Limit => "LIMIT ",
        }
    }

    /// Whether the statement keeps only its most recent entity
    pub fn holds_one(&self) -> bool {
        matches!(self, StatementKind::Limit)
    }

    /// Text placed between rendered entities
    pub fn separator(&self) -> &'static str {
        match self {
            StatementKind::Select
            | StatementKind::From
            | StatementKind::Group
            | StatementKind::Order => ",",
            StatementKind::Join => " ",
            StatementKind::Where | StatementKind::Having => " AND ",
            StatementKind::Limit => "",
        }
    }
}

/// An item of a clause
pub trait Entity: Render + fmt::Debug + Clone + PartialEq {
    const KIND: StatementKind;

    /// Render as part of the enclosing statement
    fn render_in_statement(&self, domain: &mut Domain) -> ParseResult<String> {
        self.render(domain)
    }
}

fn with_alias(rendered: String, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("{} AS {}", rendered, alias),
        None => rendered,
    }
}

/// A selected column
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    column: Expression,
}

impl Select {
    pub fn new(column: impl Into<Expression>) -> Result<Self> {
        let column = column.into();
        column.check(Clause::Select)?;
        Ok(Self { column })
    }

    pub fn column(&self) -> &Expression {
        &self.column
    }
}

impl Render for Select {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let rendered = self.column.render(domain)?;
        Ok(with_alias(rendered, self.column.alias()))
    }
}

impl Entity for Select {
    const KIND: StatementKind = StatementKind::Select;
}

/// A table in the FROM clause
#[derive(Debug, Clone, PartialEq)]
pub struct From {
    table: TableDefinition,
}

impl From {
    pub fn new(table: TableDefinition) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TableDefinition {
        &self.table
    }
}

impl Render for From {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let rendered = self.table.render(domain)?;
        Ok(with_alias(rendered, self.table.alias()))
    }
}

impl Entity for From {
    const KIND: StatementKind = StatementKind::From;
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Bare `JOIN`
    #[default]
    Plain,
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Plain => write!(f, "JOIN"),
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
            JoinType::Right => write!(f, "RIGHT JOIN"),
            JoinType::Full => write!(f, "FULL OUTER JOIN"),
            JoinType::Cross => write!(f, "CROSS JOIN"),
        }
    }
}

/// A joined table with its accumulated ON conditions
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    table: TableDefinition,
    join_type: JoinType,
    conditions: Where,
}

impl Join {
    pub fn new(table: TableDefinition, join_type: JoinType, conditions: Where) -> Self {
        Self {
            table,
            join_type,
            conditions,
        }
    }

    pub fn table(&self) -> &TableDefinition {
        &self.table
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn conditions(&self) -> &Where {
        &self.conditions
    }

    /// AND more conditions onto the ON clause
    pub fn augment(&mut self, more: Where) {
        let combined = match (self.conditions.condition.take(), more.condition) {
            (Some(current), Some(extra)) => Some(Expression::Where(WhereExpr::new(
                Combinator::AND,
                vec![current, extra],
            ))),
            (current, extra) => current.or(extra),
        };
        self.conditions.condition = combined;
    }

    /// Whether this join targets `table` by alias or name
    pub fn targets(&self, table: &str) -> bool {
        self.table.alias.as_deref() == Some(table) || self.table.name == table
    }
}

impl Render for Join {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let rendered = with_alias(self.table.render(domain)?, self.table.alias());
        let on = self.conditions.render(domain)?;
        if on.is_empty() {
            return Ok(rendered);
        }
        if is_wrapped(&on) {
            Ok(format!("{} ON {}", rendered, on))
        } else {
            Ok(format!("{} ON ({})", rendered, on))
        }
    }
}

impl Entity for Join {
    const KIND: StatementKind = StatementKind::Join;

    fn render_in_statement(&self, domain: &mut Domain) -> ParseResult<String> {
        Ok(format!("{} {}", self.join_type, self.render(domain)?))
    }
}

/// A condition of the WHERE clause, or the ON clause of a join
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Where {
    condition: Option<Expression>,
}

impl Where {
    pub fn new(condition: impl Into<Expression>) -> Result<Self> {
        let condition = condition.into();
        condition.check(Clause::Where)?;
        Ok(Self {
            condition: Some(condition),
        })
    }

    /// A condition that renders nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn condition(&self) -> Option<&Expression> {
        self.condition.as_ref()
    }
}

impl Render for Where {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        match &self.condition {
            Some(condition) => condition.render(domain),
            None => Ok(String::new()),
        }
    }
}

impl Entity for Where {
    const KIND: StatementKind = StatementKind::Where;
}

/// A GROUP BY target
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    target: Expression,
}

impl Group {
    pub fn new(target: impl Into<Expression>) -> Result<Self> {
        let target = target.into();
        target.check(Clause::Group)?;
        Ok(Self { target })
    }

    pub fn target(&self) -> &Expression {
        &self.target
    }
}

impl Render for Group {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        self.target.render(domain)
    }
}

impl Entity for Group {
    const KIND: StatementKind = StatementKind::Group;
}

/// A HAVING condition.
///
/// Accepted and stored, but rendering one fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Having {
    condition: Expression,
}

impl Having {
    pub fn new(condition: impl Into<Expression>) -> Result<Self> {
        let condition = condition.into();
        condition.check(Clause::Having)?;
        Ok(Self { condition })
    }

    pub fn condition(&self) -> &Expression {
        &self.condition
    }
}

impl Render for Having {
    fn render(&self, _domain: &mut Domain) -> ParseResult<String> {
        Err(ParseError::not_implemented("HAVING clause rendering"))
    }
}

impl Entity for Having {
    const KIND: StatementKind = StatementKind::Having;
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// An ORDER BY target
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    target: Expression,
    direction: SortDirection,
}

impl Order {
    pub fn new(target: impl Into<Expression>, direction: SortDirection) -> Result<Self> {
        let target = target.into();
        target.check(Clause::Order)?;
        Ok(Self { target, direction })
    }

    pub fn target(&self) -> &Expression {
        &self.target
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl Render for Order {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        Ok(format!("{} {}", self.target.render(domain)?, self.direction))
    }
}

impl Entity for Order {
    const KIND: StatementKind = StatementKind::Order;
}

/// Row count and offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    number: u64,
    offset: u64,
}

impl Limit {
    /// Row count used when none is given
    pub const UNBOUNDED: u64 = i32::MAX as u64;

    /// A missing or zero row count means unbounded
    pub fn new(number: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            number: number.filter(|n| *n > 0).unwrap_or(Self::UNBOUNDED),
            offset: offset.unwrap_or(0),
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Render for Limit {
    fn render(&self, _domain: &mut Domain) -> ParseResult<String> {
        Ok(String::new())
    }
}

impl Entity for Limit {
    const KIND: StatementKind = StatementKind::Limit;

    fn render_in_statement(&self, _domain: &mut Domain) -> ParseResult<String> {
        Ok(format!("{} OFFSET {}", self.number, self.offset))
    }
}

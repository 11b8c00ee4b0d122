//! Renderable expression nodes
//!
//! Every node renders against a [`Domain`]. Definitions and references
//! validate themselves against the tables and columns visible in the domain;
//! arithmetic fragments, literals and column positions are self-evaluated.

mod decorator;
mod definition;
mod reference;
mod where_expr;

use std::sync::Arc;

pub use decorator::{Decorator, SqlFunction, Transform};
pub use definition::{ColumnDefinition, TableDefinition};
pub use reference::{ColumnReference, TableReference};
pub use where_expr::{MapFn, WhereExpr};

use crate::domain::{ColumnSymbol, Domain};
use crate::error::{ParseError, ParseResult};
use crate::query::Query;
use crate::Value;

/// Anything that renders to a SQL fragment against a domain
pub trait Render {
    fn render(&self, domain: &mut Domain) -> ParseResult<String>;
}

/// Nodes carrying an optional alias
pub trait Aliasable {
    fn alias(&self) -> Option<&str>;

    fn set_alias(&mut self, alias: Option<String>) -> ParseResult<()>;
}

/// Clause roles an expression may legally appear in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Select,
    From,
    Where,
    Group,
    Having,
    Order,
}

/// A raw SQL fragment printed verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arithmetic {
    pub expression: String,
    pub alias: Option<String>,
}

impl Arithmetic {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Legacy numeric reference to a selected column (`ORDER BY 2`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPosition {
    pub position: u32,
    pub alias: Option<String>,
}

impl ColumnPosition {
    pub fn new(position: u32) -> Self {
        Self {
            position,
            alias: None,
        }
    }
}

/// A renderable AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    TableDefinition(TableDefinition),
    TableReference(TableReference),
    ColumnDefinition(ColumnDefinition),
    ColumnReference(ColumnReference),
    ColumnPosition(ColumnPosition),
    Arithmetic(Arithmetic),
    /// Typed literal, rendered inline unless wrapped by a bind decorator
    Literal(Value),
    Decorator(Decorator),
    /// Empty operand placeholder
    Null,
    Where(WhereExpr),
    /// A query nested as an operand, rendered in its own scope
    Subquery(Arc<Query>),
}

impl Expression {
    /// Whether this node may appear in the given clause
    pub fn supports(&self, clause: Clause) -> bool {
        use Clause::*;
        match self {
            Expression::TableDefinition(_) => clause == From,
            Expression::TableReference(_) => false,
            Expression::ColumnDefinition(_) => clause == Select,
            Expression::ColumnReference(_) => matches!(clause, Where | Group | Having | Order),
            Expression::ColumnPosition(_) => matches!(clause, Group | Order),
            Expression::Arithmetic(_) | Expression::Literal(_) => {
                matches!(clause, Select | Where | Having)
            }
            Expression::Decorator(_) => clause != From,
            Expression::Null | Expression::Where(_) | Expression::Subquery(_) => clause == Where,
        }
    }

    /// The symbol this node contributes when it defines a selected column
    pub fn column_symbol(&self) -> Option<ColumnSymbol> {
        match self {
            Expression::ColumnDefinition(c) => Some(c.symbol()),
            Expression::Arithmetic(a) => Some(ColumnSymbol {
                name: None,
                alias: a.alias.clone(),
                table: None,
            }),
            Expression::Literal(_) => Some(ColumnSymbol::default()),
            Expression::Decorator(d) => d.inner().column_symbol(),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Expression::TableDefinition(_) => "table definition",
            Expression::TableReference(_) => "table reference",
            Expression::ColumnDefinition(_) => "column definition",
            Expression::ColumnReference(_) => "column reference",
            Expression::ColumnPosition(_) => "column position",
            Expression::Arithmetic(_) => "arithmetic expression",
            Expression::Literal(_) => "literal",
            Expression::Decorator(_) => "decorator",
            Expression::Null => "null placeholder",
            Expression::Where(_) => "where expression",
            Expression::Subquery(_) => "subquery",
        }
    }

    /// Reject nodes that may not appear in `clause`
    pub(crate) fn check(&self, clause: Clause) -> crate::Result<()> {
        if self.supports(clause) {
            Ok(())
        } else {
            Err(crate::Error::invalid_argument(format!(
                "{} cannot be used in a {:?} clause",
                self.kind(),
                clause
            )))
        }
    }
}

impl Render for Expression {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        match self {
            Expression::TableDefinition(t) => t.render(domain),
            Expression::TableReference(t) => t.render(domain),
            Expression::ColumnDefinition(c) => c.render(domain),
            Expression::ColumnReference(c) => c.render(domain),
            Expression::ColumnPosition(p) => Ok(p.position.to_string()),
            Expression::Arithmetic(a) => Ok(a.expression.clone()),
            Expression::Literal(v) => Ok(v.to_sql_inline()),
            Expression::Decorator(d) => d.render(domain),
            Expression::Null => Ok(String::new()),
            Expression::Where(w) => w.render(domain),
            Expression::Subquery(q) => Ok(format!("({})", q.render_scoped(domain)?)),
        }
    }
}

impl Aliasable for Expression {
    fn alias(&self) -> Option<&str> {
        match self {
            Expression::TableDefinition(t) => t.alias(),
            Expression::ColumnDefinition(c) => c.alias(),
            Expression::ColumnPosition(p) => p.alias.as_deref(),
            Expression::Arithmetic(a) => a.alias.as_deref(),
            Expression::Decorator(d) => d.alias(),
            _ => None,
        }
    }

    fn set_alias(&mut self, alias: Option<String>) -> ParseResult<()> {
        match self {
            Expression::TableDefinition(t) => t.set_alias(alias),
            Expression::ColumnDefinition(c) => c.set_alias(alias),
            Expression::ColumnPosition(p) => {
                p.alias = alias;
                Ok(())
            }
            Expression::Arithmetic(a) => {
                a.alias = alias;
                Ok(())
            }
            Expression::Decorator(d) => d.set_alias(alias),
            other => Err(ParseError::InvalidArgument {
                message: format!("{} cannot carry an alias", other.kind()),
            }),
        }
    }
}

impl From<TableDefinition> for Expression {
    fn from(t: TableDefinition) -> Self {
        Expression::TableDefinition(t)
    }
}

impl From<TableReference> for Expression {
    fn from(t: TableReference) -> Self {
        Expression::TableReference(t)
    }
}

impl From<ColumnDefinition> for Expression {
    fn from(c: ColumnDefinition) -> Self {
        Expression::ColumnDefinition(c)
    }
}

impl From<ColumnReference> for Expression {
    fn from(c: ColumnReference) -> Self {
        Expression::ColumnReference(c)
    }
}

impl From<ColumnPosition> for Expression {
    fn from(p: ColumnPosition) -> Self {
        Expression::ColumnPosition(p)
    }
}

impl From<Arithmetic> for Expression {
    fn from(a: Arithmetic) -> Self {
        Expression::Arithmetic(a)
    }
}

impl From<Decorator> for Expression {
    fn from(d: Decorator) -> Self {
        Expression::Decorator(d)
    }
}

impl From<WhereExpr> for Expression {
    fn from(w: WhereExpr) -> Self {
        Expression::Where(w)
    }
}

impl From<Query> for Expression {
    fn from(q: Query) -> Self {
        Expression::Subquery(Arc::new(q))
    }
}

impl From<Arc<Query>> for Expression {
    fn from(q: Arc<Query>) -> Self {
        Expression::Subquery(q)
    }
}

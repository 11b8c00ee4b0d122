//! Decorators wrapping an expression in a transform

use std::fmt;

use crate::domain::Domain;
use crate::error::ParseResult;
use crate::value::PLACEHOLDER;
use crate::Value;

use super::{Aliasable, Expression, Render};

/// Aggregate and function wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlFunction {
    Count,
    Max,
    Min,
    Sum,
    Avg,
    Distinct,
}

impl SqlFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlFunction::Count => "COUNT",
            SqlFunction::Max => "MAX",
            SqlFunction::Min => "MIN",
            SqlFunction::Sum => "SUM",
            SqlFunction::Avg => "AVG",
            SqlFunction::Distinct => "DISTINCT",
        }
    }
}

impl fmt::Display for SqlFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a [`Decorator`] does to the rendered inner expression
#[derive(Clone, Copy)]
pub enum Transform {
    /// `FUNC(inner)`
    Function(SqlFunction),
    /// Record the inner value as a bind parameter and emit a placeholder
    Bind,
    /// Caller supplied transform, free to read or write the domain
    Custom {
        name: &'static str,
        apply: fn(&mut Domain, &str) -> String,
    },
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Function(f) => f.as_str(),
            Transform::Bind => "BIND",
            Transform::Custom { name, .. } => name,
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform({})", self.name())
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Transform::Function(a), Transform::Function(b)) => a == b,
            (Transform::Bind, Transform::Bind) => true,
            (Transform::Custom { name: a, .. }, Transform::Custom { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl From<SqlFunction> for Transform {
    fn from(f: SqlFunction) -> Self {
        Transform::Function(f)
    }
}

/// An expression rendered through a [`Transform`].
///
/// Aliases belong to the wrapped expression, so `MAX(t.bar) AS top` keeps
/// `top` on the column definition inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    inner: Box<Expression>,
    transform: Transform,
}

impl Decorator {
    pub fn new(inner: impl Into<Expression>, transform: impl Into<Transform>) -> Self {
        Self {
            inner: Box::new(inner.into()),
            transform: transform.into(),
        }
    }

    /// Bind `value` as a parameter
    pub fn bind(value: impl Into<Value>) -> Self {
        Self::new(Expression::Literal(value.into()), Transform::Bind)
    }

    pub fn inner(&self) -> &Expression {
        &self.inner
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }
}

impl Render for Decorator {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        match self.transform {
            Transform::Bind => {
                let value = match self.inner.as_ref() {
                    Expression::Literal(v) => v.clone(),
                    other => Value::String(other.render(domain)?),
                };
                domain.bind(value);
                Ok(PLACEHOLDER.to_string())
            }
            Transform::Function(f) => Ok(format!("{}({})", f, self.inner.render(domain)?)),
            Transform::Custom { apply, .. } => {
                let rendered = self.inner.render(domain)?;
                Ok(apply(domain, &rendered))
            }
        }
    }
}

impl Aliasable for Decorator {
    fn alias(&self) -> Option<&str> {
        self.inner.alias()
    }

    fn set_alias(&mut self, alias: Option<String>) -> ParseResult<()> {
        self.inner.set_alias(alias)
    }
}

//! Map/reduce condition trees

use std::fmt;

use crate::domain::Domain;
use crate::error::{Error, ParseResult, Result};
use crate::operator::Combinator;

use super::{Expression, Render};

/// Per-operand transform applied before reducing
#[derive(Clone, Copy)]
pub struct MapFn {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

impl fmt::Debug for MapFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapFn({})", self.name)
    }
}

impl PartialEq for MapFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A condition built by rendering each operand, optionally mapping it, and
/// folding the results left to right with a [`Combinator`].
///
/// A non-empty result is wrapped in parentheses, so nested conditions keep
/// their grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereExpr {
    operands: Vec<Expression>,
    map: Option<MapFn>,
    reduce: Option<Combinator>,
    seed: Option<String>,
}

impl WhereExpr {
    pub fn new(reduce: impl Into<Combinator>, operands: Vec<Expression>) -> Self {
        Self {
            operands,
            map: None,
            reduce: Some(reduce.into()),
            seed: None,
        }
    }

    /// A single condition with nothing to combine
    pub fn single(operand: impl Into<Expression>) -> Self {
        Self {
            operands: vec![operand.into()],
            map: None,
            reduce: None,
            seed: None,
        }
    }

    /// Assemble from raw parts.
    ///
    /// Two or more operands need a reduce strategy.
    pub fn from_parts(
        operands: Vec<Expression>,
        map: Option<MapFn>,
        reduce: Option<Combinator>,
        seed: Option<String>,
    ) -> Result<Self> {
        let expr = Self {
            operands,
            map,
            reduce,
            seed,
        };
        expr.validate()?;
        Ok(expr)
    }

    pub fn with_map(mut self, map: MapFn) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn push(&mut self, operand: impl Into<Expression>) -> Result<()> {
        if self.reduce.is_none() && !self.operands.is_empty() {
            return Err(Error::invalid_argument(
                "a condition with several operands needs a reduce combinator",
            ));
        }
        self.operands.push(operand.into());
        Ok(())
    }

    pub fn operands(&self) -> &[Expression] {
        &self.operands
    }

    pub fn reduce(&self) -> Option<Combinator> {
        self.reduce
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.reduce.is_none() && self.operands.len() > 1 {
            return Err(Error::invalid_argument(format!(
                "a condition with {} operands needs a reduce combinator",
                self.operands.len()
            )));
        }
        Ok(())
    }
}

impl Render for WhereExpr {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let mut acc = self.seed.clone();
        for operand in &self.operands {
            let mut rendered = operand.render(domain)?;
            if let Some(map) = &self.map {
                rendered = (map.apply)(&rendered);
            }
            acc = Some(match (acc, &self.reduce) {
                (None, _) => rendered,
                (Some(prev), Some(reduce)) => reduce.reduce(&prev, &rendered),
                (Some(prev), None) => prev + &rendered,
            });
        }
        Ok(match acc {
            Some(s) if !s.is_empty() => format!("({})", s),
            _ => String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Arithmetic, Decorator};
    use crate::operator::Operator;
    use crate::Value;

    fn raw(s: &str) -> Expression {
        Arithmetic::new(s).into()
    }

    #[test]
    fn test_binary_condition() {
        let mut domain = Domain::new();
        let w = WhereExpr::new(Operator::EQ, vec![raw("a"), raw("b")]);
        assert_eq!(w.render(&mut domain).unwrap(), "(a = b)");
    }

    #[test]
    fn test_nested_conditions_keep_parentheses() {
        let mut domain = Domain::new();
        let inner = WhereExpr::new(Operator::LT, vec![raw("x"), raw("1")]);
        let w = WhereExpr::new(Combinator::OR, vec![inner.into(), raw("y")]);
        assert_eq!(w.render(&mut domain).unwrap(), "((x < 1) OR y)");
    }

    #[test]
    fn test_empty_renders_nothing() {
        let mut domain = Domain::new();
        let w = WhereExpr::new(Combinator::AND, vec![]);
        assert_eq!(w.render(&mut domain).unwrap(), "");
        let w = WhereExpr::single(Expression::Null);
        assert_eq!(w.render(&mut domain).unwrap(), "");
    }

    #[test]
    fn test_is_null_ignores_placeholder() {
        let mut domain = Domain::new();
        let w = WhereExpr::new(Combinator::IsNull, vec![raw("deleted_at"), Expression::Null]);
        assert_eq!(w.render(&mut domain).unwrap(), "(deleted_at IS NULL)");
    }

    #[test]
    fn test_map_and_seed() {
        fn upper(s: &str) -> String {
            s.to_uppercase()
        }
        let mut domain = Domain::new();
        let w = WhereExpr::new(Combinator::Pair, vec![raw("a"), raw("b")])
            .with_map(MapFn {
                name: "upper",
                apply: upper,
            })
            .with_seed("s");
        assert_eq!(w.render(&mut domain).unwrap(), "(s,A,B)");
    }

    #[test]
    fn test_several_operands_need_reduce() {
        let err = WhereExpr::from_parts(vec![raw("a"), raw("b")], None, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let mut single = WhereExpr::single(raw("a"));
        assert!(single.push(raw("b")).is_err());
        assert_eq!(single.operands().len(), 1);
    }

    #[test]
    fn test_binds_in_operand_order() {
        let mut domain = Domain::new();
        let w = WhereExpr::new(
            Combinator::Pair,
            vec![Decorator::bind(1).into(), Decorator::bind(2).into()],
        );
        assert_eq!(w.render(&mut domain).unwrap(), "(?,?)");
        assert_eq!(domain.bound_params(), &[Value::I32(1), Value::I32(2)]);
    }
}

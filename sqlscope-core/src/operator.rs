//! SQL operator types and the combinators built on them

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Error;

/// Type-safe binary SQL operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator(&'static str);

impl Operator {
    pub const AND: Self = Operator("AND");
    pub const OR: Self = Operator("OR");
    pub const EQ: Self = Operator("=");
    pub const NE: Self = Operator("<>");
    pub const LT: Self = Operator("<");
    pub const GT: Self = Operator(">");
    pub const LE: Self = Operator("<=");
    pub const GE: Self = Operator(">=");
    pub const LIKE: Self = Operator("LIKE");
    pub const IN: Self = Operator("IN");

    /// Create a custom operator for database-specific operations
    ///
    /// # Examples
    /// ```
    /// use sqlscope_core::Operator;
    ///
    /// // PostgreSQL full-text search
    /// let fts_op = Operator::custom("@@");
    /// assert_eq!(fts_op.as_str(), "@@");
    /// ```
    pub const fn custom(op: &'static str) -> Self {
        Operator(op)
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Join two rendered operands with this operator
    pub fn apply(&self, left: &str, right: &str) -> String {
        format!("{} {} {}", left, self.0, right)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Operator::AND),
            "OR" => Ok(Operator::OR),
            "=" => Ok(Operator::EQ),
            "<>" | "!=" => Ok(Operator::NE),
            "<" => Ok(Operator::LT),
            ">" => Ok(Operator::GT),
            "<=" => Ok(Operator::LE),
            ">=" => Ok(Operator::GE),
            "LIKE" => Ok(Operator::LIKE),
            "IN" => Ok(Operator::IN),
            _ => Err(Error::invalid_argument(format!(
                "unknown operator '{}', use Operator::custom for database-specific operators",
                s
            ))),
        }
    }
}

/// Pairwise reduce strategy of a [`WhereExpr`](crate::expression::WhereExpr)
///
/// The first argument is the accumulated string, the second the next rendered
/// operand.
#[derive(Clone, Copy)]
pub enum Combinator {
    /// `left OP right`
    Infix(Operator),
    /// `left IS NULL`, the right operand is ignored
    IsNull,
    /// `left IS NOT NULL`, the right operand is ignored
    IsNotNull,
    /// `left,right`
    Pair,
    /// `MATCH(left) AGAINST (right IN BOOLEAN MODE)`
    Match,
    /// Caller supplied reduce function
    Custom {
        name: &'static str,
        apply: fn(&str, &str) -> String,
    },
}

impl Combinator {
    pub const AND: Self = Combinator::Infix(Operator::AND);
    pub const OR: Self = Combinator::Infix(Operator::OR);

    pub fn reduce(&self, acc: &str, next: &str) -> String {
        match self {
            Combinator::Infix(op) => op.apply(acc, next),
            Combinator::IsNull => format!("{} IS NULL", acc),
            Combinator::IsNotNull => format!("{} IS NOT NULL", acc),
            Combinator::Pair => format!("{},{}", acc, next),
            Combinator::Match => format!(
                "MATCH({}) AGAINST ({} IN BOOLEAN MODE)",
                strip_parens(acc),
                strip_parens(next)
            ),
            Combinator::Custom { apply, .. } => apply(acc, next),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Combinator::Infix(op) => op.as_str(),
            Combinator::IsNull => "IS NULL",
            Combinator::IsNotNull => "IS NOT NULL",
            Combinator::Pair => ",",
            Combinator::Match => "MATCH",
            Combinator::Custom { name, .. } => name,
        }
    }
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Combinator({})", self.name())
    }
}

// Custom combinators compare by name.
impl PartialEq for Combinator {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Combinator::Infix(a), Combinator::Infix(b)) => a == b,
            (Combinator::Custom { name: a, .. }, Combinator::Custom { name: b, .. }) => a == b,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl From<Operator> for Combinator {
    fn from(op: Operator) -> Self {
        Combinator::Infix(op)
    }
}

/// Remove one pair of enclosing parentheses, if the whole string is wrapped
pub(crate) fn strip_parens(s: &str) -> &str {
    if is_wrapped(s) {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Whether `s` is a single balanced `( ... )` group
pub(crate) fn is_wrapped(s: &str) -> bool {
    if !(s.starts_with('(') && s.ends_with(')')) {
        return false;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != s.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const AND: Operator = Operator::AND;
    pub const OR: Operator = Operator::OR;
    pub const EQ: Operator = Operator::EQ;
    pub const NE: Operator = Operator::NE;
    pub const LT: Operator = Operator::LT;
    pub const GT: Operator = Operator::GT;
    pub const LE: Operator = Operator::LE;
    pub const GE: Operator = Operator::GE;
    pub const LIKE: Operator = Operator::LIKE;
    pub const IN: Operator = Operator::IN;
}

//! Table and column references
//!
//! A reference uses a name some definition introduced. Rendering fails when
//! the name matches more than one visible definition, or names a table that
//! is not in scope.

use tracing::trace;

use crate::domain::{ColumnSymbol, Domain};
use crate::error::{ParseError, ParseResult};

use super::Render;

/// A use of a table's alias or name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReference {
    pub name: String,
}

impl TableReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Render for TableReference {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let count = domain
            .tables()
            .iter()
            .filter(|t| t.answers_to(&self.name))
            .count();
        if count > 1 {
            return Err(ParseError::ambiguous_reference(&self.name, count));
        }
        Ok(self.name.clone())
    }
}

/// A use of a column name, optionally qualified by a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
    pub name: String,
    pub table: Option<TableReference>,
}

impl ColumnReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
        }
    }

    pub fn of(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: Some(TableReference::new(table)),
        }
    }

    fn matches(&self, column: &ColumnSymbol) -> bool {
        column.alias.as_deref() == Some(self.name.as_str())
            || column.name.as_deref() == Some(self.name.as_str())
    }

    /// Pick the FROM table when several selected columns share this name
    fn auto_resolve(&self, domain: &Domain) -> ParseResult<Option<String>> {
        let mut tables: Vec<&str> = Vec::new();
        for column in domain.columns().iter().filter(|c| self.matches(c)) {
            if let Some(table) = column.table.as_deref() {
                if !tables.contains(&table) {
                    tables.push(table);
                }
            }
        }
        if tables.len() <= 1 {
            return Ok(None);
        }
        match domain.from() {
            [only] => {
                trace!(
                    column = %self.name,
                    table = only.display_name(),
                    "auto-resolved column reference to FROM table"
                );
                Ok(Some(only.display_name().to_string()))
            }
            _ => Err(ParseError::ambiguous_reference(&self.name, tables.len())),
        }
    }
}

impl Render for ColumnReference {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let mut qualifier = match &self.table {
            Some(table) => Some(table.name.clone()),
            None => self.auto_resolve(domain)?,
        };
        if let Some(q) = &qualifier {
            TableReference::new(q.as_str()).render(domain)?;
        }

        let unqualified = qualifier.is_none();
        let count = domain
            .columns()
            .iter()
            .filter(|c| {
                c.alias.as_deref() == Some(self.name.as_str())
                    || (unqualified && c.name.as_deref() == Some(self.name.as_str()))
            })
            .count();
        if count > 1 {
            return Err(ParseError::ambiguous_reference(&self.name, count));
        }

        // A bare name inherits the table of the selected column it names. An
        // alias stands on its own.
        if unqualified {
            qualifier = domain
                .columns()
                .iter()
                .find(|c| self.matches(c))
                .filter(|c| c.alias.as_deref() != Some(self.name.as_str()))
                .and_then(|c| c.table.clone());
        }

        match qualifier {
            Some(q) => {
                let table = domain
                    .scope()
                    .find_table(&q)
                    .ok_or_else(|| ParseError::unresolved_table(&self.name, &q))?;
                Ok(format!("{}.{}", table.display_name(), self.name))
            }
            None => Ok(self.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TableSymbol;

    fn table(name: &str, alias: Option<&str>) -> TableSymbol {
        TableSymbol::new(name, alias.map(str::to_string))
    }

    fn column(table: Option<&str>, name: &str, alias: Option<&str>) -> ColumnSymbol {
        ColumnSymbol {
            name: Some(name.to_string()),
            alias: alias.map(str::to_string),
            table: table.map(str::to_string),
        }
    }

    fn domain(
        from: Vec<TableSymbol>,
        joined: Vec<TableSymbol>,
        columns: Vec<ColumnSymbol>,
    ) -> Domain {
        let mut domain = Domain::new();
        domain.enter_scope(from, joined, columns);
        domain
    }

    #[test]
    fn test_table_reference_by_alias_or_name() {
        let mut d = domain(vec![table("users", Some("u"))], vec![], vec![]);
        assert_eq!(TableReference::new("u").render(&mut d).unwrap(), "u");
        assert_eq!(TableReference::new("users").render(&mut d).unwrap(), "users");
    }

    #[test]
    fn test_table_reference_ambiguous() {
        let mut d = domain(
            vec![table("t1", Some("a"))],
            vec![table("t1", Some("b"))],
            vec![],
        );
        assert_eq!(
            TableReference::new("t1").render(&mut d).unwrap_err(),
            ParseError::ambiguous_reference("t1", 2)
        );
        assert!(TableReference::new("b").render(&mut d).is_ok());
    }

    #[test]
    fn test_qualified_reference_uses_display_name() {
        let mut d = domain(vec![table("users", Some("u"))], vec![], vec![]);
        let r = ColumnReference::of("users", "id");
        assert_eq!(r.render(&mut d).unwrap(), "u.id");
    }

    #[test]
    fn test_unknown_table_is_unresolved() {
        let mut d = domain(vec![table("users", None)], vec![], vec![]);
        let r = ColumnReference::of("ghost", "id");
        assert_eq!(
            r.render(&mut d).unwrap_err(),
            ParseError::unresolved_table("id", "ghost")
        );
    }

    #[test]
    fn test_bare_name_inherits_selected_table() {
        let mut d = domain(
            vec![table("t1", None)],
            vec![],
            vec![column(Some("t1"), "bar", Some("bar_alias"))],
        );
        assert_eq!(ColumnReference::new("bar").render(&mut d).unwrap(), "t1.bar");
        assert_eq!(
            ColumnReference::new("bar_alias").render(&mut d).unwrap(),
            "bar_alias"
        );
    }

    #[test]
    fn test_unselected_name_renders_bare() {
        let mut d = domain(vec![table("t1", None)], vec![], vec![]);
        assert_eq!(ColumnReference::new("x").render(&mut d).unwrap(), "x");
    }

    #[test]
    fn test_auto_resolves_to_single_from_table() {
        let mut d = domain(
            vec![table("t1", Some("a"))],
            vec![table("t2", Some("b"))],
            vec![
                column(Some("a"), "x", Some("ax")),
                column(Some("b"), "x", Some("bx")),
            ],
        );
        assert_eq!(ColumnReference::new("x").render(&mut d).unwrap(), "a.x");
    }

    #[test]
    fn test_ambiguous_without_single_from_table() {
        let mut d = domain(
            vec![table("t1", Some("a")), table("t2", Some("b"))],
            vec![],
            vec![
                column(Some("a"), "x", Some("ax")),
                column(Some("b"), "x", Some("bx")),
            ],
        );
        assert_eq!(
            ColumnReference::new("x").render(&mut d).unwrap_err(),
            ParseError::ambiguous_reference("x", 2)
        );
    }

    #[test]
    fn test_unqualified_duplicates_are_ambiguous() {
        let mut d = domain(
            vec![table("t1", None)],
            vec![],
            vec![column(None, "x", None), column(None, "x", Some("y"))],
        );
        assert_eq!(
            ColumnReference::new("x").render(&mut d).unwrap_err(),
            ParseError::ambiguous_reference("x", 2)
        );
    }
}

//! Table and column definitions
//!
//! A definition introduces a name into the query scope. Rendering checks that
//! its display name (alias if set, else name) is not shared with another
//! visible definition of the same kind.

use crate::domain::{ColumnSymbol, Domain, TableSymbol};
use crate::error::{ParseError, ParseResult};

use super::reference::TableReference;
use super::{Aliasable, Render};

/// A table introduced by FROM or JOIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub alias: Option<String>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// A reference naming this table the way other clauses must
    pub fn to_reference(&self) -> TableReference {
        TableReference::new(self.display_name())
    }

    pub(crate) fn symbol(&self) -> TableSymbol {
        TableSymbol::new(self.name.clone(), self.alias.clone())
    }
}

impl Render for TableDefinition {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let display = self.display_name();
        let count = domain
            .tables()
            .iter()
            .filter(|t| t.display_name() == display)
            .count();
        if count > 1 {
            return Err(ParseError::ambiguous_definition(display, count));
        }
        Ok(self.name.clone())
    }
}

impl Aliasable for TableDefinition {
    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn set_alias(&mut self, alias: Option<String>) -> ParseResult<()> {
        self.alias = alias;
        Ok(())
    }
}

/// A column introduced by the SELECT clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub table: Option<TableReference>,
    pub alias: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            alias: None,
        }
    }

    pub fn of(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: Some(TableReference::new(table)),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn symbol(&self) -> ColumnSymbol {
        ColumnSymbol {
            name: Some(self.name.clone()),
            alias: self.alias.clone(),
            table: self.table.as_ref().map(|t| t.name.clone()),
        }
    }
}

impl Render for ColumnDefinition {
    fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let qualifier = match &self.table {
            Some(table) => Some(table.render(domain)?),
            None => None,
        };

        let display = self.display_name();
        let unqualified = qualifier.is_none();
        let count = domain
            .columns()
            .iter()
            .filter(|c| {
                c.display_name() == Some(display)
                    || (unqualified && c.name.as_deref() == Some(self.name.as_str()))
            })
            .count();
        if count > 1 {
            return Err(ParseError::ambiguous_definition(display, count));
        }

        // An unknown qualifier is printed as written.
        Ok(match qualifier {
            Some(q) => {
                let table = domain
                    .scope()
                    .find_table(&q)
                    .map(|t| t.display_name().to_string())
                    .unwrap_or(q);
                format!("{}.{}", table, self.name)
            }
            None => self.name.clone(),
        })
    }
}

impl Aliasable for ColumnDefinition {
    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn set_alias(&mut self, alias: Option<String>) -> ParseResult<()> {
        self.alias = alias;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain_with(tables: &[TableDefinition], columns: &[ColumnDefinition]) -> Domain {
        let mut domain = Domain::new();
        domain.enter_scope(
            tables.iter().map(TableDefinition::symbol).collect(),
            vec![],
            columns.iter().map(ColumnDefinition::symbol).collect(),
        );
        domain
    }

    #[test]
    fn test_unique_table_renders_name() {
        let t = TableDefinition::aliased("users", "u");
        let mut domain = domain_with(&[t.clone()], &[]);
        assert_eq!(t.render(&mut domain).unwrap(), "users");
    }

    #[test]
    fn test_duplicate_table_display_name() {
        let t = TableDefinition::new("users");
        let mut domain = domain_with(&[t.clone(), TableDefinition::new("users")], &[]);
        assert_eq!(
            t.render(&mut domain).unwrap_err(),
            ParseError::ambiguous_definition("users", 2)
        );
    }

    #[test]
    fn test_alias_disambiguates_tables() {
        let a = TableDefinition::new("users");
        let b = TableDefinition::aliased("users", "u2");
        let mut domain = domain_with(&[a.clone(), b.clone()], &[]);
        assert!(a.render(&mut domain).is_ok());
        assert!(b.render(&mut domain).is_ok());
    }

    #[test]
    fn test_column_qualified_by_table_alias() {
        let t = TableDefinition::aliased("t1", "a");
        let c = ColumnDefinition::of("t1", "x");
        let mut domain = domain_with(&[t], &[c.clone()]);
        assert_eq!(c.render(&mut domain).unwrap(), "a.x");
    }

    #[test]
    fn test_unknown_qualifier_printed_as_written() {
        let c = ColumnDefinition::of("ghost", "x");
        let mut domain = domain_with(&[], &[c.clone()]);
        assert_eq!(c.render(&mut domain).unwrap(), "ghost.x");
    }

    #[test]
    fn test_same_display_name_is_ambiguous() {
        let a = ColumnDefinition::of("a", "x");
        let b = ColumnDefinition::of("b", "x");
        let tables = [TableDefinition::new("a"), TableDefinition::new("b")];
        let mut domain = domain_with(&tables, &[a.clone(), b.clone()]);
        assert_eq!(
            a.render(&mut domain).unwrap_err(),
            ParseError::ambiguous_definition("x", 2)
        );
    }

    #[test]
    fn test_alias_resolves_column_collision() {
        let a = ColumnDefinition::of("a", "x").with_alias("ax");
        let b = ColumnDefinition::of("b", "x");
        let tables = [TableDefinition::new("a"), TableDefinition::new("b")];
        let mut domain = domain_with(&tables, &[a.clone(), b.clone()]);
        assert_eq!(a.render(&mut domain).unwrap(), "a.x");
        assert_eq!(b.render(&mut domain).unwrap(), "b.x");
    }

    #[test]
    fn test_unqualified_column_collides_on_bare_name() {
        let a = ColumnDefinition::new("x").with_alias("first");
        let b = ColumnDefinition::of("t", "x").with_alias("second");
        let mut domain = domain_with(&[TableDefinition::new("t")], &[a.clone(), b.clone()]);
        assert_eq!(
            a.render(&mut domain).unwrap_err(),
            ParseError::ambiguous_definition("first", 2)
        );
        assert_eq!(b.render(&mut domain).unwrap(), "t.x");
    }

    #[test]
    fn test_to_reference_uses_display_name() {
        assert_eq!(TableDefinition::aliased("t1", "a").to_reference().name, "a");
        assert_eq!(TableDefinition::new("t1").to_reference().name, "t1");
    }
}

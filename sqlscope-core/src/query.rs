//! SELECT query assembly and scoped rendering
//!
//! A [`Query`] owns one [`Statement`] per clause. Rendering installs this
//! query's scope in a child [`Domain`], renders the clauses in fixed order,
//! and hands the forward state (bound parameters and any other keys) back to
//! the caller's domain. The tables and columns of the query never leak out.

use tracing::{debug, trace};

use crate::domain::{ColumnSymbol, Domain, TableSymbol};
use crate::entity::{self, Group, Having, Join, Limit, Order, Select, Where};
use crate::error::{ParseResult, Result};
use crate::expression::{Expression, TableDefinition};
use crate::statement::Statement;
use crate::Value;

/// A SELECT query made of eight clause statements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    select: Statement<Select>,
    from: Statement<entity::From>,
    join: Statement<Join>,
    conditions: Statement<Where>,
    group: Statement<Group>,
    having: Statement<Having>,
    order: Statement<Order>,
    limit: Statement<Limit>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected column expressions
    pub fn cols(&self) -> Vec<&Expression> {
        self.select.entities().iter().map(Select::column).collect()
    }

    /// FROM tables followed by JOIN targets
    pub fn tables(&self) -> Vec<&TableDefinition> {
        self.from
            .entities()
            .iter()
            .map(entity::From::table)
            .chain(self.join.entities().iter().map(Join::table))
            .collect()
    }

    /// FROM tables only
    pub fn from(&self) -> Vec<&TableDefinition> {
        self.from.entities().iter().map(entity::From::table).collect()
    }

    /// Selected column entities
    pub fn select_entities(&self) -> &[Select] {
        self.select.entities()
    }

    pub fn joins(&self) -> &[Join] {
        self.join.entities()
    }

    pub fn add_col(mut self, col: Select) -> Self {
        self.select.add(col);
        self
    }

    /// Replace the first selected column equal to `old`
    pub fn replace_col(mut self, old: &Select, new: Select) -> Self {
        if let Some(slot) = self.select.entities_mut().iter_mut().find(|s| **s == *old) {
            *slot = new;
        }
        self
    }

    /// Remove the listed columns, or every column when `cols` is `None`
    pub fn remove_cols(mut self, cols: Option<&[Select]>) -> Self {
        match cols {
            None => self.select.clear(),
            Some(cols) => {
                let kept: Vec<Select> = self
                    .select
                    .entities()
                    .iter()
                    .filter(|s| !cols.contains(s))
                    .cloned()
                    .collect();
                self.select.set_entities(kept);
            }
        }
        self
    }

    pub fn add_from(mut self, from: entity::From) -> Self {
        self.from.add(from);
        self
    }

    pub fn add_join(mut self, join: Join) -> Self {
        self.join.add(join);
        self
    }

    /// AND `conditions` onto the first join targeting `table_or_alias`.
    ///
    /// Leaves the query unchanged when no join matches.
    pub fn add_where_join(mut self, table_or_alias: &str, conditions: Where) -> Self {
        match self
            .join
            .entities_mut()
            .iter_mut()
            .find(|j| j.targets(table_or_alias))
        {
            Some(join) => join.augment(conditions),
            None => debug!(table = table_or_alias, "no join to attach conditions to"),
        }
        self
    }

    pub fn add_where(mut self, condition: Where) -> Self {
        self.conditions.add(condition);
        self
    }

    pub fn add_group(mut self, group: Group) -> Self {
        self.group.add(group);
        self
    }

    pub fn add_having(mut self, having: Having) -> Self {
        self.having.add(having);
        self
    }

    pub fn add_order(mut self, order: Order) -> Self {
        self.order.add(order);
        self
    }

    pub fn set_limit(mut self, limit: Limit) -> Self {
        self.limit.set_entity(limit);
        self
    }

    /// Render against `domain`, leaving the bound parameters in it.
    ///
    /// Pass a fresh domain per render: bind values accumulate.
    pub fn render(&self, domain: &mut Domain) -> Result<String> {
        let sql = self.render_scoped(domain)?;
        debug!(sql = %sql, params = domain.bound_params().len(), "rendered query");
        Ok(sql)
    }

    /// Render in a fresh domain and return the SQL text
    pub fn to_sql(&self) -> Result<String> {
        self.render(&mut Domain::new())
    }

    /// Render in a fresh domain and return the SQL text with its bind values
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        let mut domain = Domain::new();
        let sql = self.render(&mut domain)?;
        Ok((sql, domain.bound_params().to_vec()))
    }

    /// Render in a child of `parent`, copying the forward state back.
    ///
    /// Used both at the top level and for queries nested as operands.
    pub(crate) fn render_scoped(&self, parent: &mut Domain) -> ParseResult<String> {
        let mut domain = parent.child();
        domain.enter_scope(self.from_symbols(), self.join_symbols(), self.column_symbols());
        trace!(
            tables = domain.tables().len(),
            columns = domain.columns().len(),
            "entered query scope"
        );

        let select = self.select.render(&mut domain)?;
        let from = match self.from.render(&mut domain)? {
            tables if tables.is_empty() => tables,
            tables => format!("FROM {}", tables),
        };
        let parts = [
            select,
            from,
            self.join.render(&mut domain)?,
            self.conditions.render(&mut domain)?,
            self.group.render(&mut domain)?,
            self.having.render(&mut domain)?,
            self.order.render(&mut domain)?,
            self.limit.render(&mut domain)?,
        ];
        let sql = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        parent.absorb(domain);
        Ok(sql)
    }

    fn from_symbols(&self) -> Vec<TableSymbol> {
        self.from
            .entities()
            .iter()
            .map(|f| f.table().symbol())
            .collect()
    }

    fn join_symbols(&self) -> Vec<TableSymbol> {
        self.join
            .entities()
            .iter()
            .map(|j| j.table().symbol())
            .collect()
    }

    fn column_symbols(&self) -> Vec<ColumnSymbol> {
        self.select
            .entities()
            .iter()
            .filter_map(|s| s.column().column_symbol())
            .collect()
    }
}

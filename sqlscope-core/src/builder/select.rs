//! Fluent SELECT builder over shorthand strings

use crate::entity::{self, Group, Join, JoinType, Limit, Order, Select, SortDirection, Where};
use crate::expression::{Decorator, Expression, TableDefinition, Transform};
use crate::query::Query;
use crate::{Result, Value};

use super::{aliased, and, col_def, col_ref, in_, pair, param, position_or_ref, table_def};

/// String-driven front-end to [`Query`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_query(query: Query) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn into_query(self) -> Query {
        self.query
    }

    fn column(spec: &str, alias: Option<&str>, transform: Option<Transform>) -> Result<Select> {
        let mut column = col_def(spec);
        if let Some(alias) = alias {
            column = aliased(column, alias)?;
        }
        if let Some(transform) = transform {
            column = Decorator::new(column, transform).into();
        }
        Select::new(column)
    }

    /// Select `"table.col"`, `"col"` or `"=expr"`
    pub fn add_col(self, spec: &str) -> Result<Self> {
        self.add_col_with(spec, None, None)
    }

    pub fn add_col_as(self, spec: &str, alias: &str) -> Result<Self> {
        self.add_col_with(spec, Some(alias), None)
    }

    /// Select a column through an optional alias and transform
    pub fn add_col_with(
        mut self,
        spec: &str,
        alias: Option<&str>,
        transform: Option<Transform>,
    ) -> Result<Self> {
        let select = Self::column(spec, alias, transform)?;
        self.query = self.query.add_col(select);
        Ok(self)
    }

    /// Select several columns of one table
    pub fn add_cols(mut self, table: &str, cols: &[&str]) -> Result<Self> {
        for col in cols {
            self = self.add_col(&format!("{}.{}", table, col))?;
        }
        Ok(self)
    }

    /// Select several columns of `table`, each with its own alias and
    /// decorator
    pub fn add_cols_with(
        mut self,
        table: &str,
        cols: &[(&str, Option<&str>, Option<Transform>)],
    ) -> Result<Self> {
        for (col, alias, transform) in cols {
            self = self.add_col_with(&format!("{}.{}", table, col), *alias, *transform)?;
        }
        Ok(self)
    }

    pub fn replace_col(mut self, old: &Select, spec: &str, alias: Option<&str>) -> Result<Self> {
        let select = Self::column(spec, alias, None)?;
        self.query = self.query.replace_col(old, select);
        Ok(self)
    }

    pub fn remove_cols(mut self, cols: Option<&[Select]>) -> Self {
        self.query = self.query.remove_cols(cols);
        self
    }

    pub fn add_from<'a>(mut self, table: &str, alias: impl Into<Option<&'a str>>) -> Self {
        self.query = self
            .query
            .add_from(entity::From::new(table_def(table, alias.into())));
        self
    }

    /// Conditions are ANDed into the ON clause
    pub fn add_join<'a>(
        self,
        table: &str,
        alias: impl Into<Option<&'a str>>,
        conditions: Vec<Expression>,
    ) -> Result<Self> {
        self.join(JoinType::Plain, table_def(table, alias.into()), conditions)
    }

    pub fn add_left_join<'a>(
        self,
        table: &str,
        alias: impl Into<Option<&'a str>>,
        conditions: Vec<Expression>,
    ) -> Result<Self> {
        self.join(JoinType::Left, table_def(table, alias.into()), conditions)
    }

    pub fn add_right_join<'a>(
        self,
        table: &str,
        alias: impl Into<Option<&'a str>>,
        conditions: Vec<Expression>,
    ) -> Result<Self> {
        self.join(JoinType::Right, table_def(table, alias.into()), conditions)
    }

    fn join(
        mut self,
        join_type: JoinType,
        table: TableDefinition,
        conditions: Vec<Expression>,
    ) -> Result<Self> {
        let on = Self::conditions(conditions)?;
        self.query = self.query.add_join(Join::new(table, join_type, on));
        Ok(self)
    }

    fn conditions(mut conditions: Vec<Expression>) -> Result<Where> {
        match conditions.len() {
            0 => Ok(Where::empty()),
            1 => Where::new(conditions.remove(0)),
            _ => Where::new(and(conditions)),
        }
    }

    /// AND conditions onto the join targeting `table_or_alias`
    pub fn add_where_join(
        mut self,
        table_or_alias: &str,
        conditions: Vec<Expression>,
    ) -> Result<Self> {
        let on = Self::conditions(conditions)?;
        self.query = self.query.add_where_join(table_or_alias, on);
        Ok(self)
    }

    pub fn add_where(mut self, condition: impl Into<Expression>) -> Result<Self> {
        self.query = self.query.add_where(Where::new(condition)?);
        Ok(self)
    }

    /// `col IN (?,?,...)` binding every value
    pub fn add_where_in(mut self, col: &str, values: Vec<Value>) -> Result<Self> {
        let list = pair(values.into_iter().map(param));
        self.query = self.query.add_where(Where::new(in_(col_ref(col), list))?);
        Ok(self)
    }

    /// Group by `"table.col"`, `"col"` or `"#n"`
    pub fn add_group_by(mut self, spec: &str) -> Result<Self> {
        self.query = self.query.add_group(Group::new(position_or_ref(spec)?)?);
        Ok(self)
    }

    /// Order by `"table.col"`, `"col"` or `"#n"`
    pub fn add_order(mut self, spec: &str, direction: SortDirection) -> Result<Self> {
        self.query = self
            .query
            .add_order(Order::new(position_or_ref(spec)?, direction)?);
        Ok(self)
    }

    pub fn add_groups(mut self, specs: &[&str]) -> Result<Self> {
        for spec in specs {
            self = self.add_group_by(spec)?;
        }
        Ok(self)
    }

    pub fn add_orders(mut self, specs: &[(&str, SortDirection)]) -> Result<Self> {
        for (spec, direction) in specs {
            self = self.add_order(spec, *direction)?;
        }
        Ok(self)
    }

    pub fn set_limit(mut self, number: Option<u64>, offset: Option<u64>) -> Self {
        self.query = self.query.set_limit(Limit::new(number, offset));
        self
    }

    pub fn cols(&self) -> Vec<&Expression> {
        self.query.cols()
    }

    pub fn tables(&self) -> Vec<&TableDefinition> {
        self.query.tables()
    }

    pub fn from(&self) -> Vec<&TableDefinition> {
        self.query.from()
    }

    pub fn to_sql(&self) -> Result<String> {
        self.query.to_sql()
    }

    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        self.query.build()
    }

    pub fn bound_params(&self) -> Result<Vec<Value>> {
        self.build().map(|(_, params)| params)
    }
}

impl From<QueryBuilder> for Query {
    fn from(builder: QueryBuilder) -> Self {
        builder.query
    }
}

//! Render-time symbol table
//!
//! A [`Domain`] is built at the start of every query render and threaded by
//! mutable reference through every node. It is made of two parts:
//!
//! - a [`Scope`]: the tables and columns visible to the query being rendered,
//!   plus the FROM-only subset used for auto-resolution. A scope never flows
//!   back to the parent query.
//! - a [`State`]: an ordered key/value store for everything else, notably the
//!   bound parameters. State always flows back to the parent query.

use crate::error::{ParseError, ParseResult};
use crate::Value;

/// Key under which bind values accumulate
pub const BOUND_PARAMS: &str = "boundParams";

/// Scope keys; their contents are read through [`Domain::tables`] and
/// [`Domain::columns`]
pub const TABLES: &str = "tables";
pub const COLUMNS: &str = "columns";

static EMPTY_SLOT: Slot = Slot::Many(Vec::new());

/// A table made visible by a FROM or JOIN clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSymbol {
    pub name: String,
    pub alias: Option<String>,
}

impl TableSymbol {
    pub fn new(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
        }
    }

    /// Alias if set, else name
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Whether `reference` names this table by alias or by name
    pub fn answers_to(&self, reference: &str) -> bool {
        self.alias.as_deref() == Some(reference) || self.name == reference
    }
}

/// A column made visible by the SELECT clause
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSymbol {
    /// Bare column name, absent for computed columns
    pub name: Option<String>,
    pub alias: Option<String>,
    /// Table qualifier as written by the caller
    pub table: Option<String>,
}

impl ColumnSymbol {
    pub fn display_name(&self) -> Option<&str> {
        self.alias.as_deref().or(self.name.as_deref())
    }
}

/// Definitions visible to the query currently being rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    tables: Vec<TableSymbol>,
    columns: Vec<ColumnSymbol>,
    from: Vec<TableSymbol>,
}

impl Scope {
    pub fn tables(&self) -> &[TableSymbol] {
        &self.tables
    }

    pub fn columns(&self) -> &[ColumnSymbol] {
        &self.columns
    }

    pub fn from(&self) -> &[TableSymbol] {
        &self.from
    }

    /// First visible table answering to `reference`
    pub fn find_table(&self, reference: &str) -> Option<&TableSymbol> {
        self.tables.iter().find(|t| t.answers_to(reference))
    }
}

/// A slot of the forward state: "set" stores one value, "add" appends
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    One(Value),
    Many(Vec<Value>),
}

impl Slot {
    pub fn as_slice(&self) -> &[Value] {
        match self {
            Slot::One(v) => std::slice::from_ref(v),
            Slot::Many(vs) => vs,
        }
    }
}

/// Ordered key/value state shared between a query and its subqueries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    entries: Vec<(String, Slot)>,
}

impl State {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn set(&mut self, key: impl Into<String>, slot: Slot) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = slot,
            None => self.entries.push((key, slot)),
        }
    }

    pub fn add(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => {
                let slot = std::mem::replace(&mut self.entries[i].1, Slot::Many(Vec::new()));
                self.entries[i].1 = match slot {
                    Slot::Many(mut vs) => {
                        vs.push(value);
                        Slot::Many(vs)
                    }
                    Slot::One(prev) => Slot::Many(vec![prev, value]),
                };
            }
            None => self.entries.push((key, Slot::Many(vec![value]))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }
}

/// The per-render context passed through every render call
#[derive(Debug, Clone, Default)]
pub struct Domain {
    scope: Scope,
    state: State,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the value stored at `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.set(key, Slot::One(value.into()));
    }

    /// Append to the sequence stored at `key`, creating it if absent
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.add(key, value.into());
    }

    /// Read the state stored at `key`.
    ///
    /// [`TABLES`] and [`COLUMNS`] read as empty sequences unless set
    /// explicitly; any other missing key is `KeyNotFound`.
    pub fn get(&self, key: &str) -> ParseResult<&Slot> {
        match self.state.get(key) {
            Some(slot) => Ok(slot),
            None if key == TABLES || key == COLUMNS => Ok(&EMPTY_SLOT),
            None => Err(ParseError::key_not_found(key)),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.state.get(key).is_some()
    }

    /// The whole forward state, in insertion order
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn tables(&self) -> &[TableSymbol] {
        &self.scope.tables
    }

    pub fn columns(&self) -> &[ColumnSymbol] {
        &self.scope.columns
    }

    pub fn from(&self) -> &[TableSymbol] {
        &self.scope.from
    }

    /// Record a bind value
    pub fn bind(&mut self, value: Value) {
        self.state.add(BOUND_PARAMS, value);
    }

    /// Bind values collected so far, in encounter order
    pub fn bound_params(&self) -> &[Value] {
        self.state.get(BOUND_PARAMS).map(Slot::as_slice).unwrap_or(&[])
    }

    /// Domain for a query nested inside this one.
    ///
    /// The child sees every definition visible here, and the state collected
    /// so far.
    pub(crate) fn child(&self) -> Domain {
        Domain {
            scope: self.scope.clone(),
            state: self.state.clone(),
        }
    }

    /// Install the scope of the query about to render.
    ///
    /// `tables` becomes FROM tables, then inherited tables, then JOIN
    /// targets; `columns` becomes inherited columns, then SELECT columns.
    pub(crate) fn enter_scope(
        &mut self,
        from: Vec<TableSymbol>,
        joined: Vec<TableSymbol>,
        selected: Vec<ColumnSymbol>,
    ) {
        let inherited = std::mem::take(&mut self.scope.tables);
        let mut tables = Vec::with_capacity(from.len() + inherited.len() + joined.len());
        tables.extend(from.iter().cloned());
        tables.extend(inherited);
        tables.extend(joined);
        self.scope.tables = tables;
        self.scope.from = from;
        self.scope.columns.extend(selected);
    }

    /// Copy a finished child's state back, leaving this scope untouched
    pub(crate) fn absorb(&mut self, child: Domain) {
        for (key, slot) in child.state.entries {
            self.state.set(key, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, alias: Option<&str>) -> TableSymbol {
        TableSymbol::new(name, alias.map(str::to_string))
    }

    #[test]
    fn test_set_replaces_and_add_appends() {
        let mut domain = Domain::new();
        domain.set("mode", "strict");
        domain.set("mode", "loose");
        assert_eq!(domain.get("mode").unwrap(), &Slot::One(Value::from("loose")));

        domain.add("tags", 1);
        domain.add("tags", 2);
        assert_eq!(
            domain.get("tags").unwrap().as_slice(),
            &[Value::I32(1), Value::I32(2)]
        );
    }

    #[test]
    fn test_add_onto_scalar_promotes_to_sequence() {
        let mut domain = Domain::new();
        domain.set("k", 1);
        domain.add("k", 2);
        assert_eq!(
            domain.get("k").unwrap(),
            &Slot::Many(vec![Value::I32(1), Value::I32(2)])
        );
    }

    #[test]
    fn test_missing_key() {
        let domain = Domain::new();
        assert!(!domain.has("nope"));
        assert_eq!(
            domain.get("nope").unwrap_err(),
            ParseError::key_not_found("nope")
        );
        assert!(domain.tables().is_empty());
        assert!(domain.columns().is_empty());
        assert!(domain.bound_params().is_empty());
    }

    #[test]
    fn test_scope_keys_default_to_empty() {
        let mut domain = Domain::new();
        assert!(domain.get(TABLES).unwrap().as_slice().is_empty());
        assert!(domain.get(COLUMNS).unwrap().as_slice().is_empty());
        assert!(!domain.has(TABLES));

        domain.add(TABLES, "t1");
        assert_eq!(domain.get(TABLES).unwrap().as_slice(), &[Value::from("t1")]);
    }

    #[test]
    fn test_state_keeps_insertion_order() {
        let mut domain = Domain::new();
        domain.set("b", 1);
        domain.set("a", 2);
        domain.bind(Value::from("x"));
        let keys: Vec<&str> = domain.state().entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", BOUND_PARAMS]);
    }

    #[test]
    fn test_enter_scope_orders_tables() {
        let mut parent = Domain::new();
        parent.enter_scope(vec![table("outer", None)], vec![], vec![]);

        let mut child = parent.child();
        child.enter_scope(
            vec![table("t1", Some("a"))],
            vec![table("t2", Some("b"))],
            vec![],
        );
        let names: Vec<&str> = child.tables().iter().map(|t| t.display_name()).collect();
        assert_eq!(names, vec!["a", "outer", "b"]);
        assert_eq!(child.from().len(), 1);
    }

    #[test]
    fn test_absorb_propagates_state_not_scope() {
        let mut parent = Domain::new();
        parent.enter_scope(vec![table("t1", None)], vec![], vec![]);
        parent.bind(Value::from(1));

        let mut child = parent.child();
        child.enter_scope(vec![table("t2", None)], vec![], vec![ColumnSymbol::default()]);
        child.bind(Value::from(2));
        child.set("hint", "x");

        parent.absorb(child);
        assert_eq!(parent.bound_params(), &[Value::I32(1), Value::I32(2)]);
        assert!(parent.has("hint"));
        assert_eq!(parent.tables().len(), 1);
        assert!(parent.columns().is_empty());
    }

    #[test]
    fn test_table_symbol_lookup() {
        let t = table("users", Some("u"));
        assert_eq!(t.display_name(), "u");
        assert!(t.answers_to("u"));
        assert!(t.answers_to("users"));
        assert!(!t.answers_to("x"));
    }
}

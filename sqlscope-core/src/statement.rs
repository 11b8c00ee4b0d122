//! Ordered entity lists rendered as one clause

use crate::domain::Domain;
use crate::entity::Entity;
use crate::error::{Error, ParseResult, Result};

/// One clause of a query: the keyword followed by its entities
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<E: Entity> {
    entities: Vec<E>,
}

impl<E: Entity> Default for Statement<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
        }
    }
}

impl<E: Entity> Statement<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entity`, or replace the current one for single-entity
    /// statements such as LIMIT
    pub fn add(&mut self, entity: E) {
        if E::KIND.holds_one() {
            self.entities.clear();
        }
        self.entities.push(entity);
    }

    /// Replace all entities with a single one
    pub fn set_entity(&mut self, entity: E) {
        self.entities.clear();
        self.entities.push(entity);
    }

    pub fn set_entities(&mut self, mut entities: Vec<E>) {
        if E::KIND.holds_one() && entities.len() > 1 {
            let last = entities.len() - 1;
            entities.drain(..last);
        }
        self.entities = entities;
    }

    pub fn replace_at(&mut self, index: usize, entity: E) -> Result<()> {
        let len = self.entities.len();
        match self.entities.get_mut(index) {
            Some(slot) => {
                *slot = entity;
                Ok(())
            }
            None => Err(Error::invalid_argument(format!(
                "entity index {} out of range for a {:?} statement of {} entities",
                index,
                E::KIND,
                len
            ))),
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut [E] {
        &mut self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Render every entity and join them with the statement's separator.
    ///
    /// Entities rendering to nothing are skipped; a statement with nothing to
    /// show renders as an empty string.
    pub fn render(&self, domain: &mut Domain) -> ParseResult<String> {
        let mut parts = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            let rendered = entity.render_in_statement(domain)?;
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
        if parts.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(
            "{}{}",
            E::KIND.keyword(),
            parts.join(E::KIND.separator())
        ))
    }
}

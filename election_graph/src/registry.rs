use log::debug;
use std::collections::HashMap;

use crate::error::*;

/// Something that can be stored in an [`IdRegistry`].
pub trait Identified {
    /// The name of the entity kind, used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Receives the 0-based position of the entity in its registry.
    /// Only called on indexed registries.
    fn set_index(&mut self, _index: usize) {}
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Indexing {
    Indexed,
    Unindexed,
}

/// An ordered mapping from id to entity.
///
/// Iteration follows insertion order. Entities can also be addressed by their
/// position, which is stable for the lifetime of the registry.
#[derive(PartialEq, Debug, Clone)]
pub struct IdRegistry<T> {
    items: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T: Identified> IdRegistry<T> {
    pub fn new() -> IdRegistry<T> {
        IdRegistry {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Builds a registry from entities in declaration order.
    pub fn build<I>(items: I, indexing: Indexing) -> LoadResult<IdRegistry<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut res = IdRegistry::new();
        for mut item in items {
            if indexing == Indexing::Indexed {
                item.set_index(res.len());
            }
            res.insert(item)?;
        }
        debug!("IdRegistry::build: {} {} entities", res.len(), T::KIND);
        Ok(res)
    }

    /// Adds an entity at the end of the registry and returns its position.
    ///
    /// An entity whose id is already present is rejected and the registry is
    /// left unchanged.
    pub fn insert(&mut self, item: T) -> LoadResult<usize> {
        let id = item.id();
        if id.is_empty() {
            return Err(LoadError::MissingRequiredField {
                entity: T::KIND,
                id: None,
                attr: "id",
            });
        }
        if self.positions.contains_key(id) {
            return Err(LoadError::DuplicateId {
                entity: T::KIND,
                id: id.to_string(),
            });
        }
        let pos = self.items.len();
        self.positions.insert(id.to_string(), pos);
        self.items.push(item);
        Ok(pos)
    }
}

impl<T: Identified> Default for IdRegistry<T> {
    fn default() -> Self {
        IdRegistry::new()
    }
}

impl<T> IdRegistry<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.positions.get(id).map(|pos| &self.items[*pos])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).cloned()
    }

    pub fn at(&self, pos: usize) -> Option<&T> {
        self.items.get(pos)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        match self.positions.get(id) {
            Some(pos) => self.items.get_mut(*pos),
            None => None,
        }
    }

    pub(crate) fn at_mut(&mut self, pos: usize) -> Option<&mut T> {
        self.items.get_mut(pos)
    }
}

impl<'a, T> IntoIterator for &'a IdRegistry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

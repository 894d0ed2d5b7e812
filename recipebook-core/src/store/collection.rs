//! Ordered collection keyed by generated entry ids.
//!
//! Entities live in a map keyed by [`EntryId`]; a separate vector keeps the
//! display order. Positional access goes through that vector, so callers
//! can still address entries by index while holding a handle that survives
//! removals and reorders elsewhere in the list.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Stable handle to one entry of a store.
///
/// Handles are local to the running process. They are not sent to the
/// remote database, and a fetch that replaces the collection issues new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No entry at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No entry with id {0}")]
    UnknownEntry(EntryId),
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    order: Vec<EntryId>,
    entries: HashMap<EntryId, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append to the end and return the new entry's handle.
    pub fn push(&mut self, value: T) -> EntryId {
        let id = EntryId::new();
        self.order.push(id);
        self.entries.insert(id, value);
        id
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = T>) -> Vec<EntryId> {
        values.into_iter().map(|value| self.push(value)).collect()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.order.get(index).and_then(|id| self.entries.get(id))
    }

    pub fn get_by_id(&self, id: EntryId) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn id_at(&self, index: usize) -> Result<EntryId, StoreError> {
        self.order
            .get(index)
            .copied()
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: self.order.len(),
            })
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|entry| *entry == id)
    }

    /// Replace the value at `index`, keeping its handle.
    pub fn replace_at(&mut self, index: usize, value: T) -> Result<EntryId, StoreError> {
        let id = self.id_at(index)?;
        self.entries.insert(id, value);
        Ok(id)
    }

    pub fn replace(&mut self, id: EntryId, value: T) -> Result<(), StoreError> {
        match self.entries.get_mut(&id) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::UnknownEntry(id)),
        }
    }

    /// Remove the value at `index`; later entries shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T, StoreError> {
        let id = self.id_at(index)?;
        self.order.remove(index);
        self.entries
            .remove(&id)
            .ok_or(StoreError::UnknownEntry(id))
    }

    pub fn remove(&mut self, id: EntryId) -> Result<T, StoreError> {
        let index = self.position(id).ok_or(StoreError::UnknownEntry(id))?;
        self.remove_at(index)
    }

    /// Drop every entry and load `values` in order.
    pub fn replace_all(&mut self, values: Vec<T>) {
        self.order.clear();
        self.entries.clear();
        self.extend(values);
    }

    /// Copy of the values in display order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Copy of the values paired with their handles.
    pub fn entries(&self) -> Vec<(EntryId, T)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|value| (*id, value.clone())))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }
}

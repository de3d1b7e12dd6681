//! Tombstoning arena with stable, never-reused handles.
//!
//! Slots are kept sorted by id, so lookups are a binary search and iteration
//! follows insertion order. Removal clears the slot instead of shifting its
//! neighbours; tombstones are compacted away once they outnumber live entries.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Compaction never runs below this many tombstones.
const COMPACT_MIN_TOMBSTONES: usize = 32;

/// Opaque handle to an arena entry. Stays valid until that entry is removed.
pub struct Handle<T> {
    id: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(id: u64) -> Self {
        Handle {
            id,
            _marker: PhantomData,
        }
    }

    /// The raw id, for display and logging.
    pub fn raw(&self) -> u64 {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.id)
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    id: u64,
    value: Option<T>,
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena {
            slots: Vec::new(),
            live: 0,
        }
    }
}

impl<T> Arena<T> {
    /// Insert `value` under `id`. Ids must be strictly increasing across calls.
    pub fn insert(&mut self, id: u64, value: T) -> Handle<T> {
        debug_assert!(self.slots.last().is_none_or(|s| s.id < id));
        self.slots.push(Slot {
            id,
            value: Some(value),
        });
        self.live += 1;
        Handle::new(id)
    }

    fn position(&self, handle: Handle<T>) -> Option<usize> {
        self.slots.binary_search_by_key(&handle.id, |s| s.id).ok()
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.position(handle)
            .and_then(|i| self.slots[i].value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.position(handle)
            .and_then(|i| self.slots[i].value.as_mut())
    }

    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let i = self.position(handle)?;
        let value = self.slots[i].value.take()?;
        self.live -= 1;
        self.maybe_compact();
        Some(value)
    }

    fn maybe_compact(&mut self) {
        let tombstones = self.slots.len() - self.live;
        if tombstones >= COMPACT_MIN_TOMBSTONES && tombstones > self.live {
            self.slots.retain(|s| s.value.is_some());
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots
            .iter()
            .filter_map(|s| s.value.as_ref().map(|v| (Handle::new(s.id), v)))
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.slots.into_iter().filter_map(|s| s.value)
    }
}

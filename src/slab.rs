//! A simple index-addressed slab used as the node arena.
//!
//! Nodes refer to each other by slot index instead of by pointer, so unlinking
//! or freeing a node can never leave a dangling reference behind. Freed slots
//! are threaded onto a free list and reused by later inserts.

use std::mem;
use std::ops::{Index, IndexMut};

/// A slot in the slab: either a live value or a link in the free list.
enum Entry<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// A growable arena handing out stable `usize` indices.
pub(crate) struct Slab<T> {
    entries: Vec<Entry<T>>,
    /// Head of the free list (most recently freed slot).
    next_free: Option<usize>,
    len: usize,
}

impl<T> Slab<T> {
    /// Creates a new, empty `Slab`.
    pub(crate) fn new() -> Self {
        Slab {
            entries: Vec::new(),
            next_free: None,
            len: 0,
        }
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Stores `value`, reusing a freed slot when one is available.
    pub(crate) fn insert(&mut self, value: T) -> usize {
        self.len += 1;
        match self.next_free {
            Some(index) => {
                let next = match self.entries[index] {
                    Entry::Vacant(next) => next,
                    Entry::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                self.entries[index] = Entry::Occupied(value);
                self.next_free = next;
                index
            }
            None => {
                self.entries.push(Entry::Occupied(value));
                self.entries.len() - 1
            }
        }
    }

    /// Removes and returns the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant or out of bounds.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        let next_free = self.next_free;
        let entry = match self.entries.get_mut(index) {
            Some(entry) if matches!(entry, Entry::Occupied(_)) => entry,
            _ => panic!("invalid slab index {}", index),
        };
        match mem::replace(entry, Entry::Vacant(next_free)) {
            Entry::Occupied(value) => {
                self.next_free = Some(index);
                self.len -= 1;
                value
            }
            Entry::Vacant(_) => unreachable!(),
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        match self.entries.get(index) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.entries.get_mut(index) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Drops every value and releases the backing storage.
    pub(crate) fn clear(&mut self) {
        self.entries = Vec::new();
        self.next_free = None;
        self.len = 0;
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Slab<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("invalid slab index {}", index),
        }
    }
}

impl<T> IndexMut<usize> for Slab<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("invalid slab index {}", index),
        }
    }
}

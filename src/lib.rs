#![doc = include_str!("../README.md")]
//! The ordered map at the heart of skipdict.
//!
//! # Internals
//!
//! -   **Arena:** Every `Node` lives in a slab owned by the map and is addressed
//!     by index, so forward links are plain `Option<NodeId>` values.
//! -   **Header:** The map keeps a header array of forward links, one per
//!     possible level, acting as the key-less sentinel at the front of every
//!     chain.
//! -   **Levels:** Each node gets a random level from the map's
//!     [`LevelGenerator`] and is linked into the chains `0..level`. The map's
//!     current level is the highest chain with at least one node, and is
//!     pruned back down whenever deletions empty the top chains.
//! -   **Locate:** All operations share one descent: from the top level down
//!     to level 0, advance while the next key is strictly smaller than the
//!     target, optionally recording the last node visited on each level.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;
use std::sync::Arc;

use log::{debug, trace};

pub mod builder;
mod codec;
pub mod error;
pub mod level;
pub mod metrics;
mod node;
pub mod policy;
mod slab;

pub use crate::builder::SkipDictBuilder;
pub use crate::error::SkipDictError;
pub use crate::level::{DEFAULT_P, Geometric, LevelGenerator, MAX_LEVELS, ProcessRng};
pub use crate::policy::{KeyKind, KeyPolicy, Kinded, NoHooks, OpenKeys, OwnershipHooks, UniformKeys};

use crate::metrics::{
    NODES_ALLOCATED_TOTAL, NODES_FREED_TOTAL, OP_CLEAR, OP_DELETE, OP_GET, OP_HAS, OP_KEYS,
    OP_POP, OP_SET, TYPE_MISMATCHES_TOTAL, record_miss, record_operation,
};
use crate::node::{Link, Node, NodeId};
use crate::slab::Slab;

/// A position during a descent: the header or a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeId),
}

/// An ordered dictionary backed by a skip list.
///
/// Keys are kept sorted by their `Ord` implementation. Lookups, inserts and
/// removals take O(log n) expected time. Values are stored as `Arc<V>`: `get`
/// hands out a new shared reference rather than a borrow.
///
/// # Type Parameters
///
/// - `K`: Key type, must implement `Ord`
/// - `V`: Value type
/// - `G`: Level generator, defaults to [`Geometric`] over the process RNG
/// - `P`: Key policy, defaults to [`OpenKeys`]
/// - `H`: Ownership hooks, defaults to [`NoHooks`]
///
/// The map is a single-threaded structure: mutation requires `&mut self`, so
/// callers that share it across threads must serialize access themselves.
pub struct SkipDict<K, V, G = Geometric, P = OpenKeys, H = NoHooks>
where
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    /// Header forward links, one slot per level the generator can produce.
    head: Box<[Link]>,
    nodes: Slab<Node<K, V>>,
    /// Highest level with at least one linked node, never below 1.
    level: usize,
    len: usize,
    /// Kind of the first key, recorded only when the policy constrains keys.
    key_kind: Option<P::Kind>,
    generator: G,
    policy: P,
    hooks: H,
}

impl<K: Ord, V> SkipDict<K, V> {
    /// Creates a new, empty `SkipDict` with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(Geometric::default(), OpenKeys, NoHooks)
    }

    /// Returns a builder for a map with custom levels, key policy or hooks.
    pub fn builder() -> SkipDictBuilder<K, V> {
        SkipDictBuilder::default()
    }
}

impl<K: Ord, V> Default for SkipDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V, G: LevelGenerator> SkipDict<K, V, G> {
    /// Creates a new, empty `SkipDict` drawing node levels from `generator`.
    pub fn with_generator(generator: G) -> Self {
        Self::from_parts(generator, OpenKeys, NoHooks)
    }
}

impl<K, V, G, P, H> SkipDict<K, V, G, P, H>
where
    G: LevelGenerator,
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    pub(crate) fn from_parts(generator: G, policy: P, hooks: H) -> Self {
        let width = generator.max_level().clamp(1, MAX_LEVELS);
        SkipDict {
            head: vec![None; width].into_boxed_slice(),
            nodes: Slab::new(),
            level: 1,
            len: 0,
            key_kind: None,
            generator,
            policy,
            hooks,
        }
    }
}

impl<K, V, G, P, H> SkipDict<K, V, G, P, H>
where
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    /// Returns the number of keys in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the highest level currently in use (1 for an empty map).
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the number of header slots, i.e. the tallest a node can be.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.head.len()
    }

    /// Returns the key policy installed in this map.
    pub fn key_policy(&self) -> &P {
        &self.policy
    }

    /// Returns the ownership hooks installed in this map.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Returns the kind recorded for the first key, if the policy recorded one.
    pub fn key_kind(&self) -> Option<&P::Kind> {
        self.key_kind.as_ref()
    }

    /// Iterates over the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            next: self.head[0],
            remaining: self.len,
        }
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &Arc<V>)> {
        self.head[0].map(|id| {
            let node = &self.nodes[id.0];
            (&node.key, &node.value)
        })
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &Arc<V>)> {
        let mut current = Cursor::Head;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                current = Cursor::Node(next);
            }
        }
        match current {
            Cursor::Head => None,
            Cursor::Node(id) => {
                let node = &self.nodes[id.0];
                Some((&node.key, &node.value))
            }
        }
    }

    /// Returns a snapshot of every value, in ascending key order.
    pub fn values(&self) -> Vec<Arc<V>> {
        self.iter().map(|(_, value)| Arc::clone(value)).collect()
    }

    /// Removes every entry, releasing all keys and values.
    pub fn clear(&mut self) {
        record_operation(OP_CLEAR);
        let released = self.release_all();
        self.head.fill(None);
        self.level = 1;
        self.len = 0;
        self.key_kind = None;
        debug!("skipdict cleared, {} nodes released", released);
    }

    #[inline]
    fn next_of(&self, at: Cursor, level: usize) -> Link {
        match at {
            Cursor::Head => self.head[level],
            Cursor::Node(id) => self.nodes[id.0].next(level),
        }
    }

    #[inline]
    fn set_next_of(&mut self, at: Cursor, level: usize, link: Link) {
        match at {
            Cursor::Head => self.head[level] = link,
            Cursor::Node(id) => self.nodes[id.0].set_next(level, link),
        }
    }

    /// Frees every node reachable from the header, front to back.
    fn release_all(&mut self) -> usize {
        let mut released = 0;
        let mut link = self.head[0];
        while let Some(id) = link {
            let node = self.nodes.remove(id.0);
            self.hooks.release_key(&node.key);
            self.hooks.release_value(&node.value);
            link = node.next(0);
            released += 1;
        }
        debug_assert_eq!(self.nodes.len(), 0);
        self.nodes.clear();
        if released > 0 {
            ::metrics::counter!(NODES_FREED_TOTAL).increment(released as u64);
        }
        released
    }
}

impl<K, V, G, P, H> SkipDict<K, V, G, P, H>
where
    K: Ord,
    G: LevelGenerator,
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    /// Returns a new reference to the value stored under `key`.
    ///
    /// Fails with [`SkipDictError::NotFound`] if the key is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<Arc<V>, SkipDictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        record_operation(OP_GET);
        match self.find(key) {
            Some(id) => Ok(Arc::clone(&self.nodes[id.0].value)),
            None => {
                record_miss(OP_GET);
                Err(SkipDictError::NotFound)
            }
        }
    }

    /// Returns `true` if the map contains `key`.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        record_operation(OP_HAS);
        self.find(key).is_some()
    }

    /// Alias of [`SkipDict::has`].
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.has(key)
    }

    /// Inserts `value` under `key`, or replaces the value if `key` is present.
    ///
    /// Returns the replaced value, or `None` if a new entry was created. Fails
    /// with [`SkipDictError::TypeMismatch`] if the key policy rejects the key;
    /// the map is left untouched in that case.
    pub fn set(
        &mut self,
        key: K,
        value: impl Into<Arc<V>>,
    ) -> Result<Option<Arc<V>>, SkipDictError> {
        record_operation(OP_SET);
        let first_kind = self.admit(&key)?;
        let value = value.into();
        // Levels a custom generator reports beyond the header are clamped.
        let new_level = self.generator.next_level().clamp(1, self.head.len());

        let mut update = [Cursor::Head; MAX_LEVELS];
        let predecessor = self.find_predecessors(&key, &mut update);

        if let Some(id) = self.candidate(predecessor, &key) {
            self.hooks.acquire_value(&value);
            let old = std::mem::replace(&mut self.nodes[id.0].value, value);
            self.hooks.release_value(&old);
            trace!("skipdict value replaced in place");
            return Ok(Some(old));
        }

        // Slots above the current level were never written by the descent and
        // still hold the header, which is the predecessor on every new level.
        if new_level > self.level {
            debug!("skipdict level raised from {} to {}", self.level, new_level);
            self.level = new_level;
        }

        self.hooks.acquire_key(&key);
        self.hooks.acquire_value(&value);
        let id = NodeId(self.nodes.insert(Node::new(key, value, new_level)));
        for (level, &pred) in update.iter().enumerate().take(new_level) {
            let next = self.next_of(pred, level);
            self.nodes[id.0].set_next(level, next);
            self.set_next_of(pred, level, Some(id));
        }
        self.len += 1;
        if first_kind.is_some() {
            self.key_kind = first_kind;
        }
        ::metrics::counter!(NODES_ALLOCATED_TOTAL).increment(1);
        Ok(None)
    }

    /// Removes `key` from the map.
    ///
    /// Fails with [`SkipDictError::NotFound`] if the key is absent.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<(), SkipDictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        record_operation(OP_DELETE);
        self.unlink(key, OP_DELETE).map(|_| ())
    }

    /// Removes `key` from the map and returns its value.
    ///
    /// Fails with [`SkipDictError::NotFound`] if the key is absent.
    pub fn pop<Q>(&mut self, key: &Q) -> Result<Arc<V>, SkipDictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        record_operation(OP_POP);
        self.unlink(key, OP_POP).map(|(_, value)| value)
    }

    /// Returns the keys in ascending order.
    ///
    /// This is a snapshot: later changes to the map are not reflected in it.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        record_operation(OP_KEYS);
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Inserts every pair from `iter`, stopping at the first rejected key.
    ///
    /// Pairs inserted before the failure stay in the map.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), SkipDictError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Runs the key policy, returning the kind to record if the map is empty.
    fn admit(&self, key: &K) -> Result<Option<P::Kind>, SkipDictError> {
        let Some(kind) = self.policy.kind_of(key) else {
            return Ok(None);
        };
        match &self.key_kind {
            None => Ok(Some(kind)),
            Some(established) if self.policy.admits(established, &kind) => Ok(None),
            Some(established) => {
                ::metrics::counter!(TYPE_MISMATCHES_TOTAL).increment(1);
                Err(SkipDictError::TypeMismatch {
                    expected: format!("{:?}", established),
                    found: format!("{:?}", kind),
                })
            }
        }
    }

    /// Descends from the top level to level 0 and returns the last position
    /// whose key is strictly less than `key`.
    ///
    /// The position reached on each level is written to `preds[level]` when
    /// `preds` is long enough; pass an empty slice to skip recording.
    fn find_predecessors<Q>(&self, key: &Q, preds: &mut [Cursor]) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = Cursor::Head;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                let next_key: &Q = self.nodes[next.0].key.borrow();
                if next_key < key {
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }
            if let Some(slot) = preds.get_mut(level) {
                *slot = current;
            }
        }
        current
    }

    /// Returns the node after `predecessor` on level 0 if it holds `key`.
    fn candidate<Q>(&self, predecessor: Cursor, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.next_of(predecessor, 0).filter(|id| {
            let candidate: &Q = self.nodes[id.0].key.borrow();
            candidate == key
        })
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let predecessor = self.find_predecessors(key, &mut []);
        self.candidate(predecessor, key)
    }

    fn unlink<Q>(&mut self, key: &Q, op: &'static str) -> Result<(K, Arc<V>), SkipDictError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut update = [Cursor::Head; MAX_LEVELS];
        let predecessor = self.find_predecessors(key, &mut update);
        let Some(id) = self.candidate(predecessor, key) else {
            record_miss(op);
            return Err(SkipDictError::NotFound);
        };

        // A node is never linked above its own level.
        let height = self.nodes[id.0].level().min(self.level);
        for (level, &pred) in update.iter().enumerate().take(height) {
            if self.next_of(pred, level) != Some(id) {
                break;
            }
            let next = self.nodes[id.0].next(level);
            self.set_next_of(pred, level, next);
        }

        let node = self.nodes.remove(id.0);
        self.hooks.release_key(&node.key);
        self.hooks.release_value(&node.value);
        ::metrics::counter!(NODES_FREED_TOTAL).increment(1);

        let previous_level = self.level;
        while self.level > 1 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        if self.level != previous_level {
            debug!("skipdict level lowered from {} to {}", previous_level, self.level);
        }

        self.len -= 1;
        if self.len == 0 {
            self.key_kind = None;
        }
        Ok((node.key, node.value))
    }
}

impl<K, V, G, P, H> Drop for SkipDict<K, V, G, P, H>
where
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<K, V, G, P, H> fmt::Debug for SkipDict<K, V, G, P, H>
where
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<SkipDict: {} items/{} levels>", self.len, self.level)
    }
}

impl<K, V, G, P, H, Q> Index<&Q> for SkipDict<K, V, G, P, H>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
    G: LevelGenerator,
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    type Output = V;

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        match self.find(key) {
            Some(id) => &self.nodes[id.0].value,
            None => panic!("key not found in SkipDict"),
        }
    }
}

impl<K, V, G, H> Extend<(K, V)> for SkipDict<K, V, G, OpenKeys, H>
where
    K: Ord,
    G: LevelGenerator,
    H: OwnershipHooks<K, V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            // `OpenKeys` never rejects a key, so this cannot fail.
            let _ = self.set(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = SkipDict::new();
        dict.extend(iter);
        dict
    }
}

impl<'a, K, V, G, P, H> IntoIterator for &'a SkipDict<K, V, G, P, H>
where
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    type Item = (&'a K, &'a Arc<V>);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// An iterator over the entries of a [`SkipDict`], in ascending key order.
pub struct Iter<'a, K, V> {
    nodes: &'a Slab<Node<K, V>>,
    next: Link,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = &self.nodes[id.0];
        self.next = node.next(0);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

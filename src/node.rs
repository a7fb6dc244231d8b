//! Skip list nodes and the links between them.

use std::sync::Arc;

/// Index of a node inside the map's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// A forward reference at one level; `None` terminates the chain.
pub(crate) type Link = Option<NodeId>;

/// A single entry of the map.
///
/// The number of forward links is the node's level. It is fixed when the node
/// is allocated: a node of level `L` is linked into the chains `0..L`.
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: Arc<V>,
    forward: Box<[Link]>,
}

impl<K, V> Node<K, V> {
    /// Creates an unlinked node with `level` empty forward slots.
    pub(crate) fn new(key: K, value: Arc<V>, level: usize) -> Self {
        debug_assert!(level >= 1, "a node must be linked at level 0");
        Node {
            key,
            value,
            forward: vec![None; level].into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub(crate) fn next(&self, level: usize) -> Link {
        self.forward[level]
    }

    #[inline]
    pub(crate) fn set_next(&mut self, level: usize, link: Link) {
        self.forward[level] = link;
    }
}

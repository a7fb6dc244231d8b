//! Collaborator traits consumed by `SkipDict`.
//!
//! Key ordering comes from `Ord` on the key type. The two remaining
//! collaborators are pluggable:
//!
//! - [`KeyPolicy`] decides whether a key may join a map, given the kind of the
//!   first key the map received. The default, [`OpenKeys`], admits anything.
//!   [`UniformKeys`] restricts a map to one kind of key (or a declared
//!   sub-kind of it), which is useful when keys are a dynamically typed value
//!   whose variants do not order meaningfully against each other.
//! - [`OwnershipHooks`] is notified whenever the map takes or gives up a
//!   key or value handle. The map itself manages ownership (keys by value,
//!   values as `Arc<V>`); hooks exist so that an embedding layer can mirror
//!   those transitions, e.g. to maintain foreign reference counts.

use std::fmt;

/// Decides which keys a map accepts.
pub trait KeyPolicy<K> {
    /// The kind recorded for the first key of a non-empty map.
    type Kind: fmt::Debug;

    /// Returns the kind of `key`, or `None` if this policy places no
    /// constraint on it.
    fn kind_of(&self, key: &K) -> Option<Self::Kind>;

    /// Returns whether a key of kind `candidate` may join a map whose first
    /// key had kind `established`.
    fn admits(&self, established: &Self::Kind, candidate: &Self::Kind) -> bool;
}

/// The default policy: every key is accepted and no kind is recorded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenKeys;

impl<K> KeyPolicy<K> for OpenKeys {
    type Kind = ();

    #[inline]
    fn kind_of(&self, _key: &K) -> Option<()> {
        None
    }

    #[inline]
    fn admits(&self, _established: &(), _candidate: &()) -> bool {
        true
    }
}

/// A key kind that may declare itself a refinement of another kind.
pub trait KeyKind: fmt::Debug + PartialEq {
    /// Returns `true` if a key of this kind may stand in for keys of `base`.
    ///
    /// Every kind derives from itself; override this to declare sub-kinds.
    fn derives_from(&self, base: &Self) -> bool {
        self == base
    }
}

/// Keys that can report their own kind.
pub trait Kinded {
    type Kind: KeyKind;

    fn kind(&self) -> Self::Kind;
}

/// Restricts a map to keys of a single kind, or sub-kinds of it.
///
/// The kind of the first key inserted into an empty map becomes the
/// established kind; it is forgotten again once the map is emptied.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformKeys;

impl<K: Kinded> KeyPolicy<K> for UniformKeys {
    type Kind = K::Kind;

    fn kind_of(&self, key: &K) -> Option<K::Kind> {
        Some(key.kind())
    }

    fn admits(&self, established: &K::Kind, candidate: &K::Kind) -> bool {
        candidate.derives_from(established)
    }
}

/// Notified whenever the map acquires or releases a key or value handle.
///
/// Every acquire is eventually paired with exactly one release: on removal,
/// on value replacement, on `clear`, or when the map is dropped.
pub trait OwnershipHooks<K, V> {
    fn acquire_key(&mut self, _key: &K) {}

    fn release_key(&mut self, _key: &K) {}

    fn acquire_value(&mut self, _value: &V) {}

    fn release_value(&mut self, _value: &V) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<K, V> OwnershipHooks<K, V> for NoHooks {}

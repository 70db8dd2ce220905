//! HashIndex: key -> node slot mapping over `hashbrown::HashTable`.
//!
//! The table stores only slot keys; keys and cached hashes live in the
//! `OrderList` arena, which every probing method takes by reference.
//! Growth rehashes from the cached hash, so `K: Hash` runs once per key at
//! insertion and never during a resize.

use crate::order_list::OrderList;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use slotmap::DefaultKey;

#[derive(Debug)]
pub(crate) struct HashIndex<S> {
    hasher: S,
    table: HashTable<DefaultKey>,
    reentrancy: DebugReentrancy,
}

impl<S> HashIndex<S> {
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            table: HashTable::with_capacity(capacity),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
    }

    /// Removes the index entry for `slot`. Matches on slot identity, so no
    /// user code runs.
    pub(crate) fn erase(&mut self, hash: u64, slot: DefaultKey) -> bool {
        match self.table.find_entry(hash, |&k| k == slot) {
            Ok(entry) => {
                let _ = entry.remove();
                true
            }
            Err(_) => false,
        }
    }

    /// Records `slot` under `hash`. The caller has already checked that the
    /// key is absent and appended the node to `nodes`.
    pub(crate) fn insert_unique<K, V>(&mut self, nodes: &OrderList<K, V>, hash: u64, slot: DefaultKey) {
        self.table.insert_unique(hash, slot, |&k| {
            nodes.get(k).map(|n| n.hash).unwrap_or(0)
        });
    }

    pub(crate) fn reserve<K, V>(&mut self, nodes: &OrderList<K, V>, additional: usize) {
        self.table
            .reserve(additional, |&k| nodes.get(k).map(|n| n.hash).unwrap_or(0));
    }
}

impl<S: BuildHasher> HashIndex<S> {
    pub(crate) fn hash_of<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        let _g = self.reentrancy.enter();
        self.hasher.hash_one(q)
    }

    /// Slot of the node whose key equals `q`, probing with a precomputed hash.
    pub(crate) fn lookup_hashed<K, V, Q>(
        &self,
        nodes: &OrderList<K, V>,
        hash: u64,
        q: &Q,
    ) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let _g = self.reentrancy.enter();
        self.table
            .find(hash, |&k| {
                nodes
                    .get(k)
                    .map(|n| n.key.borrow() == q)
                    .unwrap_or(false)
            })
            .copied()
    }

    pub(crate) fn lookup<K, V, Q>(&self, nodes: &OrderList<K, V>, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_of(q);
        self.lookup_hashed(nodes, hash, q)
    }

    pub(crate) fn contains<K, V, Q>(&self, nodes: &OrderList<K, V>, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.lookup(nodes, q).is_some()
    }
}

//! LinkedHashMap: hash index and order list kept in lockstep.
//!
//! Every public mutation goes through this type, which consults the index
//! first and then updates the list. Removal always goes through `retire`,
//! which detaches a slot from the index and unlinks it from the list before
//! handing back the owned pair, so the two structures never disagree once a
//! method returns.

use crate::cursor::{Cursor, CursorMut, Position};
use crate::error::MapError;
use crate::hash_index::HashIndex;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::node::{Link, Node};
use crate::order_list::OrderList;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use slotmap::DefaultKey;
use std::collections::hash_map::RandomState;

/// A hash map that iterates in insertion order.
///
/// Re-inserting an existing key leaves both its value and its position
/// alone; removing a key and inserting it again moves it to the end.
///
/// ```
/// use linked_hashmap::LinkedHashMap;
///
/// let mut m = LinkedHashMap::new();
/// for k in 0..5 {
///     m.insert(k, k * 10);
/// }
/// m.erase(m.find(&2));
/// let keys: Vec<_> = m.keys().copied().collect();
/// assert_eq!(keys, [0, 1, 3, 4]);
/// ```
///
/// Default-insert, strict lookup and erase by position:
///
/// ```
/// use linked_hashmap::{LinkedHashMap, MapError};
///
/// let mut m = LinkedHashMap::new();
/// m.insert("b", 2);
/// m.insert("a", 1);
/// *m.get_or_insert_default("c") += 3;
///
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["b", "a", "c"]);
/// assert_eq!(m.at("zzz"), Err(MapError::KeyNotFound));
///
/// let pos = m.find("a");
/// m.erase(pos);
/// assert_eq!(m.len(), 2);
/// ```
pub struct LinkedHashMap<K, V, S = RandomState> {
    pub(crate) index: HashIndex<S>,
    pub(crate) list: OrderList<K, V>,
}

impl<K, V> LinkedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S: Default> Default for LinkedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    /// Creates an empty map that hashes keys with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            index: HashIndex::with_capacity_and_hasher(capacity, hasher),
            list: OrderList::with_capacity(capacity),
        }
    }

    pub fn hasher(&self) -> &S {
        self.index.hasher()
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(
            self.index.len(),
            self.list.len(),
            "hash index and order list disagree on entry count"
        );
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries the map can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.index.capacity().min(self.list.capacity())
    }

    pub fn reserve(&mut self, additional: usize) {
        self.list.reserve(additional);
        self.index.reserve(&self.list, additional);
    }

    /// Drops every entry. The map stays usable; positions taken before the
    /// call no longer resolve.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.reset();
    }

    /// Position of the oldest entry, or `end()` when empty.
    pub fn begin(&self) -> Position {
        Position(self.list.first())
    }

    /// The tail sentinel position, one past the newest entry.
    pub fn end(&self) -> Position {
        Position::END
    }

    /// The head sentinel position, one before `begin()`.
    pub fn before_begin(&self) -> Position {
        Position::BEFORE_BEGIN
    }

    pub fn front(&self) -> Option<(&K, &V)> {
        self.entry_at(self.begin())
    }

    pub fn back(&self) -> Option<(&K, &V)> {
        self.entry_at(Position(self.list.last()))
    }

    /// Removes the entry at `pos` and returns it.
    ///
    /// `pos` must come from this map. Sentinel positions and positions whose
    /// entry is already gone return `None` and leave the map untouched.
    pub fn erase(&mut self, pos: Position) -> Option<(K, V)> {
        let slot = pos.0.slot()?;
        self.retire(slot)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: self.list.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.list)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    pub fn cursor(&self, pos: Position) -> Cursor<'_, K, V, S> {
        Cursor { map: self, pos }
    }

    pub fn cursor_front(&self) -> Cursor<'_, K, V, S> {
        self.cursor(self.begin())
    }

    pub fn cursor_mut(&mut self, pos: Position) -> CursorMut<'_, K, V, S> {
        CursorMut { map: self, pos }
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, S> {
        let pos = self.begin();
        self.cursor_mut(pos)
    }

    // Detach from the index, then unlink and release the node.
    pub(crate) fn retire(&mut self, slot: DefaultKey) -> Option<(K, V)> {
        let hash = self.list.get(slot)?.hash;
        let detached = self.index.erase(hash, slot);
        debug_assert!(detached, "live node missing from hash index");
        self.list.unlink(slot).map(Node::into_pair)
    }

    pub(crate) fn step_next(&self, pos: Position) -> Result<Position, MapError> {
        self.list
            .after(pos.0)
            .map(Position)
            .ok_or(MapError::InvalidIteratorOperation)
    }

    pub(crate) fn step_prev(&self, pos: Position) -> Result<Position, MapError> {
        match self.list.before(pos.0) {
            Some(Link::Head) | None => Err(MapError::InvalidIteratorOperation),
            Some(link) => Ok(Position(link)),
        }
    }

    pub(crate) fn entry_at(&self, pos: Position) -> Option<(&K, &V)> {
        let node = self.list.get(pos.0.slot()?)?;
        Some((&node.key, &node.value))
    }

    pub(crate) fn entry_at_mut(&mut self, pos: Position) -> Option<(&K, &mut V)> {
        let node = self.list.get_mut(pos.0.slot()?)?;
        Some((&node.key, &mut node.value))
    }

    fn append_hashed(&mut self, key: K, value: V, hash: u64) -> DefaultKey {
        let slot = self.list.append(key, value, hash);
        self.index.insert_unique(&self.list, hash, slot);
        slot
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Inserts `key -> value` at the end of the order.
    ///
    /// If `key` is already present nothing changes: `value` is dropped and
    /// the existing entry's position is returned with `false`.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let hash = self.index.hash_of(&key);
        if let Some(slot) = self.index.lookup_hashed(&self.list, hash, &key) {
            return (Position::entry(slot), false);
        }
        (Position::entry(self.append_hashed(key, value, hash)), true)
    }

    /// Value for `key`, inserting `default()` at the end first if absent.
    /// `default` only runs when an entry is created.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.index.hash_of(&key);
        let slot = match self.index.lookup_hashed(&self.list, hash, &key) {
            Some(slot) => slot,
            None => self.append_hashed(key, default(), hash),
        };
        &mut self
            .list
            .get_mut(slot)
            .expect("slot must be live right after lookup or insert")
            .value
    }

    /// Mutable indexing: value for `key`, inserting `V::default()` if absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Strict lookup. Fails with `KeyNotFound` instead of inserting.
    pub fn at<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(MapError::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(MapError::KeyNotFound)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.index.lookup(&self.list, q)?;
        self.entry_at(Position::entry(slot))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.index.lookup(&self.list, q)?;
        self.list.get_mut(slot).map(|n| &mut n.value)
    }

    /// Position of `q`'s entry, or `end()` if absent.
    pub fn find<Q>(&self, q: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index
            .lookup(&self.list, q)
            .map_or(Position::END, Position::entry)
    }

    /// 1 if `q` is present, otherwise 0.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.contains_key(q))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains(&self.list, q)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.index.lookup(&self.list, q)?;
        self.retire(slot)
    }

    /// Walks the list and the index and panics on any disagreement.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut prev = Link::Head;
        let mut cur = self.list.first();
        let mut walked = 0;
        while let Link::Node(slot) = cur {
            let node = self.list.get(slot).expect("list links to a live slot");
            assert_eq!(node.before, prev, "before/after are not inverses");
            assert_eq!(
                self.index.lookup(&self.list, &node.key),
                Some(slot),
                "index does not resolve a listed key to its node"
            );
            walked += 1;
            prev = cur;
            cur = node.after;
        }
        assert_eq!(cur, Link::Tail);
        assert_eq!(self.list.last(), prev);
        assert_eq!(walked, self.list.len());
        assert_eq!(walked, self.index.len());
    }
}

impl<K, Q, V, S> Index<&Q> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Read-only indexing. Panics with the `KeyNotFound` message when absent;
    /// use `at` or `get` to handle that case.
    fn index(&self, key: &Q) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, S> Clone for LinkedHashMap<K, V, S>
where
    K: Clone + Eq + Hash,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Deep copy in source order. The copy shares no nodes with `self`, so
    /// positions taken from one map do not address the other.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity_and_hasher(self.len(), self.hasher().clone());
        // Same hasher, so the cached hashes stay valid.
        for node in self.list.iter() {
            copy.append_hashed(node.key.clone(), node.value.clone(), node.hash);
        }
        copy
    }

    /// Replaces the contents with a copy of `source`, keeping this map's
    /// hasher and allocations.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.reserve(source.len());
        for node in source.list.iter() {
            let hash = self.index.hash_of(&node.key);
            self.append_hashed(node.key.clone(), node.value.clone(), hash);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LinkedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Order-sensitive: equal maps hold equal pairs in the same order.
impl<K, V, S> PartialEq for LinkedHashMap<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for LinkedHashMap<K, V, S> {}

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Inserts each pair in turn; for repeated keys the first one wins.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter { list: self.list }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

//! OrderList: node arena plus the intrusive insertion-order list.
//!
//! Nodes live in a generational `SlotMap`; the list threads through them via
//! `before`/`after` links. The two sentinels are not arena slots: the head's
//! `after` and the tail's `before` are plain fields here, so an empty list is
//! `head.after == Tail` and `tail.before == Head`.
//!
//! The list never searches. Callers obtain slots from the hash index.

use crate::node::{Link, Node};
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
pub(crate) struct OrderList<K, V> {
    nodes: SlotMap<DefaultKey, Node<K, V>>,
    head_after: Link,
    tail_before: Link,
}

impl<K, V> OrderList<K, V> {
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            head_after: Link::Tail,
            tail_before: Link::Head,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// First live entry, or `Tail` when empty.
    #[inline]
    pub(crate) fn first(&self) -> Link {
        self.head_after
    }

    /// Last live entry, or `Head` when empty.
    #[inline]
    pub(crate) fn last(&self) -> Link {
        self.tail_before
    }

    #[inline]
    pub(crate) fn get(&self, slot: DefaultKey) -> Option<&Node<K, V>> {
        self.nodes.get(slot)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, slot: DefaultKey) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(slot)
    }

    /// Successor of `link`. `None` past the tail or for a stale slot.
    #[inline]
    pub(crate) fn after(&self, link: Link) -> Option<Link> {
        match link {
            Link::Head => Some(self.head_after),
            Link::Node(k) => self.nodes.get(k).map(|n| n.after),
            Link::Tail => None,
        }
    }

    /// Predecessor of `link`. `None` before the head or for a stale slot.
    #[inline]
    pub(crate) fn before(&self, link: Link) -> Option<Link> {
        match link {
            Link::Head => None,
            Link::Node(k) => self.nodes.get(k).map(|n| n.before),
            Link::Tail => Some(self.tail_before),
        }
    }

    /// Links a new node immediately before the tail sentinel.
    pub(crate) fn append(&mut self, key: K, value: V, hash: u64) -> DefaultKey {
        let before = self.tail_before;
        let slot = self.nodes.insert(Node {
            key,
            value,
            hash,
            before,
            after: Link::Tail,
        });
        self.set_after(before, Link::Node(slot));
        self.tail_before = Link::Node(slot);
        slot
    }

    /// Splices `slot` out of the list and releases it from the arena.
    /// Neighbours are rewired; no other node is touched.
    pub(crate) fn unlink(&mut self, slot: DefaultKey) -> Option<Node<K, V>> {
        let node = self.nodes.remove(slot)?;
        self.set_after(node.before, node.after);
        self.set_before(node.after, node.before);
        Some(node)
    }

    /// Drops every node and re-initialises the sentinels.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.head_after = Link::Tail;
        self.tail_before = Link::Head;
    }

    /// Shared walk over live nodes in list order.
    pub(crate) fn iter(&self) -> Nodes<'_, K, V> {
        Nodes {
            list: self,
            front: self.head_after,
            back: self.tail_before,
            remaining: self.nodes.len(),
        }
    }

    /// Mutable access to every node, keyed by slot, in arena order.
    pub(crate) fn nodes_mut(&mut self) -> slotmap::basic::IterMut<'_, DefaultKey, Node<K, V>> {
        self.nodes.iter_mut()
    }

    fn set_after(&mut self, link: Link, to: Link) {
        match link {
            Link::Head => self.head_after = to,
            Link::Node(k) => {
                if let Some(n) = self.nodes.get_mut(k) {
                    n.after = to;
                } else {
                    debug_assert!(false, "order list links to a released slot");
                }
            }
            Link::Tail => debug_assert!(false, "tail sentinel has no successor"),
        }
    }

    fn set_before(&mut self, link: Link, to: Link) {
        match link {
            Link::Head => debug_assert!(false, "head sentinel has no predecessor"),
            Link::Node(k) => {
                if let Some(n) = self.nodes.get_mut(k) {
                    n.before = to;
                } else {
                    debug_assert!(false, "order list links to a released slot");
                }
            }
            Link::Tail => self.tail_before = to,
        }
    }
}

/// Double-ended walk over the live nodes of an `OrderList`.
pub(crate) struct Nodes<'a, K, V> {
    list: &'a OrderList<K, V>,
    front: Link,
    back: Link,
    remaining: usize,
}

impl<K, V> Clone for Nodes<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Nodes<'a, K, V> {
    type Item = &'a Node<K, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.get(self.front.slot()?)?;
        self.front = node.after;
        self.remaining -= 1;
        Some(node)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Nodes<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.get(self.back.slot()?)?;
        self.back = node.before;
        self.remaining -= 1;
        Some(node)
    }
}

impl<K, V> ExactSizeIterator for Nodes<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk<K: Clone, V>(list: &OrderList<K, V>) -> Vec<K> {
        let mut out = Vec::new();
        let mut cur = list.first();
        while let Link::Node(k) = cur {
            let n = list.get(k).unwrap();
            out.push(n.key.clone());
            cur = n.after;
        }
        assert_eq!(cur, Link::Tail);
        out
    }

    fn walk_back<K: Clone, V>(list: &OrderList<K, V>) -> Vec<K> {
        let mut out = Vec::new();
        let mut cur = list.last();
        while let Link::Node(k) = cur {
            let n = list.get(k).unwrap();
            out.push(n.key.clone());
            cur = n.before;
        }
        assert_eq!(cur, Link::Head);
        out
    }

    /// Invariant: an empty list has the sentinels pointing at each other.
    #[test]
    fn empty_list_sentinels_meet() {
        let list: OrderList<u32, ()> = OrderList::new();
        assert_eq!(list.first(), Link::Tail);
        assert_eq!(list.last(), Link::Head);
        assert_eq!(list.after(Link::Head), Some(Link::Tail));
        assert_eq!(list.before(Link::Tail), Some(Link::Head));
        assert_eq!(list.after(Link::Tail), None);
        assert_eq!(list.before(Link::Head), None);
    }

    /// Invariant: append keeps insertion order and `before`/`after` are inverses.
    #[test]
    fn append_preserves_order_both_directions() {
        let mut list = OrderList::new();
        for i in 0..5u32 {
            list.append(i, i * 10, 0);
        }
        assert_eq!(walk(&list), vec![0, 1, 2, 3, 4]);
        assert_eq!(walk_back(&list), vec![4, 3, 2, 1, 0]);
        assert_eq!(list.len(), 5);
    }

    /// Invariant: unlinking a middle, first, and last node rewires only neighbours.
    #[test]
    fn unlink_middle_first_last() {
        let mut list = OrderList::new();
        let slots: Vec<_> = (0..5u32).map(|i| list.append(i, (), 0)).collect();

        let n = list.unlink(slots[2]).unwrap();
        assert_eq!(n.key, 2);
        assert_eq!(walk(&list), vec![0, 1, 3, 4]);

        list.unlink(slots[0]).unwrap();
        list.unlink(slots[4]).unwrap();
        assert_eq!(walk(&list), vec![1, 3]);
        assert_eq!(walk_back(&list), vec![3, 1]);
        assert_eq!(list.before(Link::Node(slots[1])), Some(Link::Head));
        assert_eq!(list.after(Link::Node(slots[3])), Some(Link::Tail));
    }

    /// Invariant: a released slot cannot be unlinked twice and does not resolve.
    #[test]
    fn unlink_stale_slot_is_noop() {
        let mut list = OrderList::new();
        let a = list.append("a", 1, 0);
        list.append("b", 2, 0);
        assert!(list.unlink(a).is_some());
        assert!(list.unlink(a).is_none());
        assert!(list.after(Link::Node(a)).is_none());
        assert_eq!(walk(&list), vec!["b"]);
    }

    /// Invariant: the node walk meets in the middle when driven from both ends.
    #[test]
    fn node_walk_is_double_ended() {
        let mut list = OrderList::new();
        for i in 0..4u32 {
            list.append(i, (), 0);
        }
        let mut it = list.iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next().map(|n| n.key), Some(0));
        assert_eq!(it.next_back().map(|n| n.key), Some(3));
        assert_eq!(it.next().map(|n| n.key), Some(1));
        assert_eq!(it.next_back().map(|n| n.key), Some(2));
        assert!(it.next().is_none());
        assert!(it.next_back().is_none());
    }

    /// Invariant: reset empties the arena and the list is usable afterwards.
    #[test]
    fn reset_then_reuse() {
        let mut list = OrderList::new();
        let old = list.append(1u8, (), 0);
        list.append(2u8, (), 0);
        list.reset();
        assert_eq!(list.len(), 0);
        assert_eq!(list.first(), Link::Tail);
        assert!(list.get(old).is_none());

        list.append(3u8, (), 0);
        assert_eq!(walk(&list), vec![3]);
    }
}

//! Node store types: one owned key/value pair plus its order links.

use slotmap::DefaultKey;

/// A position in the order list.
///
/// `Head` and `Tail` are the two sentinels; they hold no pair and are never
/// stored in the arena or the hash index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum Link {
    Head,
    Node(DefaultKey),
    Tail,
}

impl Link {
    #[inline]
    pub(crate) fn slot(self) -> Option<DefaultKey> {
        match self {
            Link::Node(k) => Some(k),
            Link::Head | Link::Tail => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Cached so the index never calls `K: Hash` again after insertion.
    pub(crate) hash: u64,
    pub(crate) before: Link,
    pub(crate) after: Link,
}

impl<K, V> Node<K, V> {
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

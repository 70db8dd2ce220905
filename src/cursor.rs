//! Positions and cursors: the bidirectional iterator protocol.
//!
//! A `Position` names one node of the order list: the head sentinel
//! (`before_begin()`), a live entry, or the tail sentinel (`end()`). It is a
//! detached `Copy` handle, like a generational index, and has to be paired
//! with the map it came from on every use. Positions survive unrelated
//! mutations; once their entry is removed they resolve to `None` and refuse
//! to step.
//!
//! `Cursor` and `CursorMut` bundle a position with a borrow of its map, so
//! the pairing is enforced by the type system.
//!
//! Stepping rules:
//! - `next` from the head sentinel or an entry moves to its successor;
//!   from `end()` it fails.
//! - `prev` moves to the predecessor, but fails when that would be the head
//!   sentinel (there is no "before begin" step) or when already there.
//! - Sentinels never dereference.

use crate::error::MapError;
use crate::linked_hash_map::LinkedHashMap;
use crate::node::Link;
use core::fmt;
use slotmap::DefaultKey;

/// A detached position in a `LinkedHashMap`'s insertion order.
///
/// Two positions are equal iff they denote the same node. Using a position
/// with a map other than the one that produced it is a logic error: it may
/// resolve to an unrelated entry of that map, but never breaks the map's
/// internal consistency.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position(pub(crate) Link);

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Link::Head => f.write_str("Position(before_begin)"),
            Link::Node(k) => write!(f, "Position({:?})", k),
            Link::Tail => f.write_str("Position(end)"),
        }
    }
}

impl Position {
    pub(crate) const BEFORE_BEGIN: Position = Position(Link::Head);
    pub(crate) const END: Position = Position(Link::Tail);

    #[inline]
    pub(crate) fn entry(slot: DefaultKey) -> Self {
        Position(Link::Node(slot))
    }

    /// True for `before_begin()` and `end()`.
    pub fn is_sentinel(&self) -> bool {
        self.0.slot().is_none()
    }

    /// The following position. Fails at `end()` or for a removed entry.
    pub fn next<K, V, S>(self, map: &LinkedHashMap<K, V, S>) -> Result<Position, MapError> {
        map.step_next(self)
    }

    /// The preceding position. Fails at `begin()`, at `before_begin()`, or for
    /// a removed entry.
    pub fn prev<K, V, S>(self, map: &LinkedHashMap<K, V, S>) -> Result<Position, MapError> {
        map.step_prev(self)
    }

    pub fn key<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<&'a K> {
        map.entry_at(*self).map(|(k, _)| k)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<&'a V> {
        map.entry_at(*self).map(|(_, v)| v)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut LinkedHashMap<K, V, S>) -> Option<&'a mut V> {
        map.entry_at_mut(*self).map(|(_, v)| v)
    }

    pub fn entry_ref<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Option<(&'a K, &'a V)> {
        map.entry_at(*self)
    }
}

/// Read-only cursor: a position bound to the map it walks.
pub struct Cursor<'m, K, V, S> {
    pub(crate) map: &'m LinkedHashMap<K, V, S>,
    pub(crate) pos: Position,
}

impl<K, V, S> Clone for Cursor<'_, K, V, S> {
    fn clone(&self) -> Self {
        Cursor {
            map: self.map,
            pos: self.pos,
        }
    }
}

impl<K, V, S> PartialEq for Cursor<'_, K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.map, other.map) && self.pos == other.pos
    }
}

impl<K, V, S> Eq for Cursor<'_, K, V, S> {}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for Cursor<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.pos)
            .field("current", &self.current())
            .finish()
    }
}

impl<'m, K, V, S> Cursor<'m, K, V, S> {
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Entry under the cursor; `None` on a sentinel.
    pub fn current(&self) -> Option<(&'m K, &'m V)> {
        self.map.entry_at(self.pos)
    }

    pub fn is_end(&self) -> bool {
        self.pos == Position::END
    }

    pub fn move_next(&mut self) -> Result<(), MapError> {
        self.pos = self.map.step_next(self.pos)?;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<(), MapError> {
        self.pos = self.map.step_prev(self.pos)?;
        Ok(())
    }

    /// Entry after the cursor without moving it.
    pub fn peek_next(&self) -> Option<(&'m K, &'m V)> {
        let next = self.map.step_next(self.pos).ok()?;
        self.map.entry_at(next)
    }

    /// Entry before the cursor without moving it.
    pub fn peek_prev(&self) -> Option<(&'m K, &'m V)> {
        let prev = self.map.step_prev(self.pos).ok()?;
        self.map.entry_at(prev)
    }
}

/// Mutating cursor: can update values and remove entries mid-walk.
pub struct CursorMut<'m, K, V, S> {
    pub(crate) map: &'m mut LinkedHashMap<K, V, S>,
    pub(crate) pos: Position,
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for CursorMut<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("position", &self.pos)
            .field("current", &self.current())
            .finish()
    }
}

impl<'m, K, V, S> CursorMut<'m, K, V, S> {
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn current(&self) -> Option<(&K, &V)> {
        self.map.entry_at(self.pos)
    }

    pub fn current_mut(&mut self) -> Option<(&K, &mut V)> {
        self.map.entry_at_mut(self.pos)
    }

    pub fn is_end(&self) -> bool {
        self.pos == Position::END
    }

    pub fn move_next(&mut self) -> Result<(), MapError> {
        self.pos = self.map.step_next(self.pos)?;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<(), MapError> {
        self.pos = self.map.step_prev(self.pos)?;
        Ok(())
    }

    /// Removes the entry under the cursor and moves to its successor.
    /// On a sentinel nothing happens and `None` is returned.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let slot = self.pos.0.slot()?;
        let after = self.map.list.after(self.pos.0)?;
        let pair = self.map.retire(slot)?;
        self.pos = Position(after);
        Some(pair)
    }

    /// Read-only view at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, S> {
        Cursor {
            map: &*self.map,
            pos: self.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::{LinkedHashMap, MapError};

    fn map_of(keys: &[u32]) -> LinkedHashMap<u32, String> {
        let mut m = LinkedHashMap::new();
        for &k in keys {
            m.insert(k, format!("v{k}"));
        }
        m
    }

    /// Invariant: `next` from `before_begin()` lands on `begin()`; stepping the
    /// whole way reaches `end()`, which refuses to step further.
    #[test]
    fn position_walk_forward() {
        let m = map_of(&[3, 1, 2]);
        let mut pos = m.before_begin();
        let mut seen = Vec::new();
        loop {
            pos = pos.next(&m).unwrap();
            if pos == m.end() {
                break;
            }
            seen.push(*pos.key(&m).unwrap());
        }
        assert_eq!(seen, vec![3, 1, 2]);
        assert_eq!(pos.next(&m), Err(MapError::InvalidIteratorOperation));
    }

    /// Invariant: `prev` from `end()` walks back to `begin()` and stops there.
    #[test]
    fn position_walk_backward() {
        let m = map_of(&[3, 1, 2]);
        let mut pos = m.end();
        let mut seen = Vec::new();
        while pos != m.begin() {
            pos = pos.prev(&m).unwrap();
            seen.push(*pos.key(&m).unwrap());
        }
        assert_eq!(seen, vec![2, 1, 3]);
        assert_eq!(pos.prev(&m), Err(MapError::InvalidIteratorOperation));
        assert_eq!(
            m.before_begin().prev(&m),
            Err(MapError::InvalidIteratorOperation)
        );
    }

    /// Invariant: sentinels never dereference.
    #[test]
    fn sentinels_do_not_dereference() {
        let mut m = map_of(&[1]);
        assert!(m.end().is_sentinel());
        assert!(m.before_begin().is_sentinel());
        assert!(!m.begin().is_sentinel());
        assert!(m.end().value(&m).is_none());
        assert!(m.before_begin().key(&m).is_none());
        let end = m.end();
        assert!(end.value_mut(&mut m).is_none());
    }

    /// Invariant: a removed entry's position no longer resolves or steps, and
    /// does not alias a later entry reusing the slot.
    #[test]
    fn stale_position_fails() {
        let mut m = map_of(&[1, 2]);
        let p1 = m.find(&1);
        assert!(m.erase(p1).is_some());
        let (p3, inserted) = m.insert(3, "v3".to_string());
        assert!(inserted);
        assert_ne!(p1, p3);
        assert!(p1.value(&m).is_none());
        assert_eq!(p1.next(&m), Err(MapError::InvalidIteratorOperation));
        assert_eq!(p1.prev(&m), Err(MapError::InvalidIteratorOperation));
    }

    /// Erasing through a stale position is a no-op, also after its key
    /// comes back under a new slot.
    #[test]
    fn erase_stale_position_is_noop() {
        let mut m = map_of(&[0, 1, 2, 3, 4]);
        let p = m.find(&2);
        assert_eq!(m.erase(p), Some((2, "v2".to_string())));
        assert!(m.erase(p).is_none());
        assert_eq!(m.len(), 4);
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![0, 1, 3, 4]);

        let (fresh, inserted) = m.insert(2, "v9".to_string());
        assert!(inserted);
        assert_ne!(fresh, p);
        assert!(m.erase(p).is_none());
        assert_eq!(m.len(), 5);
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![0, 1, 3, 4, 2]);
        assert_eq!(fresh.value(&m).map(String::as_str), Some("v9"));
        m.assert_consistent();
    }

    #[test]
    fn cursor_moves_and_peeks() {
        let m = map_of(&[10, 20, 30]);
        let mut c = m.cursor_front();
        assert_eq!(c.current().map(|(k, _)| *k), Some(10));
        assert_eq!(c.peek_prev(), None);
        assert_eq!(c.peek_next().map(|(k, _)| *k), Some(20));
        c.move_next().unwrap();
        c.move_next().unwrap();
        assert_eq!(c.current().map(|(_, v)| v.as_str()), Some("v30"));
        c.move_next().unwrap();
        assert!(c.is_end());
        assert!(c.current().is_none());
        assert_eq!(c.move_next(), Err(MapError::InvalidIteratorOperation));
        c.move_prev().unwrap();
        assert_eq!(c.position(), m.find(&30));
    }

    #[test]
    fn cursors_compare_by_map_and_position() {
        let m = map_of(&[1, 2]);
        let other = map_of(&[1, 2]);
        let a = m.cursor_front();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.move_next().unwrap();
        assert_ne!(a, b);
        assert_ne!(m.cursor(m.end()), other.cursor(other.end()));
    }

    #[test]
    fn cursor_mut_updates_and_removes() {
        let mut m = map_of(&[1, 2, 3, 4]);
        {
            let mut c = m.cursor_front_mut();
            while !c.is_end() {
                let even = c.current().map(|(k, _)| k % 2 == 0).unwrap();
                if even {
                    let (k, _) = c.remove_current().unwrap();
                    assert_eq!(k % 2, 0);
                } else {
                    c.current_mut().unwrap().1.push('!');
                    c.move_next().unwrap();
                }
            }
            assert!(c.remove_current().is_none());
            assert_eq!(c.as_cursor().position(), Position::END);
        }
        let items: Vec<_> = m.iter().map(|(k, v)| (*k, v.clone())).collect();
        assert_eq!(items, vec![(1, "v1!".to_string()), (3, "v3!".to_string())]);
    }
}

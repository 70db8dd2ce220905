//! linked-hashmap: an insertion-ordered hash map with O(1) erase and
//! stable, bidirectional positions.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a drop-in ordered dictionary. Lookup, insert and erase are O(1)
//!   on average; iteration always follows first-insertion order and erase
//!   never disturbs the order of the remaining entries.
//! - Layers:
//!   - `OrderList<K, V>`: node arena (`slotmap::SlotMap`) threaded by an
//!     intrusive doubly linked list with two sentinels.
//!   - `HashIndex<S>`: `hashbrown::HashTable` of arena slots keyed by each
//!     node's cached hash; includes a debug-only reentrancy guard around
//!     probes.
//!   - `LinkedHashMap<K, V, S>`: public facade that updates index and list
//!     together and exposes positions, cursors and iterators.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync`.
//! - No per-entry heap allocation beyond the arena and table storage. The
//!   one exception is `iter_mut`/`values_mut`, which build a side table of
//!   node references (sized to the arena) once per call.
//! - Unique keys; inserting a present key is a no-op reported as `false`.
//! - No eviction and no capacity limit; entries leave only through
//!   `erase`, `remove`, `clear`, a cursor, or drop.
//!
//! Sentinels
//! - The head and tail sentinels are the fixed link values `Head` and
//!   `Tail`. They are never arena slots and never enter the index, so they
//!   cannot be dereferenced or erased. `before_begin()` and `end()` name them
//!   as positions.
//!
//! Ownership and removal
//! - The arena owns every node; the index and every `Position` hold slot
//!   keys only. All removals funnel through one internal retire step that
//!   detaches the slot from the index, then unlinks it from the list and
//!   returns the owned pair. `K`/`V` drop code therefore runs only after the
//!   structure is consistent again.
//! - Slot keys are generational, so a position to a removed entry never
//!   resolves to a newer one.
//!
//! Hasher and rehashing invariants
//! - Each node stores its `u64` hash. Table growth and removal use the
//!   stored hash, so `K: Hash` runs once per insert and never during a
//!   resize or an erase by position.
//!
//! Lookup strictness
//! - `get_or_insert_default` (mutable indexing) inserts `V::default()` for
//!   a missing key. `at`, `at_mut` and read-only `map[&k]` never insert;
//!   `at`/`at_mut` return `MapError::KeyNotFound`, indexing panics with it.
//!
//! Notes and non-goals
//! - Borrowing iterators and cursors hold the map borrowed, which rules out
//!   using them across `clear` or drop at compile time. Detached positions
//!   are checked at use instead.
//! - `Clone` is a deep copy in source order and shares nothing with the
//!   source.

mod cursor;
mod error;
mod hash_index;
mod iter;
mod linked_hash_map;
mod linked_hash_map_proptest;
mod node;
mod order_list;
mod reentrancy;

// Public surface
pub use cursor::{Cursor, CursorMut, Position};
pub use error::MapError;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use linked_hash_map::LinkedHashMap;

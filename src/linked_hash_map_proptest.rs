#![cfg(test)]

// Property tests for LinkedHashMap kept inside the crate so they can call
// the internal consistency check (`assert_consistent`).

use crate::cursor::Position;
use crate::linked_hash_map::LinkedHashMap;
use proptest::prelude::*;
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so failing cases shrink toward earlier keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    IndexMut(usize, i32),
    EraseAt(usize),
    Remove(usize),
    Find(usize),
    Mutate(usize, i32),
    EraseFront,
    Clear,
    WalkBack,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::IndexMut(i, d)),
            2 => idx.clone().prop_map(OpI::EraseAt),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::EraseFront),
            1 => Just(OpI::Clear),
            1 => Just(OpI::WalkBack),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Runs one scenario against a `Vec<(Key, i32)>` model kept in insertion order.
// Invariants exercised after every operation:
// - Iteration order equals the model order (erase + reinsert moves to the end).
// - Index and list agree (`assert_consistent`), and `len` matches the model.
// - Duplicate inserts change nothing; `get_or_insert_default` never duplicates.
// - Positions of removed entries never resolve again.
fn run_scenario<S>(mut sut: LinkedHashMap<Key, i32, S>, pool: Vec<String>, ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    S: std::hash::BuildHasher,
{
    let mut model: Vec<(Key, i32)> = Vec::new();
    let mut stale: Vec<Position> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let existing = model.iter().position(|(mk, _)| *mk == k);
                let (pos, inserted) = sut.insert(k.clone(), v);
                prop_assert_eq!(inserted, existing.is_none());
                if existing.is_none() {
                    model.push((k.clone(), v));
                }
                let expected = model.iter().find(|(mk, _)| *mk == k).map(|(_, mv)| mv);
                prop_assert_eq!(pos.value(&sut), expected);
            }
            OpI::IndexMut(i, d) => {
                let k = key_from(&pool, i);
                let slot = sut.get_or_insert_default(k.clone());
                *slot = slot.wrapping_add(d);
                match model.iter_mut().find(|(mk, _)| *mk == k) {
                    Some((_, mv)) => *mv = mv.wrapping_add(d),
                    None => model.push((k, d)),
                }
            }
            OpI::EraseAt(i) => {
                let k = key_from(&pool, i);
                let pos = sut.find(k.0.as_str());
                match model.iter().position(|(mk, _)| *mk == k) {
                    Some(at) => {
                        let (kk, vv) = sut.erase(pos).expect("found position must erase");
                        let (mk, mv) = model.remove(at);
                        prop_assert_eq!(kk, mk);
                        prop_assert_eq!(vv, mv);
                        stale.push(pos);
                    }
                    None => {
                        prop_assert_eq!(pos, sut.end());
                        prop_assert!(sut.erase(pos).is_none());
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                let pos = sut.find(k.0.as_str());
                let got = sut.remove(k.0.as_str());
                let want = model
                    .iter()
                    .position(|(mk, _)| *mk == k)
                    .map(|at| model.remove(at).1);
                prop_assert_eq!(got, want);
                if want.is_some() {
                    stale.push(pos);
                }
            }
            OpI::Find(i) => {
                let k = key_from(&pool, i);
                let pos = sut.find(k.0.as_str());
                let present = model.iter().any(|(mk, _)| *mk == k);
                prop_assert_eq!(pos != sut.end(), present);
                prop_assert_eq!(sut.count(k.0.as_str()), usize::from(present));
                if present {
                    prop_assert_eq!(pos.key(&sut), Some(&k));
                }
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                let pos = sut.find(k.0.as_str());
                if let Some(v) = pos.value_mut(&mut sut) {
                    *v = v.wrapping_add(d);
                    let (_, mv) = model
                        .iter_mut()
                        .find(|(mk, _)| *mk == k)
                        .expect("model tracks every live key");
                    *mv = mv.wrapping_add(d);
                }
            }
            OpI::EraseFront => {
                let pos = sut.begin();
                let got = sut.erase(pos);
                if model.is_empty() {
                    prop_assert!(got.is_none());
                } else {
                    let want = model.remove(0);
                    prop_assert_eq!(got, Some(want));
                    stale.push(pos);
                }
            }
            OpI::Clear => {
                stale.extend(model.iter().map(|(k, _)| sut.find(k.0.as_str())));
                sut.clear();
                model.clear();
            }
            OpI::WalkBack => {
                let mut pos = sut.end();
                let mut back = Vec::new();
                while pos != sut.begin() {
                    pos = pos.prev(&sut).expect("prev before reaching begin");
                    back.push(pos.key(&sut).cloned().expect("entry position"));
                }
                prop_assert!(pos.prev(&sut).is_err());
                let want: Vec<Key> = model.iter().rev().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(back, want);
            }
        }

        sut.assert_consistent();
        let order: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&order, &model);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let len = sut.len();
        for &pos in &stale {
            prop_assert!(pos.value(&sut).is_none());
            prop_assert!(sut.erase(pos).is_none());
        }
        prop_assert_eq!(sut.len(), len);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(LinkedHashMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl std::hash::BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants under worst-case collisions.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(LinkedHashMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Property: a clone taken mid-sequence is unaffected by later mutation of
// the source, and `clone_from` reproduces the source exactly.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_clone_independence(
        first in proptest::collection::vec((0u8..16, any::<i32>()), 0..32),
        second in proptest::collection::vec((0u8..16, any::<i32>()), 0..32),
    ) {
        let mut sut: LinkedHashMap<u8, i32> = first.iter().copied().collect();
        let snapshot: Vec<(u8, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
        let copy = sut.clone();

        for (k, v) in second {
            if sut.remove(&k).is_none() {
                sut.insert(k, v);
            }
        }
        sut.clear();

        copy.assert_consistent();
        let after: Vec<(u8, i32)> = copy.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(after, snapshot);

        let mut target: LinkedHashMap<u8, i32> = LinkedHashMap::new();
        target.insert(200, 0);
        target.clone_from(&copy);
        target.assert_consistent();
        prop_assert_eq!(target, copy);
    }
}

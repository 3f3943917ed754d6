#![cfg(test)]

// Property tests for IntHashMap kept inside the crate so they run with the
// unit tests and share the slot-level accessors.

use crate::int_hash_map::{IntHashMap, Placement};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Add(i32, i32),
    Set(i32, i32),
    Remove(i32),
    Get(i32),
    Mutate(i32, i32),
    Clear,
}

// Small key range so chains collide and slots get recycled; a few extreme
// keys to cover sign and width edges.
fn arb_key() -> impl Strategy<Value = i32> {
    prop_oneof![
        8 => -40i32..40,
        1 => prop_oneof![Just(i32::MIN), Just(i32::MAX), Just(-1), Just(0)],
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Add(k, v)),
        3 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Set(k, v)),
        5 => arb_key().prop_map(Op::Remove),
        2 => arb_key().prop_map(Op::Get),
        2 => (arb_key(), any::<i32>()).prop_map(|(k, d)| Op::Mutate(k, d)),
        1 => Just(Op::Clear),
    ]
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `len` equals the number of distinct keys present.
// - Duplicate `add` is rejected; `set` reports the existing slot.
// - A live key keeps its slot index until removed, across growth.
// - The next insertion after a removal reuses the freed slot.
// - The slot cursor yields exactly the live slot indices.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in proptest::collection::vec(arb_op(), 1..200)) {
        let mut sut: IntHashMap<i32> = IntHashMap::new();
        let mut model: HashMap<i32, i32> = HashMap::new();
        let mut index_of: HashMap<i32, usize> = HashMap::new();
        let mut just_freed: Option<usize> = None;

        for op in ops {
            match op {
                Op::Add(k, v) => {
                    let r = sut.add(k, v).unwrap();
                    if model.contains_key(&k) {
                        prop_assert_eq!(r, None);
                    } else {
                        let i = r.expect("absent key must insert");
                        if let Some(freed) = just_freed {
                            prop_assert_eq!(i, freed);
                        }
                        model.insert(k, v);
                        index_of.insert(k, i);
                    }
                    just_freed = None;
                }
                Op::Set(k, v) => {
                    let p = sut.set(k, v).unwrap();
                    match index_of.get(&k) {
                        Some(&i) => prop_assert_eq!(p, Placement::Replaced(i)),
                        None => {
                            prop_assert!(p.is_inserted());
                            if let Some(freed) = just_freed {
                                prop_assert_eq!(p.index(), freed);
                            }
                            index_of.insert(k, p.index());
                        }
                    }
                    model.insert(k, v);
                    just_freed = None;
                }
                Op::Remove(k) => {
                    let got = sut.remove(k);
                    prop_assert_eq!(got, model.remove(&k));
                    if got.is_some() {
                        let i = index_of.remove(&k).unwrap();
                        just_freed = if model.is_empty() { Some(0) } else { Some(i) };
                    }
                }
                Op::Get(k) => {
                    prop_assert_eq!(sut.get(k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
                    prop_assert_eq!(sut.find_index(k), index_of.get(&k).copied());
                }
                Op::Mutate(k, d) => {
                    if let Some(v) = sut.get_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(&k) {
                        *v = v.wrapping_add(d);
                    }
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    index_of.clear();
                    just_freed = Some(0);
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert!(sut.len() <= sut.high_water_mark());
            prop_assert!(sut.high_water_mark() <= sut.capacity());

            let cursor: BTreeSet<usize> = sut.slot_indices().collect();
            let expected: BTreeSet<usize> = index_of.values().copied().collect();
            prop_assert_eq!(&cursor, &expected);
            prop_assert_eq!(sut.slot_indices().count(), model.len());

            for (&k, &i) in &index_of {
                prop_assert_eq!(sut.key_at(i), Some(k));
                prop_assert_eq!(sut.value_at(i), model.get(&k));
            }
        }
    }
}

// Property: a copy evolves independently of its source.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_copy_from_is_independent(
        seed in proptest::collection::vec((arb_key(), any::<i32>()), 0..60),
        removals in proptest::collection::vec(arb_key(), 0..20),
        later in proptest::collection::vec((arb_key(), any::<i32>()), 1..30),
    ) {
        let mut src: IntHashMap<i32> = IntHashMap::new();
        for (k, v) in seed {
            src.set(k, v).unwrap();
        }
        for k in removals {
            src.remove(k);
        }

        let mut dst: IntHashMap<i32> = IntHashMap::new();
        dst.copy_from(&src);
        let snapshot: Vec<(usize, i32, i32)> = src.iter().map(|(i, k, v)| (i, k, *v)).collect();
        prop_assert_eq!(
            dst.iter().map(|(i, k, v)| (i, k, *v)).collect::<Vec<_>>(),
            snapshot.clone()
        );

        for (k, v) in later {
            if k % 2 == 0 {
                dst.set(k, v).unwrap();
            } else {
                dst.remove(k);
            }
        }
        prop_assert_eq!(
            src.iter().map(|(i, k, v)| (i, k, *v)).collect::<Vec<_>>(),
            snapshot
        );
    }
}

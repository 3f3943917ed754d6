// MultiMap property tests.
//
// Model: std HashMap<key, Vec<value>> where a key exists iff its Vec is
// non-empty.
// Invariants after every step:
// - values(k) equals the model list (bind order preserved).
// - contains_key(k) iff the model list is non-empty; len() equals the
//   number of such keys.
// - With a shared VecPool, every buffer released by an emptied key is
//   either retained by the pool or back in use; the pool never exceeds its
//   retention bound.
use proptest::prelude::*;
use slot_intmap::{FixedTableStrategy, MultiMap, VecPool};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Clone, Debug)]
enum Op {
    Bind(u8, i16),
    Unbind(u8, i16),
    UnbindAll(u8),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u8..6, 0i16..4).prop_map(|(k, v)| Op::Bind(k, v)),
        4 => (0u8..6, 0i16..4).prop_map(|(k, v)| Op::Unbind(k, v)),
        1 => (0u8..6).prop_map(Op::UnbindAll),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_multi_map_matches_model(ops in proptest::collection::vec(arb_op(), 1..150)) {
        let pool = Rc::new(VecPool::with_max_retained(4));
        let mut sut = MultiMap::with_pool(Rc::clone(&pool), FixedTableStrategy);
        let mut model: HashMap<u8, Vec<i16>> = HashMap::new();

        for op in ops {
            match op {
                Op::Bind(k, v) => {
                    sut.bind(k, v).unwrap();
                    model.entry(k).or_default().push(v);
                }
                Op::Unbind(k, v) => {
                    let expected = match model.get_mut(&k) {
                        Some(list) => match list.iter().position(|x| *x == v) {
                            Some(pos) => {
                                list.remove(pos);
                                if list.is_empty() {
                                    model.remove(&k);
                                }
                                true
                            }
                            None => false,
                        },
                        None => false,
                    };
                    prop_assert_eq!(sut.unbind(&k, &v), expected);
                }
                Op::UnbindAll(k) => {
                    prop_assert_eq!(sut.unbind_all(&k), model.remove(&k).is_some());
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            for k in 0u8..6 {
                let expected: &[i16] = model.get(&k).map(Vec::as_slice).unwrap_or(&[]);
                prop_assert_eq!(sut.values(&k), expected);
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            prop_assert!(pool.retained() <= pool.max_retained());
        }
    }
}

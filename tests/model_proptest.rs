use std::collections::HashMap as ModelMap;

use chained_map::HashMap;
use chained_map::KeyComparer;
use chained_map::TableError;
use chained_map::comparer::FnComparer;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Add(u16, u32),
    TryAdd(u16, u32),
    Set(u16, u32),
    Get(u16),
    Remove(u16),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    // A narrow key range keeps most operations on keys that already exist.
    let key = 0u16..64;
    prop_oneof![
        4 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Add(k, v)),
        2 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::TryAdd(k, v)),
        4 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
        3 => key.clone().prop_map(Op::Get),
        3 => key.prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn run<C: KeyComparer<u16>>(mut map: HashMap<u16, u32, C>, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut model = ModelMap::new();

    for op in ops {
        let version = map.version();
        match op {
            Op::Add(k, v) => {
                let expected = if model.contains_key(&k) {
                    Err(TableError::DuplicateKey)
                } else {
                    model.insert(k, v);
                    Ok(())
                };
                prop_assert_eq!(map.add(k, v), expected);
            }
            Op::TryAdd(k, v) => {
                let fresh = !model.contains_key(&k);
                if fresh {
                    model.insert(k, v);
                }
                prop_assert_eq!(map.try_add(k, v), fresh);
            }
            Op::Set(k, v) => {
                prop_assert_eq!(map.insert(k, v), model.insert(k, v));
                prop_assert!(map.version() > version);
            }
            Op::Get(k) => {
                prop_assert_eq!(map.try_get(&k), model.get(&k));
                prop_assert_eq!(map.version(), version);
            }
            Op::Remove(k) => {
                let expected = model.remove(&k);
                prop_assert_eq!(map.remove_take(&k), expected);
                prop_assert_eq!(map.version() > version, expected.is_some());
            }
            Op::Clear => {
                let capacity = map.capacity();
                map.clear();
                model.clear();
                prop_assert_eq!(map.capacity(), capacity);
            }
        }

        prop_assert_eq!(map.len(), model.len());
        prop_assert!(map.len() <= map.capacity());
    }

    let mut entries: Vec<(u16, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable();
    let mut expected: Vec<(u16, u32)> = model.into_iter().collect();
    expected.sort_unstable();
    prop_assert_eq!(entries, expected);
    Ok(())
}

proptest! {
    #[test]
    fn matches_std_map(ops in prop::collection::vec(op(), 1..400)) {
        run(HashMap::new(), ops)?;
    }

    #[test]
    fn matches_std_map_with_heavy_collisions(ops in prop::collection::vec(op(), 1..400)) {
        let clustered = FnComparer::new(|k: &u16| u64::from(*k % 5), |a: &u16, b: &u16| a == b);
        run(HashMap::with_comparer(clustered), ops)?;
    }

    #[test]
    fn presized_map_matches_std_map(
        capacity in 0usize..200,
        ops in prop::collection::vec(op(), 1..200),
    ) {
        run(HashMap::with_capacity(capacity), ops)?;
    }
}

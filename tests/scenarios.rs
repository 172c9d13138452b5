use chained_map::HashMap;
use chained_map::KeyComparer;
use chained_map::Snapshot;
use chained_map::StringMap;
use chained_map::TableError;
use chained_map::TextComparer;
use chained_map::hash_map::COLLISION_THRESHOLD;
use test_log::test;

#[test]
fn add_lookup_remove_count() {
    let mut map = HashMap::new();
    map.add(1, 10.0).unwrap();
    map.add(2, 20.0).unwrap();
    assert_eq!(map.try_get(&1), Some(&10.0));
    assert!(map.remove(&1));
    assert_eq!(map.try_get(&1), None);
    assert_eq!(map.count(), 1);
}

#[test]
fn duplicate_add_fails_but_set_overwrites() {
    let mut map = HashMap::new();
    map.add(5, 1.0).unwrap();
    assert_eq!(map.add(5, 2.0), Err(TableError::DuplicateKey));
    map.set(5, 2.0);
    assert_eq!(map.get(&5), Ok(&2.0));
}

#[test]
fn round_trip_returns_last_written_values() {
    let mut map = HashMap::new();
    for i in 0..10_000u32 {
        map.set(i, i);
    }
    for i in (0..10_000u32).step_by(3) {
        map.set(i, i + 1);
    }
    for i in 0..10_000u32 {
        let expected = if i % 3 == 0 { i + 1 } else { i };
        assert_eq!(map[&i], expected);
    }
    assert_eq!(map.len(), 10_000);
}

#[test]
fn removed_slot_is_reused_without_growth() {
    let mut map = HashMap::with_capacity(7);
    for i in 0..7u64 {
        map.set(i, i);
    }
    let capacity = map.capacity();

    assert_eq!(map.remove_take(&3), Some(3));
    map.set(70, 70);
    assert_eq!(map.len(), 7);
    assert_eq!(map.capacity(), capacity);

    map.set(71, 71);
    assert!(map.capacity() > capacity);
}

#[test]
fn textual_flooding_switches_to_randomized_comparer() {
    let mut map = StringMap::with_capacity_and_comparer(1000, TextComparer::new());
    let capacity = map.capacity();
    let probe = TextComparer::new();
    let keys: Vec<String> = (0u64..)
        .map(|i| format!("user-{i}"))
        .filter(|key| (probe.hash(key) & 0x7FFF_FFFF) as usize % capacity == 0)
        .take(COLLISION_THRESHOLD * 2)
        .collect();

    for (i, key) in keys.iter().enumerate() {
        map.add(key.clone(), i).unwrap();
    }

    assert!(map.comparer().is_randomized());
    assert_eq!(map.capacity(), capacity);
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(map.get(key), Ok(&i));
    }
}

#[test]
fn ordinary_text_keys_keep_the_fixed_comparer() {
    let mut map = StringMap::default();
    for i in 0..5_000 {
        map.set(format!("name-{i}"), i);
    }
    assert!(!map.comparer().is_randomized());
    assert_eq!(map.len(), 5_000);
}

#[test]
fn cursor_fails_fast_after_modification() {
    let mut map: HashMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
    let mut cursor = map.cursor();
    assert!(cursor.next(&map).unwrap().is_some());

    map.remove(&"a");
    assert_eq!(cursor.next(&map), Err(TableError::CursorInvalidated));
}

#[test]
fn snapshot_feeds_a_fresh_map() {
    let mut source = StringMap::default();
    for i in 0..100 {
        source.set(format!("k{i}"), i);
    }

    let snapshot = source.to_snapshot();
    let copy = StringMap::from_snapshot(snapshot, TextComparer::new()).unwrap();
    assert_eq!(copy, source);

    let malformed: Snapshot<String, i32> = Snapshot {
        bucket_hint: 11,
        entries: None,
    };
    assert_eq!(
        StringMap::from_snapshot(malformed, TextComparer::new()),
        Err(TableError::MissingKeys)
    );
}

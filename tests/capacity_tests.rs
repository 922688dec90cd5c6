use tsmap::{Error, TsMap};

#[test]
fn test_fill_to_capacity() {
    let map = TsMap::new(5).unwrap();

    for key in 0..5 {
        assert_eq!(map.put(key, key).unwrap(), None);
    }
    assert_eq!(map.load_factor(), 1.0);
    assert!(map.is_full());

    assert_eq!(
        map.put(5, 5).unwrap_err(),
        Error::CapacityExceeded { capacity: 5 }
    );
    assert_eq!(map.len(), 5);
    assert!(map.get(5).is_none());
}

#[test]
fn test_rejection_leaves_table_untouched() {
    let map = TsMap::new(3).unwrap();
    for key in [0, 3, 6] {
        map.put(key, key).unwrap();
    }
    let before = map.snapshot();

    assert!(map.put(9, 9).is_err());
    assert!(map.put(1, 1).is_err());

    assert_eq!(map.snapshot(), before);
    map.check_invariants().unwrap();
}

#[test]
fn test_overwrite_at_capacity() {
    let map = TsMap::new(2).unwrap();
    map.put(1, 1).unwrap();
    map.put(2, 2).unwrap();

    assert_eq!(map.put(2, 20).unwrap(), Some(2));
    assert_eq!(map.get(2), Some(20));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_delete_frees_slot() {
    let map = TsMap::new(3).unwrap();
    for key in 0..3 {
        map.put(key, key * 10).unwrap();
    }
    assert!(map.put(100, 0).is_err());

    assert_eq!(map.del(1), Some(10));
    assert!(map.get(1).is_none());
    assert!(!map.is_full());

    assert_eq!(map.put(100, 0).unwrap(), None);
    assert_eq!(map.len(), 3);
    assert!(map.put(101, 0).is_err());
}

#[test]
fn test_single_bucket_example() {
    let map = TsMap::new(1).unwrap();

    assert_eq!(map.put(5, 42).unwrap(), None);
    assert_eq!(map.len(), 1);
    assert_eq!(map.load_factor(), 1.0);

    assert_eq!(
        map.put(9, 7).unwrap_err(),
        Error::CapacityExceeded { capacity: 1 }
    );
    assert_eq!(map.len(), 1);

    assert_eq!(map.del(5), Some(42));
    assert_eq!(map.len(), 0);

    assert_eq!(map.put(9, 7).unwrap(), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_del_missing_does_not_change_size() {
    let map = TsMap::new(2).unwrap();
    map.put(1, 1).unwrap();

    assert!(map.del(2).is_none());
    assert!(map.del(3).is_none());
    assert_eq!(map.len(), 1);
}

use bytes::Bytes;
use keva::{GetResult, Kind, SharedStore, StoreBase, Value};

#[test]
fn set_then_get_returns_the_value() {
    let store = SharedStore::new();

    assert_eq!(store.set(Bytes::from("foo"), Bytes::from("bar")), "OK");
    assert_eq!(
        store.get(Bytes::from("foo")),
        GetResult::Value(Bytes::from("bar"))
    );
}

#[test]
fn get_on_a_key_never_written_is_missing() {
    let store = SharedStore::new();

    assert_eq!(store.get(Bytes::from("nosuch")), GetResult::Missing);
}

#[test]
fn set_overwrites_an_existing_value() {
    let store = SharedStore::new();

    store.set(Bytes::from("foo"), Bytes::from("bar"));
    store.set(Bytes::from("foo"), Bytes::from("newvalue"));

    assert_eq!(
        store.get(Bytes::from("foo")),
        GetResult::Value(Bytes::from("newvalue"))
    );
}

/// A seeded non-string entry reports wrong-type on read: existence is
/// never collapsed into "not found".
#[test]
fn get_on_a_seeded_list_reports_wrong_type() {
    let store = SharedStore::new();

    store.seed(
        Bytes::from("listkey"),
        Value::List(vec![Bytes::from("item1"), Bytes::from("item2")]),
    );

    assert_eq!(store.get(Bytes::from("listkey")), GetResult::WrongType);
}

#[test]
fn key_type_reports_the_stored_kind() {
    let store = SharedStore::new();

    store.set(Bytes::from("stringkey"), Bytes::from("hello"));
    store.seed(Bytes::from("listkey"), Value::List(vec![]));

    assert_eq!(store.key_type(Bytes::from("stringkey")), Some(Kind::String));
    assert_eq!(store.key_type(Bytes::from("listkey")), Some(Kind::List));
    assert_eq!(store.key_type(Bytes::from("nonexistent")), None);
}

#[test]
fn del_counts_only_keys_that_existed() {
    let store = SharedStore::new();

    store.set(Bytes::from("key1"), Bytes::from("value1"));
    store.set(Bytes::from("key2"), Bytes::from("value2"));
    store.seed(Bytes::from("listkey"), Value::List(vec![]));

    let removed = store.del(vec![
        Bytes::from("key1"),
        Bytes::from("key2"),
        Bytes::from("nonexistent"),
        Bytes::from("listkey"),
    ]);

    assert_eq!(removed, 3);
    assert_eq!(store.get(Bytes::from("key1")), GetResult::Missing);
    assert_eq!(store.get(Bytes::from("key2")), GetResult::Missing);
    assert_eq!(store.get(Bytes::from("listkey")), GetResult::Missing);
}

#[test]
fn del_is_idempotent_past_the_first_call() {
    let store = SharedStore::new();

    store.set(Bytes::from("foo"), Bytes::from("bar"));

    assert_eq!(store.del(vec![Bytes::from("foo")]), 1);
    assert_eq!(store.del(vec![Bytes::from("foo")]), 0);
}

#[test]
fn keys_and_values_are_binary_safe() {
    let store = SharedStore::new();

    let key = Bytes::from_static(b"bin\x00key");
    let value = Bytes::from_static(b"\x01\r\n\xff");

    store.set(key.clone(), value.clone());

    assert_eq!(store.get(key), GetResult::Value(value));
}

/// Readers racing writers only ever observe fully committed values.
#[test]
fn concurrent_readers_observe_committed_values() {
    let store = SharedStore::new();

    store.set(Bytes::from("concurrent1"), Bytes::from("value1"));
    store.set(Bytes::from("concurrent2"), Bytes::from("value2"));

    let mut handles = Vec::new();

    for _ in 0..5 {
        let reader = store.clone();
        handles.push(std::thread::spawn(move || {
            for _ in 0..100 {
                assert_eq!(
                    reader.get(Bytes::from("concurrent1")),
                    GetResult::Value(Bytes::from("value1"))
                );
                assert_eq!(
                    reader.get(Bytes::from("concurrent2")),
                    GetResult::Value(Bytes::from("value2"))
                );
            }
        }));
    }

    for id in 0..2 {
        let writer = store.clone();
        handles.push(std::thread::spawn(move || {
            for round in 0..50 {
                let key = Bytes::from(format!("writer_{}_{}", id, round));
                let value = Bytes::from(format!("value_{}_{}", id, round));

                assert_eq!(writer.set(key.clone(), value.clone()), "OK");
                assert_eq!(writer.get(key), GetResult::Value(value));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        store.get(Bytes::from("concurrent1")),
        GetResult::Value(Bytes::from("value1"))
    );
}

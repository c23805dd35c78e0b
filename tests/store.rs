use std::sync::Arc;
use std::thread;
use std::time::Duration;
use ttlkv::{Store, StoreError};

#[test]
fn never_put_key_is_not_found() {
    let store: Store<String> = Store::new();
    assert_eq!(store.get("nonexistent"), None);
}

#[test]
fn put_and_get() {
    let store = Store::new();
    store.put("key1", "value1", Duration::from_secs(1));
    store.put("key2", "value2", Duration::from_secs(1));

    assert_eq!(store.get("key1"), Some("value1"));
    assert_eq!(store.get("key2"), Some("value2"));
}

#[test]
fn short_ttl_expires_long_ttl_survives() {
    let store = Store::new();
    store.put("a", "1", Duration::from_millis(10));
    store.put("b", "2", Duration::from_millis(50));

    thread::sleep(Duration::from_millis(15));

    assert_eq!(store.get("a"), None);
    assert_eq!(store.get("b"), Some("2"));
}

#[test]
fn delete_missing_key_is_noop() {
    let store: Store<&str> = Store::new();
    store.delete("missing");
    assert_eq!(store.get("missing"), None);
    assert!(matches!(store.remove("missing"), Err(StoreError::NotFound(k)) if k == "missing"));
}

#[test]
fn zero_ttl_never_expires() {
    let store = Store::new();
    store.put("key5", "value5", Duration::ZERO);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(store.get("key5"), Some("value5"));
}

#[test]
fn concurrent_put_then_get() {
    let store = Store::new();

    let writer = {
        let s = store.clone();
        thread::spawn(move || s.put("key3", "value3", Duration::from_secs(3)))
    };
    writer.join().unwrap();

    let reader = {
        let s = store.clone();
        thread::spawn(move || s.get("key3"))
    };
    assert_eq!(reader.join().unwrap(), Some("value3"));
}

#[test]
fn concurrent_put_then_delete() {
    let store = Store::new();

    let writer = {
        let s = store.clone();
        thread::spawn(move || s.put("key4", "value4", Duration::from_secs(2)))
    };
    writer.join().unwrap();

    let deleter = {
        let s = store.clone();
        thread::spawn(move || s.delete("key4"))
    };
    assert!(deleter.join().unwrap());
    assert_eq!(store.get("key4"), None);
}

#[test]
fn shared_payload_is_returned_by_handle() {
    let store = Store::new();
    let payload = Arc::new(vec![1u8, 2, 3]);
    store.put_permanent("blob", Arc::clone(&payload));

    let fetched = store.get("blob").unwrap();
    assert!(Arc::ptr_eq(&fetched, &payload));
}

#[test]
fn interleaved_writers_on_distinct_keys() {
    let store = Store::new();

    let handles: Vec<_> = (0..16)
        .map(|t| {
            let s = store.clone();
            thread::spawn(move || {
                for i in 0..500u32 {
                    let key = format!("{}:{}", t, i);
                    s.put(key.clone(), i, Duration::from_secs(60));
                    assert_eq!(s.get(&key), Some(i));
                    if i % 5 == 0 {
                        s.delete(&key);
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.len(), 16 * 400);
    assert_eq!(store.keys().len(), 16 * 400);
}

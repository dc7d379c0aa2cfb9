use store::{Error, Store};
use tempfile::tempdir;

#[test]
fn s1_put_overwrite_then_del() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.myshell");
    let mut store = Store::create(&path).unwrap();
    store.put("k", b"v1").unwrap();
    store.put("k", b"v2").unwrap();
    assert_eq!(store.get("k").unwrap(), b"v2");
    store.del("k").unwrap();
    assert!(matches!(store.get("k").unwrap_err(), Error::NotFound));
}

#[test]
fn only_first_matching_key_is_updated() {
    // Duplicate keys can appear in the file if an earlier legacy/flat dump
    // was loaded; put/del must only ever touch the first match.
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.myshell");
    std::fs::write(&path, "k=a\nk=b\n").unwrap();
    let mut store = Store::open(&path).unwrap();
    store.put("k", b"c").unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert!(lines[0].starts_with("k=c"));
    assert!(lines[1].starts_with("k=b"));
}

#[test]
fn reopening_a_store_preserves_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.crabdb");
    {
        let mut store = Store::create(&path).unwrap();
        store.put("x", b"1").unwrap();
    }
    let store = Store::open(&path).unwrap();
    assert_eq!(store.get("x").unwrap(), b"1");
}

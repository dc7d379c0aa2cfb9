use interval_store::{Error, Interval, IntervalStore};
use tempfile::tempdir;

#[test]
fn s5_overlap_query_on_half_open_intervals() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.crabdb");
    let mut store = IntervalStore::create(&path).unwrap();
    store.insert(Interval::new(10, 20).unwrap()).unwrap();
    store.insert(Interval::new(15, 25).unwrap()).unwrap();
    store.insert(Interval::new(30, 40).unwrap()).unwrap();

    let (matches, total) = store.find(Interval::new(18, 22).unwrap(), 10).unwrap();
    assert_eq!(total, 2);
    assert_eq!(
        matches,
        vec![Interval::new(10, 20).unwrap(), Interval::new(15, 25).unwrap()]
    );

    assert!(matches!(
        store.find(Interval::new(25, 30).unwrap(), 10).unwrap_err(),
        Error::NotFound
    ));
}

#[test]
fn reopening_an_interval_store_preserves_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.crabdb");
    {
        let mut store = IntervalStore::create(&path).unwrap();
        store.insert(Interval::new(1, 2).unwrap()).unwrap();
    }
    let store = IntervalStore::open(&path).unwrap();
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn delete_removes_backing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.crabdb");
    IntervalStore::create(&path).unwrap();
    assert!(path.exists());
    IntervalStore::delete(&path).unwrap();
    assert!(!path.exists());
}

use store::{Chain, Store};
use tempfile::tempdir;

#[test]
fn s6_two_commits_log_and_checkout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.myshell");
    let mut store = Store::create(&path).unwrap();
    let first = store.commit("first").unwrap();
    store.commit("second").unwrap();

    let mut messages = Vec::new();
    store
        .log(|_hash, message| {
            messages.push(message.to_string());
            true
        })
        .unwrap();
    assert_eq!(messages, vec!["first", "second"]);

    store.checkout(&store::hex16(first.hash)).unwrap();
    assert!(store.checkout("totally-unknown-hash").is_err());
}

#[test]
fn log_callback_can_stop_early() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.myshell");
    let mut store = Store::create(&path).unwrap();
    store.commit("first").unwrap();
    store.commit("second").unwrap();
    store.commit("third").unwrap();

    let mut messages = Vec::new();
    store
        .log(|_hash, message| {
            messages.push(message.to_string());
            message != "second"
        })
        .unwrap();
    assert_eq!(messages, vec!["first", "second"]);
}

#[test]
fn branch_then_checkout_by_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.myshell");
    let mut store = Store::create(&path).unwrap();
    store.branch("feature").unwrap();
    assert_eq!(store.current_branch(), "feature");

    store.branch("main").unwrap();
    store.checkout("feature").unwrap();
    assert_eq!(store.current_branch(), "feature");
}

#[test]
fn sentinels_survive_record_rewrites() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.myshell");
    let mut store = Store::create(&path).unwrap();
    store.put("k", b"v1").unwrap();
    store.commit("first").unwrap();
    store.put("k", b"v2").unwrap();
    store.del("k").unwrap();

    let mut seen = Vec::new();
    store.log(|_, m| { seen.push(m.to_string()); true }).unwrap();
    assert_eq!(seen, vec!["first"]);
}

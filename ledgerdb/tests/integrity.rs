use ledgerdb::Ledger;
use tempfile::tempdir;

#[test]
fn verify_detects_a_tampered_record() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.myshell");
    let mut ledger = Ledger::create(&path).unwrap();
    ledger.put("a", b"1").unwrap();
    ledger.put("b", b"2").unwrap();
    ledger.verify().unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let tampered = contents.replacen('=', "?", 1);
    std::fs::write(&path, tampered).unwrap();
    assert!(ledger.verify().is_err());
}

use book::{Attributes, Book};
use std::env::temp_dir;
use std::fs;

#[test]
fn dump_and_load_round_trip() {
    let path = temp_dir().join(format!("book_dump_{}.txt", std::process::id()));
    let mut book = Book::new();
    book.insert("a", "1", Attributes::default()).unwrap();
    book.insert("b", "hello world", Attributes::default()).unwrap();
    book.dump_to_file(&path).unwrap();

    let loaded = Book::load_from_file(&path).unwrap();
    assert_eq!(loaded.size(), 2);
    assert_eq!(loaded.search("a").unwrap().value, b"1");
    assert_eq!(loaded.search("b").unwrap().value, b"hello world");

    fs::remove_file(&path).unwrap();
}

#[test]
fn load_skips_malformed_lines() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = temp_dir().join(format!("book_dump_malformed_{}.txt", std::process::id()));
    fs::write(&path, "a=1\nnotanentry\nb=2\n").unwrap();
    let loaded = Book::load_from_file(&path).unwrap();
    assert_eq!(loaded.size(), 2);
    fs::remove_file(&path).unwrap();
}

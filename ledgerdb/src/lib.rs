//! The single-crate façade over the record store, its commit chain, the
//! in-memory ordered collection, and the interval index.
//!
//! `book`, `store`, and `interval_store` each stand on their own; this crate
//! wires them together the way `assemblage_db::Db` wires `assemblage_kv`
//! underneath a friendlier API. [`Ledger`] is the file-backed half (record
//! store + chain), with [`Ledger::to_book`]/[`Ledger::persist_book`] bridging
//! to the in-memory [`Book`]. [`Book`], [`Transaction`], and [`IntervalStore`]
//! are re-exported directly for callers who only need one layer.
//!
//! ```
//! use ledgerdb::{Attributes, Chain, Ledger};
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let mut ledger = Ledger::create(dir.path().join("a.myshell")).unwrap();
//! ledger.put("k", b"v1").unwrap();
//! ledger.commit("initial import").unwrap();
//! assert_eq!(ledger.get("k").unwrap(), b"v1");
//!
//! let book = ledger.to_book().unwrap();
//! assert_eq!(book.search("k").unwrap().value, b"v1");
//! ```
mod error;

pub use book::{Attributes, Book, Entry, SortOrder, Transaction};
pub use error::{errstr, Error, Result};
pub use interval_store::{Interval, IntervalStore};
pub use store::{Chain, Commit, OpenOptions, Store, Variant};

use std::path::Path;

/// The file-backed record store and its commit chain, with a bridge to the
/// in-memory [`Book`] layer.
pub struct Ledger {
    store: Store,
}

impl Ledger {
    /// Opens a ledger at `path`, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Ledger {
            store: Store::open(path)?,
        })
    }

    /// Creates a ledger at `path`, truncating any existing contents.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Ledger {
            store: Store::create(path)?,
        })
    }

    /// Releases the ledger's resources.
    pub fn close(self) -> Result<()> {
        self.store.close()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        Ok(self.store.get(key)?)
    }

    pub fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        Ok(self.store.put(key, value)?)
    }

    pub fn del(&mut self, key: &str) -> Result<()> {
        Ok(self.store.del(key)?)
    }

    pub fn verify(&self) -> Result<()> {
        Ok(self.store.verify_integrity()?)
    }

    pub fn commit(&mut self, message: &str) -> Result<Commit> {
        Ok(self.store.commit(message)?)
    }

    pub fn branch(&mut self, name: &str) -> Result<()> {
        Ok(self.store.branch(name)?)
    }

    pub fn checkout(&mut self, target: &str) -> Result<()> {
        Ok(self.store.checkout(target)?)
    }

    pub fn log(&self, callback: impl FnMut(u64, &str) -> bool) -> Result<()> {
        Ok(self.store.log(callback)?)
    }

    pub fn backup(&self, path: impl AsRef<Path>) -> Result<()> {
        Ok(self.store.backup(path)?)
    }

    /// Materializes a [`Book`] from the ledger's current records (sentinels
    /// skipped, hashes verified), in file order.
    pub fn to_book(&self) -> Result<Book> {
        let mut book = Book::new();
        for (key, value) in self.store.entries()? {
            book.insert(key, value, Attributes::default())?;
        }
        Ok(book)
    }

    /// Writes every entry of `book` into the ledger via [`Ledger::put`], in
    /// the book's current order. Duplicate keys in `book` (the book is a
    /// multimap) collapse to their last value, since `put` replaces the
    /// first matching record each call.
    pub fn persist_book(&mut self, book: &Book) -> Result<()> {
        for entry in book.iter() {
            self.put(&entry.key, &entry.value)?;
        }
        Ok(())
    }
}

/// Restores a backup written by [`Chain::backup`] from `src` to `dst`.
pub fn restore(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    Ok(store::restore(src, dst)?)
}

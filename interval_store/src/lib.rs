//! A file-backed, hash-verified index over half-open `[start, end)`
//! intervals, supporting overlap queries.
//!
//! ```
//! use interval_store::{Interval, IntervalStore};
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let mut store = IntervalStore::create(dir.path().join("a.crabdb")).unwrap();
//! store.insert(Interval::new(10, 20).unwrap()).unwrap();
//! store.insert(Interval::new(15, 25).unwrap()).unwrap();
//!
//! let (matches, total) = store.find(Interval::new(18, 22).unwrap(), 10).unwrap();
//! assert_eq!(total, 2);
//! assert_eq!(matches.len(), 2);
//! ```
mod error;
mod interval;
mod store;

pub use error::{errstr, Error, Result};
pub use interval::Interval;
pub use store::{restore, IntervalStore};

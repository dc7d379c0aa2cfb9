//! # File-backed record store with an inline commit/branch chain.
//!
//! A [`Store`] persists key/value records as hash-tagged lines
//! (`key=value #hash=H\n`) in a single file, rewriting the file through a
//! temp-file + rename sequence on every `put`/`del`. [`Chain`] layers a
//! git-inspired commit/branch/checkout/log/backup/restore history onto the
//! same file by interleaving `#`-prefixed sentinel lines, which the record
//! codec treats as opaque and preserves verbatim across rewrites.
//!
//! ## Features
//!
//!   - _line-integrity:_ every record line carries a 16-hex-digit hash tag
//!   - _single-file:_ records and chain sentinels share one file
//!   - _atomic rewrites:_ temp file + rename, optionally fsynced
//!
//! ## Example
//!
//! ```
//! use store::{Chain, Store};
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let mut store = Store::create(dir.path().join("a.myshell")).unwrap();
//! store.put("k", b"v1").unwrap();
//! store.put("k", b"v2").unwrap();
//! assert_eq!(store.get("k").unwrap(), b"v2");
//!
//! store.commit("initial import").unwrap();
//! store.verify_integrity().unwrap();
//! ```
#![deny(unsafe_code)]

mod chain;
mod codec;
mod error;
mod hash;
pub mod lock;
mod store;

pub use chain::{restore, Chain, Commit};
pub use codec::{decode_line, encode_record, verify, Line};
pub use error::{errstr, Error, Result};
pub use hash::{hash64, hex16, parse_hex16};
pub use store::{OpenOptions, Store, Variant};

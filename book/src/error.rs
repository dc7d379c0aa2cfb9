//! The error type for `book` operations.
use std::fmt;

/// The error type for [`crate::Book`] and [`crate::Transaction`] operations.
#[derive(Debug)]
pub enum Error {
    /// A null/empty handle or otherwise invalid argument was passed in.
    InvalidParam {
        /// A short description of which argument was invalid and why.
        reason: String,
    },
    /// An allocation failed while growing the book.
    OutOfMemory,
    /// A transaction was committed or rolled back that was not the
    /// innermost (LIFO) transaction on the book's stack.
    Unknown,
}

/// A specialized `Result` type for `book` operations.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParam { reason } => write!(f, "invalid parameter: {reason}"),
            Error::OutOfMemory => write!(f, "out of memory"),
            Error::Unknown => write!(f, "unknown transaction"),
        }
    }
}

impl std::error::Error for Error {}

/// Returns a user-facing string describing the error kind, matching the
/// `errstr(kind)` contract that higher layers are expected to provide.
pub fn errstr(e: &Error) -> String {
    e.to_string()
}

//! The error type for `store` operations.
use std::fmt;
use std::io;

/// The error type for [`crate::Store`] and [`crate::Chain`] operations.
#[derive(Debug)]
pub enum Error {
    /// A null/empty handle or otherwise invalid argument (invalid extension,
    /// empty key) was passed in.
    InvalidParam {
        /// A short description of which argument was invalid and why.
        reason: String,
    },
    /// The requested key or commit was not found.
    NotFound,
    /// A duplicate key was rejected because the caller enforced uniqueness.
    AlreadyExists,
    /// A host file operation failed.
    Io(io::Error),
    /// A hash mismatch, malformed line, unreadable sentinel, or missing
    /// backup header was found while scanning.
    Corrupted {
        /// A short description of what failed to verify and where.
        reason: String,
    },
}

/// A specialized `Result` type for `store` operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParam { reason } => write!(f, "invalid parameter: {reason}"),
            Error::NotFound => write!(f, "not found"),
            Error::AlreadyExists => write!(f, "already exists"),
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Corrupted { reason } => write!(f, "corrupted: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Returns a user-facing string describing the error kind, matching the
/// `errstr(kind)` contract of spec.md §6/§7.
pub fn errstr(e: &Error) -> String {
    e.to_string()
}

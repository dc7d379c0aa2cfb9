//! Unifies `book::Error`, `store::Error`, and `interval_store::Error` under
//! one tagged error, as spec.md §9 asks ("collapse duplicated taxonomies ...
//! into one tagged error with the kinds listed in §7").
use std::fmt;

#[derive(Debug)]
pub enum Error {
    InvalidParam { reason: String },
    NotFound,
    AlreadyExists,
    Io(std::io::Error),
    Corrupted { reason: String },
    OutOfMemory,
    Unknown,
    /// Reserved for a query-lowering layer (spec.md §4.8); never constructed
    /// by this crate.
    InvalidQuery,
    /// Reserved for the advisory-lock collaborator (spec.md §9); never
    /// constructed by this crate.
    Locked,
    Timeout,
    PermissionDenied,
    Unsupported,
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParam { reason } => write!(f, "invalid parameter: {reason}"),
            Error::NotFound => write!(f, "not found"),
            Error::AlreadyExists => write!(f, "already exists"),
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Corrupted { reason } => write!(f, "corrupted: {reason}"),
            Error::OutOfMemory => write!(f, "out of memory"),
            Error::Unknown => write!(f, "unknown transaction"),
            Error::InvalidQuery => write!(f, "invalid query"),
            Error::Locked => write!(f, "locked"),
            Error::Timeout => write!(f, "timed out"),
            Error::PermissionDenied => write!(f, "permission denied"),
            Error::Unsupported => write!(f, "unsupported"),
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

impl From<book::Error> for Error {
    fn from(e: book::Error) -> Self {
        match e {
            book::Error::InvalidParam { reason } => Error::InvalidParam { reason },
            book::Error::OutOfMemory => Error::OutOfMemory,
            book::Error::Unknown => Error::Unknown,
        }
    }
}

impl From<store::Error> for Error {
    fn from(e: store::Error) -> Self {
        match e {
            store::Error::InvalidParam { reason } => Error::InvalidParam { reason },
            store::Error::NotFound => Error::NotFound,
            store::Error::AlreadyExists => Error::AlreadyExists,
            store::Error::Io(io) => Error::Io(io),
            store::Error::Corrupted { reason } => Error::Corrupted { reason },
        }
    }
}

impl From<interval_store::Error> for Error {
    fn from(e: interval_store::Error) -> Self {
        match e {
            interval_store::Error::InvalidParam { reason } => Error::InvalidParam { reason },
            interval_store::Error::NotFound => Error::NotFound,
            interval_store::Error::Io(io) => Error::Io(io),
            interval_store::Error::Corrupted { reason } => Error::Corrupted { reason },
        }
    }
}

/// Renders an error the way callers outside this crate expect to display it.
pub fn errstr(e: &Error) -> String {
    e.to_string()
}

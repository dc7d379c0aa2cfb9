//! Hand-written error taxonomy, matching [`store::Error`]'s shape rather
//! than pulling in a derive-macro crate.
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    InvalidParam { reason: String },
    NotFound,
    Io(io::Error),
    Corrupted { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParam { reason } => write!(f, "invalid parameter: {reason}"),
            Error::NotFound => write!(f, "interval not found"),
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Corrupted { reason } => write!(f, "corrupted interval file: {reason}"),
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

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Renders an error the way callers outside this crate expect to display it.
pub fn errstr(e: &Error) -> String {
    e.to_string()
}

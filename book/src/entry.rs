//! The key/value record held by a single page of a [`crate::Book`].

/// Flags describing how a key/value pair should be treated by callers.
///
/// These are advisory metadata only: the `book` crate never enforces them
/// itself (see [`crate::Book::insert`]), callers that need uniqueness or
/// non-null guarantees must pre-check with [`crate::Book::search`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Attributes {
    /// Marks the key as the primary key of the collection.
    pub is_primary_key: bool,
    /// Marks the key as expected to be unique among all entries.
    pub is_unique: bool,
    /// Marks the value as allowed to be empty/absent.
    pub is_nullable: bool,
}

/// A single key/value record stored in a [`crate::Book`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Entry {
    /// The record's key.
    pub key: String,
    /// The record's value, an arbitrary UTF-8 byte string.
    pub value: Vec<u8>,
    /// Advisory flags describing the entry.
    pub attributes: Attributes,
}

impl Entry {
    /// Creates a new entry with the given key, value and attributes.
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>, attributes: Attributes) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            attributes,
        }
    }
}

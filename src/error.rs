use core::fmt;

/// Errors reported by [`HashTable`](crate::HashTable) and
/// [`HashMap`](crate::HashMap).
///
/// Every variant describes a caller error or an explicit policy decision.
/// None of them are retried or recovered inside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableError {
    /// An argument was outside the accepted range.
    InvalidArgument(&'static str),
    /// A bulk load supplied an absent key.
    NullKey,
    /// A strict lookup did not find the key.
    KeyNotFound,
    /// A strict insertion found the key already present.
    DuplicateKey,
    /// A chain walk visited more slots than the table holds, which only
    /// happens when the chain links form a cycle.
    Corrupted,
    /// The table was structurally modified after the cursor was created.
    CursorInvalidated,
    /// A bulk load declared a non-zero size but supplied no entries.
    MissingKeys,
    /// Growing the table would exceed [`MAX_CAPACITY`](crate::hash_table::MAX_CAPACITY).
    CapacityOverflow,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            TableError::NullKey => f.write_str("key must not be absent"),
            TableError::KeyNotFound => f.write_str("the given key was not present in the table"),
            TableError::DuplicateKey => {
                f.write_str("an item with the same key has already been added")
            }
            TableError::Corrupted => f.write_str(
                "chain walk exceeded the slot count; the table was mutated without synchronization",
            ),
            TableError::CursorInvalidated => {
                f.write_str("the table was modified; enumeration cannot continue")
            }
            TableError::MissingKeys => f.write_str("bulk load declared entries but supplied none"),
            TableError::CapacityOverflow => f.write_str("table capacity overflow"),
        }
    }
}

impl core::error::Error for TableError {}

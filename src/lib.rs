#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Key hashing and equality strategies.
///
/// A table never hashes or compares keys on its own; it always goes through
/// a [`KeyComparer`]. This module provides the intrinsic comparer, the
/// textual comparer that supports hash-flooding mitigation, and a
/// closure-based comparer.
pub mod comparer;

mod error;

/// A key-value map built on [`HashTable`].
///
/// The map adds key semantics on top of the raw table: strict and lenient
/// insertion, strict and lenient lookup, and hash-flooding mitigation for
/// comparers that support it.
pub mod hash_map;

/// The raw separately chained table.
///
/// [`HashTable`] stores values of any type and never hashes on its own:
/// callers pass the hash and an equality predicate to every operation.
pub mod hash_table;

mod snapshot;

pub use comparer::Intrinsic;
pub use comparer::KeyComparer;
pub use comparer::TextComparer;
pub use error::TableError;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use snapshot::Snapshot;

/// A map keyed by owned strings, with hash-flooding mitigation enabled.
pub type StringMap<V> = HashMap<alloc::string::String, V, TextComparer>;

use alloc::vec::Vec;

use crate::comparer::KeyComparer;
use crate::error::TableError;
use crate::hash_map::HashMap;

/// A detached bulk form of a [`HashMap`], used to move its contents through
/// a serializer or across process boundaries.
///
/// `bucket_hint` is the capacity of the exporting map. A hint of `0` stands
/// for a map that never allocated, in which case `entries` is ignored.
/// Keys are optional so that formats which can express an absent key are
/// rejected on import with [`TableError::NullKey`] instead of being
/// silently dropped.
///
/// The comparer is not part of the snapshot; the importer supplies it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<K, V> {
    /// Capacity of the exporting map.
    pub bucket_hint: usize,
    /// The exported entries, in the exporter's enumeration order.
    pub entries: Option<Vec<(Option<K>, V)>>,
}

impl<K, V, C> HashMap<K, V, C> {
    /// Exports the map's capacity and a copy of its entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_map::HashMap;
    /// use chained_map::Intrinsic;
    ///
    /// let mut map = HashMap::new();
    /// map.set("a", 1);
    /// map.set("b", 2);
    ///
    /// let snapshot = map.to_snapshot();
    /// let copy = HashMap::from_snapshot(snapshot, Intrinsic::new()).unwrap();
    /// assert_eq!(map, copy);
    /// ```
    pub fn to_snapshot(&self) -> Snapshot<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let bucket_hint = self.capacity();
        Snapshot {
            bucket_hint,
            entries: (bucket_hint != 0).then(|| {
                self.iter()
                    .map(|(k, v)| (Some(k.clone()), v.clone()))
                    .collect()
            }),
        }
    }

    /// Consuming form of [`to_snapshot`](HashMap::to_snapshot).
    pub fn into_snapshot(self) -> Snapshot<K, V> {
        let bucket_hint = self.capacity();
        Snapshot {
            bucket_hint,
            entries: (bucket_hint != 0)
                .then(|| self.into_iter().map(|(k, v)| (Some(k), v)).collect()),
        }
    }
}

impl<K, V, C> HashMap<K, V, C>
where
    C: KeyComparer<K>,
{
    /// Rebuilds a map from `snapshot`, hashing every key with `comparer`.
    ///
    /// The map is presized from the snapshot's hint and each entry is added
    /// with [`add`](HashMap::add) semantics.
    ///
    /// # Errors
    ///
    /// - [`TableError::MissingKeys`] if the hint is non-zero but no entries
    ///   were supplied.
    /// - [`TableError::NullKey`] if an entry has no key.
    /// - [`TableError::DuplicateKey`] if two entries share a key under
    ///   `comparer`.
    /// - [`TableError::InvalidArgument`] if the hint exceeds
    ///   [`MAX_CAPACITY`](crate::hash_table::MAX_CAPACITY).
    pub fn from_snapshot(snapshot: Snapshot<K, V>, comparer: C) -> Result<Self, TableError> {
        if snapshot.bucket_hint == 0 {
            return Ok(Self::with_comparer(comparer));
        }

        let mut map = Self::try_with_capacity_and_comparer(snapshot.bucket_hint, comparer)?;
        let entries = snapshot.entries.ok_or(TableError::MissingKeys)?;
        tracing::debug!(
            bucket_hint = snapshot.bucket_hint,
            entries = entries.len(),
            "importing snapshot"
        );
        for (key, value) in entries {
            let key = key.ok_or(TableError::NullKey)?;
            map.add(key, value)?;
        }
        Ok(map)
    }
}

use core::fmt::Debug;
use core::ops::Index;

use crate::comparer::Intrinsic;
use crate::comparer::KeyComparer;
use crate::error::TableError;
use crate::hash_table;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// Number of colliding slots a single insertion may walk before the map
/// asks its comparer for a randomized replacement.
pub const COLLISION_THRESHOLD: usize = 100;

#[cold]
#[inline(never)]
#[track_caller]
fn corrupted(e: TableError) -> ! {
    panic!("{e}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InsertMode {
    /// Leave an existing value untouched.
    KeepExisting,
    /// Replace an existing value.
    Overwrite,
    /// Fail with [`TableError::DuplicateKey`] on an existing key.
    RejectExisting,
}

enum Inserted<V> {
    New,
    Replaced(V),
    Kept,
}

/// A hash map built on the separately chained [`HashTable`].
///
/// `HashMap<K, V, C>` stores key-value pairs and hashes and compares keys
/// with a [`KeyComparer`] `C` chosen at construction. The default comparer,
/// [`Intrinsic`], uses the key's own `Hash` and `Eq` with a per-map random
/// seed. Textual keys can use
/// [`TextComparer`](crate::TextComparer), which starts with a fast fixed
/// hash and is switched to a randomized one if an insertion runs into more
/// than [`COLLISION_THRESHOLD`] colliding keys.
///
/// The map is meant for a single writer. Borrowing iterators are protected
/// by the borrow checker; the detached [`Cursor`] checks the map's
/// [`version`](HashMap::version) instead.
///
/// # Examples
///
/// ```rust
/// use chained_map::HashMap;
/// use chained_map::TableError;
///
/// let mut map = HashMap::new();
/// map.add(1, 10.0).unwrap();
/// map.add(2, 20.0).unwrap();
/// assert_eq!(map.add(2, 30.0), Err(TableError::DuplicateKey));
///
/// assert_eq!(map.try_get(&1), Some(&10.0));
/// assert!(map.remove(&1));
/// assert_eq!(map.try_get(&1), None);
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, C = Intrinsic> {
    table: HashTable<(K, V)>,
    comparer: C,
}

impl<K, V, C> Debug for HashMap<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V> HashMap<K, V, Intrinsic> {
    /// Creates an empty map with the [`Intrinsic`] comparer. Nothing is
    /// allocated until the first insertion.
    pub fn new() -> Self {
        Self::with_comparer(Intrinsic::new())
    }

    /// Creates a map with room for at least `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds
    /// [`MAX_CAPACITY`](crate::hash_table::MAX_CAPACITY).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparer(capacity, Intrinsic::new())
    }

    /// Creates a map with room for at least `capacity` entries, failing
    /// with [`TableError::InvalidArgument`] if `capacity` exceeds
    /// [`MAX_CAPACITY`](crate::hash_table::MAX_CAPACITY).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::try_with_capacity_and_comparer(capacity, Intrinsic::new())
    }
}

impl<K, V, C> Default for HashMap<K, V, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<K, V, C> HashMap<K, V, C> {
    /// Creates an empty map that uses `comparer` for every key.
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            table: HashTable::new(),
            comparer,
        }
    }

    /// Creates a map with room for at least `capacity` entries that uses
    /// `comparer` for every key.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds
    /// [`MAX_CAPACITY`](crate::hash_table::MAX_CAPACITY).
    pub fn with_capacity_and_comparer(capacity: usize, comparer: C) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            comparer,
        }
    }

    /// Fallible form of
    /// [`with_capacity_and_comparer`](HashMap::with_capacity_and_comparer).
    pub fn try_with_capacity_and_comparer(
        capacity: usize,
        comparer: C,
    ) -> Result<Self, TableError> {
        Ok(Self {
            table: HashTable::try_with_capacity(capacity)?,
            comparer,
        })
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Alias of [`len`](HashMap::len).
    pub fn count(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of entries the map can hold before growing.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the comparer currently in use.
    ///
    /// This is the comparer given at construction unless hash-flooding
    /// mitigation replaced it.
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Returns the modification counter of the map.
    pub fn version(&self) -> u64 {
        self.table.version()
    }

    /// Removes every entry, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves room for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Fallible form of [`reserve`](HashMap::reserve).
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TableError> {
        self.table.try_reserve(additional)
    }

    /// Returns an iterator over the entries in unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Removes every entry and yields them.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Starts a detached, version-checked cursor over the entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_map::HashMap;
    /// use chained_map::TableError;
    ///
    /// let mut map = HashMap::new();
    /// map.set("a", 1);
    ///
    /// let mut cursor = map.cursor();
    /// assert_eq!(cursor.next(&map), Ok(Some((&"a", &1))));
    /// assert_eq!(cursor.next(&map), Ok(None));
    ///
    /// map.set("b", 2);
    /// assert_eq!(cursor.next(&map), Err(TableError::CursorInvalidated));
    /// ```
    pub fn cursor(&self) -> Cursor {
        Cursor {
            inner: self.table.cursor(),
        }
    }

    /// Returns `true` if some entry holds `value`. This is a linear scan.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    #[cfg(test)]
    pub(crate) fn raw_table(&self) -> &HashTable<(K, V)> {
        &self.table
    }

    #[cfg(test)]
    pub(crate) fn raw_table_mut(&mut self) -> &mut HashTable<(K, V)> {
        &mut self.table
    }
}

impl<K, V, C> HashMap<K, V, C>
where
    C: KeyComparer<K>,
{
    fn find_entry(&self, key: &K) -> Result<Option<&(K, V)>, TableError> {
        let hash = self.comparer.hash(key);
        self.table.find(hash, |(k, _)| self.comparer.equals(k, key))
    }

    fn insert_impl(&mut self, key: K, value: V, mode: InsertMode) -> Result<Inserted<V>, TableError> {
        let hash = self.comparer.hash(&key);
        let comparer = &self.comparer;
        let collisions = match self.table.entry(hash, |(k, _)| comparer.equals(k, &key))? {
            TableEntry::Occupied(mut entry) => {
                return match mode {
                    InsertMode::Overwrite => Ok(Inserted::Replaced(
                        entry.modify(|(_, v)| core::mem::replace(v, value)),
                    )),
                    InsertMode::KeepExisting => Ok(Inserted::Kept),
                    InsertMode::RejectExisting => Err(TableError::DuplicateKey),
                };
            }
            TableEntry::Vacant(entry) => {
                let collisions = entry.collisions();
                entry.try_insert((key, value))?;
                collisions
            }
        };

        if collisions > COLLISION_THRESHOLD {
            self.mitigate_flooding(collisions);
        }
        Ok(Inserted::New)
    }

    /// Swaps in the comparer's randomized replacement, if it offers one,
    /// and rehashes every entry at the current capacity.
    #[cold]
    fn mitigate_flooding(&mut self, collisions: usize) {
        let Some(randomized) = <C as KeyComparer<K>>::randomized(&self.comparer) else {
            return;
        };

        tracing::warn!(
            collisions,
            len = self.table.len(),
            capacity = self.table.capacity(),
            "collision chain over threshold, switching to a randomized comparer"
        );
        self.comparer = randomized;
        let comparer = &self.comparer;
        self.table.rehash(|(k, _)| comparer.hash(k));
    }

    /// Adds a new entry, failing with [`TableError::DuplicateKey`] if the key
    /// is already present. The map is unchanged on failure.
    pub fn add(&mut self, key: K, value: V) -> Result<(), TableError> {
        self.insert_impl(key, value, InsertMode::RejectExisting)
            .map(|_| ())
    }

    /// Adds a new entry unless the key is already present.
    ///
    /// Returns `false`, leaving the stored value untouched, if the key was
    /// present.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn try_add(&mut self, key: K, value: V) -> bool {
        match self.insert_impl(key, value, InsertMode::KeepExisting) {
            Ok(Inserted::New) => true,
            Ok(Inserted::Kept | Inserted::Replaced(_)) => false,
            Err(e) => corrupted(e),
        }
    }

    /// Inserts or overwrites the entry for `key`, returning the previous
    /// value if there was one. An overwrite keeps the stored key.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_map::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Ok(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.insert_impl(key, value, InsertMode::Overwrite) {
            Ok(Inserted::Replaced(old)) => Some(old),
            Ok(Inserted::New | Inserted::Kept) => None,
            Err(e) => corrupted(e),
        }
    }

    /// Inserts or overwrites the entry for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn set(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    /// Returns the value for `key`, failing with [`TableError::KeyNotFound`]
    /// if it is absent.
    pub fn get(&self, key: &K) -> Result<&V, TableError> {
        self.find_entry(key)?
            .map(|(_, v)| v)
            .ok_or(TableError::KeyNotFound)
    }

    /// Returns the value for `key`, if present.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn try_get(&self, key: &K) -> Option<&V> {
        match self.find_entry(key) {
            Ok(found) => found.map(|(_, v)| v),
            Err(e) => corrupted(e),
        }
    }

    /// Returns both the stored key and the value for `key`, if present.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        match self.find_entry(key) {
            Ok(found) => found.map(|(k, v)| (k, v)),
            Err(e) => corrupted(e),
        }
    }

    /// Returns a mutable reference to the value for `key`, if present.
    ///
    /// Writing through the reference does not change the map's version.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.comparer.hash(key);
        let comparer = &self.comparer;
        match self.table.find_mut(hash, |(k, _)| comparer.equals(k, key)) {
            Ok(found) => found.map(|(_, v)| v),
            Err(e) => corrupted(e),
        }
    }

    /// Returns `true` if the map holds `key`.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn contains_key(&self, key: &K) -> bool {
        self.try_get(key).is_some()
    }

    /// Removes `key`, returning the stored key and value if it was present.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.comparer.hash(key);
        let comparer = &self.comparer;
        match self.table.remove(hash, |(k, _)| comparer.equals(k, key)) {
            Ok(removed) => removed,
            Err(e) => corrupted(e),
        }
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn remove_take(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning `true` if it was present.
    ///
    /// # Panics
    ///
    /// Panics if the table's chains are found to be corrupted.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }
}

impl<K, V, C> Index<&K> for HashMap<K, V, C>
where
    C: KeyComparer<K>,
{
    type Output = V;

    /// Returns the value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent or the table's chains are found to be
    /// corrupted.
    fn index(&self, key: &K) -> &V {
        match self.try_get(key) {
            Some(value) => value,
            None => panic!("{}", TableError::KeyNotFound),
        }
    }
}

impl<K, V, C> PartialEq for HashMap<K, V, C>
where
    C: KeyComparer<K>,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.try_get(k).is_some_and(|ov| v == ov))
    }
}

impl<K, V, C> Eq for HashMap<K, V, C>
where
    C: KeyComparer<K>,
    V: Eq,
{
}

impl<K, V, C> Extend<(K, V)> for HashMap<K, V, C>
where
    C: KeyComparer<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for HashMap<K, V, C>
where
    C: KeyComparer<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_comparer(C::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C> IntoIterator for HashMap<K, V, C> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a HashMap<K, V, C> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut HashMap<K, V, C> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A detached cursor over the entries of a [`HashMap`].
///
/// Created by [`HashMap::cursor`]. It fails with
/// [`TableError::CursorInvalidated`] once the map has been modified.
#[derive(Clone, Debug)]
pub struct Cursor {
    inner: hash_table::Cursor,
}

impl Cursor {
    /// Advances to the next entry of `map`.
    pub fn next<'a, K, V, C>(
        &mut self,
        map: &'a HashMap<K, V, C>,
    ) -> Result<Option<(&'a K, &'a V)>, TableError> {
        Ok(self.inner.next(&map.table)?.map(|(k, v)| (k, v)))
    }
}

/// An iterator over the entries of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the entries of a [`HashMap`] with mutable values.
pub struct IterMut<'a, K, V> {
    inner: hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// An iterator over mutable references to the values of a [`HashMap`].
pub struct ValuesMut<'a, K, V> {
    inner: hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

/// A draining iterator over the entries of a [`HashMap`].
pub struct Drain<'a, K, V> {
    inner: hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

/// An owning iterator over the entries of a [`HashMap`].
pub struct IntoIter<K, V> {
    inner: hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

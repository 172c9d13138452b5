use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::TableError;

/// Largest number of slots a table may hold.
///
/// Slot links are stored as 1-based `u32` values and hashes keep 31 bits, so
/// the table stays well inside both ranges.
pub const MAX_CAPACITY: usize = 0x7FEF_FFFD;

/// Only the low 31 bits of a hash are stored, which keeps every live hash
/// non-negative and leaves `-1` free to mark unused slots.
const HASH_MASK: u64 = 0x7FFF_FFFF;

/// Hash of a slot that sits on the free list.
const FREE: i32 = -1;

/// 1-based link value meaning "no slot".
const NONE: u32 = 0;

#[inline(always)]
fn truncate(hash: u64) -> i32 {
    (hash & HASH_MASK) as i32
}

#[inline(always)]
fn link_of(index: usize) -> u32 {
    (index + 1) as u32
}

#[cold]
#[inline(never)]
fn corruption(hops: usize) -> TableError {
    tracing::error!(hops, "collision chain does not terminate");
    TableError::Corrupted
}

mod primes {
    use super::MAX_CAPACITY;

    pub(super) fn is_prime(n: usize) -> bool {
        if n < 2 {
            return false;
        }
        if n % 2 == 0 {
            return n == 2;
        }

        let mut divisor = 3;
        while divisor * divisor <= n {
            if n % divisor == 0 {
                return false;
            }
            divisor += 2;
        }
        true
    }

    /// Smallest prime that is at least `min` (and at least 3), or `None` if
    /// it would exceed [`MAX_CAPACITY`].
    pub(super) fn at_least(min: usize) -> Option<usize> {
        let mut candidate = min.max(3) | 1;
        while candidate <= MAX_CAPACITY {
            if is_prime(candidate) {
                return Some(candidate);
            }
            candidate += 2;
        }
        None
    }

    /// Size to grow to from a store holding `used` slots: the smallest prime
    /// at least twice as large, clamped to [`MAX_CAPACITY`].
    pub(super) fn expand(used: usize) -> Option<usize> {
        if used >= MAX_CAPACITY {
            return None;
        }
        match used.checked_mul(2) {
            Some(doubled) if doubled <= MAX_CAPACITY => at_least(doubled),
            _ => Some(MAX_CAPACITY),
        }
    }
}

#[derive(Clone)]
struct Slot<T> {
    /// Truncated hash of the payload, or [`FREE`].
    hash: i32,
    /// 1-based link to the next slot of the chain, or of the free list when
    /// this slot is free.
    next: u32,
    value: Option<T>,
}

/// A separately chained hash table storing values of type `T`.
///
/// Values live in a single arena of slots. Each bucket of the bucket index
/// holds a 1-based link to the head of its collision chain, and chains are
/// threaded through the slots themselves. Removed slots go onto a free list
/// and are reused before the arena grows.
///
/// Like the map built on top of it, the table never hashes on its own: each
/// operation receives the hash of the value it is looking for and an
/// equality predicate.
///
/// ## Sizing
///
/// The bucket count is always prime. A table created with
/// [`new`](HashTable::new) allocates nothing until its first insertion. When
/// every slot is used and the free list is empty, the table grows to the
/// smallest prime at least twice its current size. Capacity never shrinks.
///
/// ## Example
///
/// ```rust
/// use chained_map::hash_table::Entry;
/// use chained_map::hash_table::HashTable;
///
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
/// let hash = 123u64.wrapping_mul(0x9E37_79B9_7F4A_7C15);
///
/// match table.entry(hash, |p: &Person| p.id == 123).unwrap() {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).unwrap().unwrap().name, "Alice");
/// ```
#[derive(Clone)]
pub struct HashTable<T> {
    buckets: Vec<u32>,
    slots: Vec<Slot<T>>,
    free_list: u32,
    free_count: usize,
    version: u64,
}

impl<T: Debug> Debug for HashTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("free", &self.free_count)
            .field("version", &self.version)
            .field("values", &DebugValues(self))
            .finish()
    }
}

struct DebugValues<'a, T>(&'a HashTable<T>);

impl<T: Debug> Debug for DebugValues<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<T> Default for HashTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HashTable<T> {
    /// Creates an empty table without allocating.
    pub const fn new() -> Self {
        Self {
            buckets: Vec::new(),
            slots: Vec::new(),
            free_list: NONE,
            free_count: 0,
            version: 0,
        }
    }

    /// Creates a table that holds at least `capacity` values before growing.
    ///
    /// A capacity of zero allocates nothing.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`MAX_CAPACITY`]. See
    /// [`try_with_capacity`](HashTable::try_with_capacity) for a fallible
    /// version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_map::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 101);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Creates a table that holds at least `capacity` values before growing,
    /// failing with [`TableError::InvalidArgument`] if `capacity` exceeds
    /// [`MAX_CAPACITY`].
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        let mut table = Self::new();
        if capacity > 0 {
            let size = primes::at_least(capacity)
                .ok_or(TableError::InvalidArgument("capacity exceeds MAX_CAPACITY"))?;
            table.initialize(size);
        }
        Ok(table)
    }

    fn initialize(&mut self, size: usize) {
        tracing::trace!(size, "allocating bucket index and slot store");
        self.buckets = vec![NONE; size];
        self.slots = Vec::with_capacity(size);
        self.free_list = NONE;
        self.free_count = 0;
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_count
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets, which is also the number of slots the
    /// table can use before it has to grow.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the modification counter.
    ///
    /// The counter changes on every insertion, overwrite, removal and clear,
    /// and is what invalidates a [`Cursor`].
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline(always)]
    fn bucket_of(&self, hash: i32) -> usize {
        hash as usize % self.buckets.len()
    }

    #[inline(always)]
    fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Walks the chain for `hash`, returning the matching slot index.
    fn find_index(&self, hash: i32, eq: impl Fn(&T) -> bool) -> Result<Option<usize>, TableError> {
        if self.buckets.is_empty() {
            return Ok(None);
        }

        let mut link = self.buckets[self.bucket_of(hash)];
        let mut hops = 0;
        while link != NONE {
            let index = (link - 1) as usize;
            let slot = self.slots.get(index).ok_or_else(|| corruption(hops))?;
            if slot.hash == hash && slot.value.as_ref().is_some_and(|v| eq(v)) {
                return Ok(Some(index));
            }

            link = slot.next;
            hops += 1;
            if hops > self.slots.len() {
                return Err(corruption(hops));
            }
        }

        Ok(None)
    }

    /// Finds a value by hash and equality predicate.
    ///
    /// Fails with [`TableError::Corrupted`] if the chain for `hash` does not
    /// terminate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_map::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).unwrap().or_insert(42);
    ///
    /// assert_eq!(table.find(42, |&n| n == 42), Ok(Some(&42)));
    /// assert_eq!(table.find(99, |&n| n == 99), Ok(None));
    /// ```
    #[inline]
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Result<Option<&T>, TableError> {
        Ok(self
            .find_index(truncate(hash), eq)?
            .and_then(|index| self.slots[index].value.as_ref()))
    }

    /// Finds a value by hash and equality predicate, returning a mutable
    /// reference.
    ///
    /// Mutating through the reference does not count as a modification; it
    /// must not change anything the hash or the predicate depend on.
    #[inline]
    pub fn find_mut(
        &mut self,
        hash: u64,
        eq: impl Fn(&T) -> bool,
    ) -> Result<Option<&mut T>, TableError> {
        Ok(self
            .find_index(truncate(hash), eq)?
            .and_then(|index| self.slots[index].value.as_mut()))
    }

    /// Gets the entry for the given hash and equality predicate.
    ///
    /// The walk records how many non-matching slots it passed, available
    /// through [`VacantEntry::collisions`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_map::hash_table::{Entry, HashTable};
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(7, |&(k, _): &(u32, &str)| k == 7).unwrap() {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert((7, "seven"));
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         entry.get_mut().1 = "updated";
    ///     }
    /// }
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Result<Entry<'_, T>, TableError> {
        let hash = truncate(hash);
        if self.buckets.is_empty() {
            return Ok(Entry::Vacant(VacantEntry {
                table: self,
                hash,
                collisions: 0,
            }));
        }

        let bucket = self.bucket_of(hash);
        let mut prev = NONE;
        let mut link = self.buckets[bucket];
        let mut collisions = 0;
        while link != NONE {
            let index = (link - 1) as usize;
            let slot = self.slots.get(index).ok_or_else(|| corruption(collisions))?;
            if slot.hash == hash && slot.value.as_ref().is_some_and(|v| eq(v)) {
                return Ok(Entry::Occupied(OccupiedEntry {
                    table: self,
                    bucket,
                    prev,
                    index,
                }));
            }

            prev = link;
            link = slot.next;
            collisions += 1;
            if collisions > self.slots.len() {
                return Err(corruption(collisions));
            }
        }

        Ok(Entry::Vacant(VacantEntry {
            table: self,
            hash,
            collisions,
        }))
    }

    /// Removes and returns a value from the table.
    ///
    /// Returns `Ok(None)` and leaves the table untouched if nothing matches.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chained_map::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).unwrap().or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Ok(Some(42)));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(42, |&n| n == 42), Ok(None));
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Result<Option<T>, TableError> {
        match self.entry(hash, eq)? {
            Entry::Occupied(entry) => Ok(Some(entry.remove())),
            Entry::Vacant(_) => Ok(None),
        }
    }

    /// Removes all values, keeping the allocated capacity.
    pub fn clear(&mut self) {
        if self.slots.is_empty() {
            return;
        }

        tracing::debug!(len = self.len(), capacity = self.capacity(), "clearing table");
        self.buckets.fill(NONE);
        self.slots.clear();
        self.free_list = NONE;
        self.free_count = 0;
        self.bump_version();
    }

    /// Reserves room for at least `additional` more values.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity would exceed [`MAX_CAPACITY`].
    pub fn reserve(&mut self, additional: usize) {
        self.try_reserve(additional).unwrap_or_else(|e| panic!("{e}"));
    }

    /// Reserves room for at least `additional` more values, failing with
    /// [`TableError::CapacityOverflow`] if that would exceed
    /// [`MAX_CAPACITY`].
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TableError> {
        let required = self
            .len()
            .checked_add(additional)
            .ok_or(TableError::CapacityOverflow)?;
        if required <= self.capacity() {
            return Ok(());
        }

        let size = primes::at_least(required).ok_or(TableError::CapacityOverflow)?;
        if self.buckets.is_empty() {
            self.initialize(size);
        } else {
            self.resize(size);
        }
        Ok(())
    }

    /// Recomputes the hash of every value with `hasher` and rebuilds the
    /// chains at the current capacity.
    ///
    /// Ordinary growth reuses the stored hashes; this is only needed when the
    /// hash function itself changes.
    pub fn rehash(&mut self, hasher: impl Fn(&T) -> u64) {
        if self.buckets.is_empty() {
            return;
        }

        tracing::debug!(len = self.len(), capacity = self.capacity(), "rehashing table");
        for slot in &mut self.slots {
            if let Some(value) = &slot.value {
                slot.hash = truncate(hasher(value));
            }
        }
        self.buckets.fill(NONE);
        self.rethread();
    }

    fn grow(&mut self) -> Result<(), TableError> {
        let size = primes::expand(self.slots.len()).ok_or(TableError::CapacityOverflow)?;
        tracing::debug!(from = self.capacity(), to = size, "growing table");
        self.resize(size);
        Ok(())
    }

    fn resize(&mut self, size: usize) {
        debug_assert!(size >= self.slots.len());
        self.slots.reserve_exact(size - self.slots.len());
        self.buckets = vec![NONE; size];
        self.rethread();
    }

    /// Links every live slot into the chain of its bucket. Free slots keep
    /// their free-list links.
    fn rethread(&mut self) {
        for index in 0..self.slots.len() {
            let hash = self.slots[index].hash;
            if hash >= 0 {
                let bucket = self.bucket_of(hash);
                self.slots[index].next = self.buckets[bucket];
                self.buckets[bucket] = link_of(index);
            }
        }
    }

    /// Takes a slot from the free list or the end of the store, fills it and
    /// makes it the head of its bucket's chain.
    fn claim_slot(&mut self, hash: i32, value: T) -> Result<usize, TableError> {
        if self.buckets.is_empty() {
            let size = primes::at_least(0).ok_or(TableError::CapacityOverflow)?;
            self.initialize(size);
        }

        let index = if self.free_count > 0 {
            let index = (self.free_list - 1) as usize;
            self.free_list = self.slots[index].next;
            self.free_count -= 1;
            index
        } else {
            if self.slots.len() == self.buckets.len() {
                self.grow()?;
            }
            self.slots.push(Slot {
                hash: FREE,
                next: NONE,
                value: None,
            });
            self.slots.len() - 1
        };

        let bucket = self.bucket_of(hash);
        let head = self.buckets[bucket];
        let slot = &mut self.slots[index];
        debug_assert!(slot.value.is_none());
        slot.hash = hash;
        slot.next = head;
        slot.value = Some(value);
        self.buckets[bucket] = link_of(index);
        self.bump_version();

        Ok(index)
    }

    /// Unlinks the slot at `index` from its chain and pushes it onto the
    /// free list.
    fn release(&mut self, bucket: usize, prev: u32, index: usize) -> T {
        let next = self.slots[index].next;
        if prev == NONE {
            self.buckets[bucket] = next;
        } else {
            self.slots[(prev - 1) as usize].next = next;
        }

        let slot = &mut self.slots[index];
        slot.hash = FREE;
        slot.next = self.free_list;
        let value = slot.value.take();
        self.free_list = link_of(index);
        self.free_count += 1;
        self.bump_version();

        match value {
            Some(value) => value,
            None => unreachable!("live slot without a payload"),
        }
    }

    /// Returns an iterator over all values in the table, in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len(),
        }
    }

    /// Returns an iterator over mutable references to all values.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let remaining = self.len();
        IterMut {
            slots: self.slots.iter_mut(),
            remaining,
        }
    }

    /// Removes every value, yielding them in slot order.
    ///
    /// The table is empty as soon as this returns, even if the iterator is
    /// not fully consumed.
    pub fn drain(&mut self) -> Drain<'_, T> {
        let remaining = self.len();
        if !self.slots.is_empty() {
            self.buckets.fill(NONE);
            self.free_list = NONE;
            self.free_count = 0;
            self.bump_version();
        }
        Drain {
            slots: self.slots.drain(..),
            remaining,
        }
    }

    /// Starts a cursor positioned before the first value.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            version: self.version,
            index: 0,
        }
    }

    /// Checks every structural invariant, panicking on the first violation.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert!(self.slots.len() <= self.buckets.len());

        let mut seen = vec![false; self.slots.len()];
        for (bucket, &head) in self.buckets.iter().enumerate() {
            let mut link = head;
            while link != NONE {
                let index = (link - 1) as usize;
                assert!(!seen[index], "slot {index} reached twice");
                seen[index] = true;
                let slot = &self.slots[index];
                assert!(slot.hash >= 0, "free slot {index} on a chain");
                assert!(slot.value.is_some());
                assert_eq!(self.bucket_of(slot.hash), bucket);
                link = slot.next;
            }
        }

        let mut free = 0;
        let mut link = self.free_list;
        while link != NONE {
            let index = (link - 1) as usize;
            assert!(!seen[index], "slot {index} reached twice");
            seen[index] = true;
            let slot = &self.slots[index];
            assert_eq!(slot.hash, FREE);
            assert!(slot.value.is_none());
            free += 1;
            link = slot.next;
        }

        assert_eq!(free, self.free_count);
        assert!(seen.iter().all(|&s| s), "slot missing from every list");
        assert_eq!(self.len(), self.iter().count());
    }

    /// Points the tail of the longest chain back at its head.
    #[cfg(test)]
    pub(crate) fn close_longest_chain(&mut self) {
        let Some(&head) = self.buckets.iter().max_by_key(|&&head| {
            let mut len = 0;
            let mut link = head;
            while link != NONE {
                len += 1;
                link = self.slots[(link - 1) as usize].next;
            }
            len
        }) else {
            return;
        };
        if head == NONE {
            return;
        }

        let mut tail = head;
        while self.slots[(tail - 1) as usize].next != NONE {
            tail = self.slots[(tail - 1) as usize].next;
        }
        self.slots[(tail - 1) as usize].next = head;
    }

    /// Length of the longest collision chain.
    #[cfg(test)]
    pub(crate) fn longest_chain(&self) -> usize {
        self.buckets
            .iter()
            .map(|&head| {
                let mut len = 0;
                let mut link = head;
                while link != NONE {
                    len += 1;
                    link = self.slots[(link - 1) as usize].next;
                }
                len
            })
            .max()
            .unwrap_or(0)
    }
}

/// A view into a single entry in the table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, T> {
    /// The table holds no matching value.
    Vacant(VacantEntry<'a, T>),
    /// The table holds a matching value.
    Occupied(OccupiedEntry<'a, T>),
}

impl<'a, T> Entry<'a, T> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry, recording a modification.
    pub fn and_modify(self, f: impl FnOnce(&mut T)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                entry.modify(f);
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

/// A view into a vacant entry of a [`HashTable`].
pub struct VacantEntry<'a, T> {
    table: &'a mut HashTable<T>,
    hash: i32,
    collisions: usize,
}

impl<'a, T> VacantEntry<'a, T> {
    /// Number of non-matching slots passed while looking for the value.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Inserts `value`, growing the table first if every slot is in use.
    ///
    /// # Panics
    ///
    /// Panics if growing would exceed [`MAX_CAPACITY`].
    pub fn insert(self, value: T) -> &'a mut T {
        match self.try_insert(value) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    /// Inserts `value`, failing with [`TableError::CapacityOverflow`] if the
    /// table would have to grow past [`MAX_CAPACITY`].
    pub fn try_insert(self, value: T) -> Result<&'a mut T, TableError> {
        let table = self.table;
        let index = table.claim_slot(self.hash, value)?;
        match table.slots[index].value.as_mut() {
            Some(value) => Ok(value),
            None => unreachable!("claimed slot without a payload"),
        }
    }
}

/// A view into an occupied entry of a [`HashTable`].
pub struct OccupiedEntry<'a, T> {
    table: &'a mut HashTable<T>,
    bucket: usize,
    prev: u32,
    index: usize,
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Returns a reference to the value.
    pub fn get(&self) -> &T {
        match &self.table.slots[self.index].value {
            Some(value) => value,
            None => unreachable!("occupied entry without a payload"),
        }
    }

    /// Returns a mutable reference to the value without recording a
    /// modification.
    pub fn get_mut(&mut self) -> &mut T {
        match &mut self.table.slots[self.index].value {
            Some(value) => value,
            None => unreachable!("occupied entry without a payload"),
        }
    }

    /// Converts the entry into a mutable reference tied to the table.
    pub fn into_mut(self) -> &'a mut T {
        match &mut self.table.slots[self.index].value {
            Some(value) => value,
            None => unreachable!("occupied entry without a payload"),
        }
    }

    /// Applies `f` to the value and records a modification, invalidating
    /// outstanding cursors.
    pub fn modify<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        self.table.bump_version();
        f(self.get_mut())
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self) -> T {
        self.table.release(self.bucket, self.prev, self.index)
    }
}

/// A cursor over the values of a [`HashTable`] that does not borrow it.
///
/// The cursor remembers the table's [`version`](HashTable::version) at
/// creation. If the table is modified afterwards, the next call to
/// [`next`](Cursor::next) fails with [`TableError::CursorInvalidated`]
/// instead of returning skipped or repeated values.
///
/// A cursor must only be used with the table that created it.
///
/// # Examples
///
/// ```rust
/// # use chained_map::TableError;
/// # use chained_map::hash_table::HashTable;
/// #
/// let mut table = HashTable::new();
/// table.entry(1, |&n: &u64| n == 1).unwrap().or_insert(1);
///
/// let mut cursor = table.cursor();
/// assert_eq!(cursor.next(&table), Ok(Some(&1)));
///
/// table.entry(2, |&n: &u64| n == 2).unwrap().or_insert(2);
/// assert_eq!(cursor.next(&table), Err(TableError::CursorInvalidated));
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    version: u64,
    index: usize,
}

impl Cursor {
    /// Advances to the next value.
    pub fn next<'a, T>(&mut self, table: &'a HashTable<T>) -> Result<Option<&'a T>, TableError> {
        if table.version != self.version {
            return Err(TableError::CursorInvalidated);
        }

        while let Some(slot) = table.slots.get(self.index) {
            self.index += 1;
            if let Some(value) = &slot.value {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// An iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.find_map(|slot| slot.value.as_ref())?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A mutable iterator over the values of a [`HashTable`].
pub struct IterMut<'a, T> {
    slots: core::slice::IterMut<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.find_map(|slot| slot.value.as_mut())?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// A draining iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, T> {
    slots: vec::Drain<'a, Slot<T>>,
    remaining: usize,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.find_map(|slot| slot.value)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<T> {
    slots: vec::IntoIter<Slot<T>>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.find_map(|slot| slot.value)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for HashTable<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        let remaining = self.len();
        IntoIter {
            slots: self.slots.into_iter(),
            remaining,
        }
    }
}

impl<'a, T> IntoIterator for &'a HashTable<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

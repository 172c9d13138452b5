use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hash builder with a fixed seed, identical in every process.
        pub type FixedHashBuilder = foldhash::fast::FixedState;
        /// Hash builder seeded from per-process randomness.
        pub type RandomHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hash builder with a fixed seed, identical in every process.
        pub type FixedHashBuilder = core::hash::BuildHasherDefault<std::hash::DefaultHasher>;
        /// Hash builder seeded from per-process randomness.
        pub type RandomHashBuilder = std::hash::RandomState;
    } else {
        compile_error!("chained-map requires the `foldhash` or the `std` feature");
    }
}

/// Supplies hashing and equality for the keys of a table.
///
/// A table calls the same comparer for every hash and every key comparison
/// for its whole lifetime, except for the single switch performed by
/// hash-flooding mitigation (see [`KeyComparer::randomized`]).
///
/// Only the low 31 bits of [`hash`](KeyComparer::hash) are kept by the
/// table.
pub trait KeyComparer<K: ?Sized> {
    /// Hashes `key`. Keys that are [`equals`](KeyComparer::equals) must hash
    /// identically.
    fn hash(&self, key: &K) -> u64;

    /// Returns `true` if `a` and `b` denote the same key.
    fn equals(&self, a: &K, b: &K) -> bool;

    /// Returns a replacement comparer with a randomized hash, if this
    /// comparer is predictable enough to be attacked by crafted keys.
    ///
    /// The table asks for a replacement when a single insertion walks an
    /// overly long collision chain. Returning `None` (the default) opts out
    /// of mitigation; the replacement itself must return `None` so the
    /// switch happens at most once.
    fn randomized(&self) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// The key type's own [`Hash`] and [`Eq`] implementations, hashed with a
/// randomly seeded builder.
///
/// This is the default comparer. Every instance draws its own seed, so the
/// bucket a key lands in cannot be predicted from outside the map. It never
/// asks for mitigation, so keys hashed with it are never rehashed once
/// stored.
#[derive(Clone, Debug, Default)]
pub struct Intrinsic<S = RandomHashBuilder> {
    hash_builder: S,
}

impl Intrinsic {
    /// Creates the comparer with a freshly seeded builder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> Intrinsic<S> {
    /// Uses `hash_builder` instead of the default builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns the hash builder in use.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, S> KeyComparer<K> for Intrinsic<S>
where
    K: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

#[derive(Clone, Debug)]
enum TextHashState {
    Fixed(FixedHashBuilder),
    Randomized(RandomHashBuilder),
}

/// Comparer for textual keys.
///
/// Starts out with a fixed-seed hash, which is fast but predictable. When a
/// table detects a flooding pattern it swaps this comparer for its
/// randomized form, which then stays in place for the rest of the table's
/// life.
#[derive(Clone, Debug)]
pub struct TextComparer {
    state: TextHashState,
}

impl Default for TextComparer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextComparer {
    /// Creates a comparer with the fixed-seed hash.
    pub fn new() -> Self {
        Self {
            state: TextHashState::Fixed(FixedHashBuilder::default()),
        }
    }

    /// Creates a comparer that is randomized from the start.
    pub fn new_randomized() -> Self {
        Self {
            state: TextHashState::Randomized(RandomHashBuilder::default()),
        }
    }

    /// Returns `true` once the comparer uses the randomized hash.
    pub fn is_randomized(&self) -> bool {
        matches!(self.state, TextHashState::Randomized(_))
    }
}

impl<K> KeyComparer<K> for TextComparer
where
    K: ?Sized + AsRef<str>,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        match &self.state {
            TextHashState::Fixed(builder) => builder.hash_one(key.as_ref()),
            TextHashState::Randomized(builder) => builder.hash_one(key.as_ref()),
        }
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a.as_ref() == b.as_ref()
    }

    fn randomized(&self) -> Option<Self> {
        match self.state {
            TextHashState::Fixed(_) => Some(Self::new_randomized()),
            TextHashState::Randomized(_) => None,
        }
    }
}

/// A custom comparer assembled from a hash closure and an equality closure.
///
/// # Examples
///
/// ```rust
/// use chained_map::HashMap;
/// use chained_map::comparer::FnComparer;
///
/// let case_insensitive = FnComparer::new(
///     |k: &String| k.to_ascii_lowercase().len() as u64,
///     |a: &String, b: &String| a.eq_ignore_ascii_case(b),
/// );
/// let mut map = HashMap::with_comparer(case_insensitive);
/// map.set("Key".to_string(), 1);
/// assert!(map.contains_key(&"KEY".to_string()));
/// ```
#[derive(Clone)]
pub struct FnComparer<H, E> {
    hash: H,
    eq: E,
}

impl<H, E> FnComparer<H, E> {
    /// Wraps `hash` and `eq` into a comparer.
    pub fn new(hash: H, eq: E) -> Self {
        Self { hash, eq }
    }
}

impl<H, E> Debug for FnComparer<H, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnComparer").finish_non_exhaustive()
    }
}

impl<K, H, E> KeyComparer<K> for FnComparer<H, E>
where
    K: ?Sized,
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.eq)(a, b)
    }
}

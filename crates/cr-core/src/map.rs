//! `ExpandableMap`: separate-chaining hash map with load-factor doubling.
//!
//! # Layout
//!
//! ```text
//! buckets: Vec<Vec<(K, V)>>      bucket = hash(key) % buckets.len()
//! ```
//!
//! Each bucket owns its chain as a plain `Vec`.  There are no intrusive node
//! pointers, so a resize simply moves entries into a fresh bucket array.
//!
//! # Growth
//!
//! Before a *new* key is inserted, the map checks the projected load factor
//! `(len + 1) / buckets`.  If it would exceed `max_load_factor` the bucket
//! count doubles first.  Rehashing is two-phase: the new array is allocated,
//! every entry is moved straight into its new bucket (no load-factor checks,
//! so a resize can never trigger another resize), and the old array is
//! dropped.  Insert and lookup are O(1) amortized.
//!
//! # Borrowing
//!
//! `get` borrows `&self` and `put` needs `&mut self`, so no reference handed
//! out by a lookup can outlive the next resize.  The map is deliberately not
//! `Clone`: two tables never share bucket storage.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

const INITIAL_BUCKETS: usize = 8;

/// A chained hash map that doubles its bucket array on demand.
pub struct ExpandableMap<K, V, S = FxBuildHasher> {
    buckets:         Vec<Vec<(K, V)>>,
    len:             usize,
    max_load_factor: f64,
    hash_builder:    S,
}

impl<K: Hash + Eq, V> ExpandableMap<K, V, FxBuildHasher> {
    /// Empty map with 8 buckets and the default maximum load factor (0.5).
    pub fn new() -> Self {
        Self::with_max_load_factor(crate::PlannerConfig::DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Empty map with a custom maximum load factor.
    ///
    /// A non-positive or non-finite value falls back to the default; a
    /// positive value below `PlannerConfig::MIN_MAX_LOAD_FACTOR` is raised
    /// to that minimum.
    pub fn with_max_load_factor(max_load_factor: f64) -> Self {
        Self::with_hasher(max_load_factor, FxBuildHasher)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ExpandableMap<K, V, S> {
    pub fn with_hasher(max_load_factor: f64, hash_builder: S) -> Self {
        let max_load_factor = if max_load_factor.is_finite() && max_load_factor > 0.0 {
            max_load_factor.max(crate::PlannerConfig::MIN_MAX_LOAD_FACTOR)
        } else {
            crate::PlannerConfig::DEFAULT_MAX_LOAD_FACTOR
        };
        Self {
            buckets: empty_buckets(INITIAL_BUCKETS),
            len: 0,
            max_load_factor,
            hash_builder,
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Current `len / buckets` ratio.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Associate `value` with `key`.
    ///
    /// Returns the previous value if `key` was already present; in that case
    /// the size is unchanged and no resize happens.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.insert_new(key, value);
        None
    }

    /// Return the value for `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let idx = self.bucket_index(&key);
        let (idx, pos) = match self.buckets[idx].iter().position(|(k, _)| *k == key) {
            Some(pos) => (idx, pos),
            None => self.insert_new(key, default()),
        };
        &mut self.buckets[idx][pos].1
    }

    /// Drop every entry and return to the initial 8-bucket array.
    pub fn clear(&mut self) {
        self.buckets = empty_buckets(INITIAL_BUCKETS);
        self.len = 0;
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    /// All entries in bucket order.  Order is unspecified and changes on
    /// resize.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets.iter().flatten().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    #[inline]
    fn bucket_index<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        (self.hash_builder.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Insert a key known to be absent.  Returns its `(bucket, position)`.
    fn insert_new(&mut self, key: K, value: V) -> (usize, usize) {
        let mut bucket_count = self.buckets.len();
        while (self.len + 1) as f64 / bucket_count as f64 > self.max_load_factor {
            match bucket_count.checked_mul(2) {
                Some(doubled) => bucket_count = doubled,
                None => break,
            }
        }
        if bucket_count != self.buckets.len() {
            self.rehash(bucket_count);
        }

        let idx = self.bucket_index(&key);
        let bucket = &mut self.buckets[idx];
        bucket.push((key, value));
        self.len += 1;
        (idx, bucket.len() - 1)
    }

    /// Move every entry into a fresh array of `bucket_count` buckets.
    fn rehash(&mut self, bucket_count: usize) {
        let old = std::mem::replace(&mut self.buckets, empty_buckets(bucket_count));
        for (key, value) in old.into_iter().flatten() {
            let idx = self.bucket_index(&key);
            self.buckets[idx].push((key, value));
        }
    }
}

fn empty_buckets<K, V>(n: usize) -> Vec<Vec<(K, V)>> {
    (0..n).map(|_| Vec::new()).collect()
}

impl<K: Hash + Eq, V> Default for ExpandableMap<K, V, FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ExpandableMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.buckets.iter().flatten().map(|(k, v)| (k, v)))
            .finish()
    }
}
